//! Group program compilation: boundary structure, output schemas and the
//! aggregation check.

use tabkit_awk::{group_program, Clause, CompileError};
use tabkit_schema::{Schema, Type};

fn schema(header: &str) -> Schema {
    header.parse().expect("valid header")
}

#[test]
fn test_full_program() {
    let (program, output) = group_program(
        &schema("# a, b, c, d"),
        &["new_a=a;b;log_b=2**int(log(b))"],
        &["sum_c=sum(c)/log_b;cnt_d=count()"],
    )
    .unwrap();

    assert_eq!(
        program.to_string(),
        "{__var__0=(2^int(log($2)));}\
         NR==1||__key__0!=($1 \"\")||__key__1!=($2 \"\")||__key__2!=__var__0\
         {if(NR>1)print __key__0,__key__1,__key__2,__aggr__1,__aggr__2;\
         __key__0=($1 \"\");__key__1=($2 \"\");__key__2=__var__0;__aggr__0=0;__aggr__2=0;}\
         {__aggr__0+=$3;__aggr__1=(__aggr__0/__var__0);__aggr__2++;}\
         END{if(NR>0)print __key__0,__key__1,__key__2,__aggr__1,__aggr__2;}"
    );
    assert_eq!(
        output.to_string(),
        "# new_a\tb\tlog_b:int\tsum_c:float\tcnt_d:int"
    );
}

#[test]
fn test_first_row_and_end_guards() {
    let (program, _) = group_program(&schema("# a"), &["a"], &["n=count()"]).unwrap();
    let text = program.to_string();

    // No output before the first group, final flush only for non-empty input.
    assert!(text.contains("NR==1||__key__0!=($1 \"\"){if(NR>1)print __key__0,__aggr__0;"));
    assert!(text.ends_with("END{if(NR>0)print __key__0,__aggr__0;}"));
    // Reset happens before the step of the row that opened the group.
    let reset = text.find("__aggr__0=0").unwrap();
    let step = text.find("__aggr__0++").unwrap();
    assert!(reset < step);
}

#[test]
fn test_whole_stream_aggregation() {
    let (program, output) =
        group_program(&schema("# v:float"), &[] as &[&str], &["total = sum(v)"]).unwrap();
    assert_eq!(
        program.to_string(),
        "NR==1{if(NR>1)print __aggr__0;__aggr__0=0;}{__aggr__0+=$1;}END{if(NR>0)print __aggr__0;}"
    );
    assert_eq!(output.to_string(), "# total:float");
}

#[test]
fn test_keys_only() {
    let (program, output) = group_program(&schema("# a\tb"), &["a"], &[] as &[&str]).unwrap();
    assert_eq!(
        program.to_string(),
        r#"NR==1||__key__0!=($1 ""){if(NR>1)print __key__0;__key__0=($1 "");}END{if(NR>0)print __key__0;}"#
    );
    assert_eq!(output.to_string(), "# a");
}

#[test]
fn test_string_keys_compare_as_strings() {
    let (program, _) = group_program(
        &schema("# code\tn:int\tx:float"),
        &["code", "n", "half = x / 2"],
        &["c = count()"],
    )
    .unwrap();
    assert_eq!(
        program.key_types,
        vec![Type::String, Type::Integer, Type::Floating]
    );
    assert_eq!(program.key_values(), vec![r#"($1 "")"#, "$2", "__var__0"]);
    assert!(program
        .to_string()
        .contains(r#"NR==1||__key__0!=($1 "")||__key__1!=$2||__key__2!=__var__0{"#));
    assert!(program.to_string().contains(r#"__key__0=($1 "");__key__1=$2;"#));
}

#[test]
fn test_cumulative_aggregates_never_reset() {
    let (program, _) = group_program(
        &schema("# a\tb:int"),
        &["a"],
        &["running = cumsum(b); rows = cumcount(); n = count()"],
    )
    .unwrap();
    assert_eq!(program.inits, vec!["__aggr__2=0"]);
    assert_eq!(
        program.steps,
        vec!["__aggr__0+=$2", "__aggr__1++", "__aggr__2++"]
    );
}

#[test]
fn test_key_order_is_derived() {
    let input = schema("# a\tb\tc:int\t# ORDER: a, b");
    let (_, output) = group_program(&input, &["b", "a"], &["n = count()"]).unwrap();
    assert_eq!(output.to_string(), "# b\ta\tn:int\t# ORDER: a, b");

    let (_, output) = group_program(&input, &["first = a"], &["n = count()"]).unwrap();
    assert_eq!(output.to_string(), "# first\tn:int\t# ORDER: first");
}

#[test]
fn test_group_key_reference_in_aggregate() {
    let (program, output) = group_program(
        &schema("# a:int\tb:int"),
        &["k = a"],
        &["k2 = k * 2; share = sum(b) / k"],
    )
    .unwrap();
    assert_eq!(
        program.steps,
        vec![
            "__aggr__0=($1*2)",
            "__aggr__1+=$2",
            "__aggr__2=(__aggr__1/$1)"
        ]
    );
    assert_eq!(output.to_string(), "# k:int\tk2:int\tshare:float");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_non_aggregated_value_rejected() {
    let err = group_program(&schema("# a\tb"), &["a"], &["x = b"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: need aggregate function to compute 'x' in aggregate expressions"
    );
    match err {
        CompileError::InClause { clause, source } => {
            assert_eq!(clause, Clause::Aggregate);
            assert_eq!(*source, CompileError::NeedAggregate("x".to_string()));
        }
        other => panic!("expected clause wrapper, got {:?}", other),
    }
}

#[test]
fn test_hidden_key_name_rejected_by_name() {
    let err = group_program(
        &schema("# a:int\tb"),
        &["_x = a * 2; k = _x + 1"],
        &["n = count(); y = _x"],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: need aggregate function to compute 'y': hidden group name '_x' \
         is not a group key in aggregate expressions"
    );

    let (_, output) = group_program(
        &schema("# a:int\tb"),
        &["_x = a * 2; k = _x + 1"],
        &["total = sum(_x)"],
    )
    .unwrap();
    assert_eq!(output.to_string(), "# k:int\ttotal:int");
}

#[test]
fn test_errors_name_clause() {
    let err = group_program(&schema("# a"), &["k = nope"], &["n = count()"]).unwrap_err();
    assert_eq!(err.to_string(), "Unknown identifier 'nope' in group expressions");

    let err = group_program(&schema("# a"), &["a"], &["n = count(a)"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: function 'count' takes 0 arguments, got 1 in aggregate expressions"
    );
}

#[test]
fn test_output_name_collision() {
    let err = group_program(&schema("# a"), &["a"], &["a = count()"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Duplicate field 'a' in aggregate expressions"
    );
}

#[test]
fn test_nothing_to_output() {
    let err = group_program(&schema("# a"), &["_k = a"], &["_n = count()"]).unwrap_err();
    assert_eq!(err, CompileError::Syntax("nothing to output in group program".to_string()));
}
