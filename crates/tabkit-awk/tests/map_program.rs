//! Map program compilation: generated text, output schemas and errors.

use tabkit_awk::{map_program, Clause, CompileError};
use tabkit_schema::Schema;

fn schema(header: &str) -> Schema {
    header.parse().expect("valid header")
}

fn expect_error(header: &str, outputs: &[&str], filters: &[&str]) -> CompileError {
    match map_program(&schema(header), outputs, filters) {
        Ok((program, _)) => panic!("Expected compile error, got program {}", program),
        Err(error) => error,
    }
}

#[test]
fn test_full_program() {
    let (program, output) = map_program(
        &schema("# a, b, c, d"),
        &[
            "a=b+c;b=a/c;_hidden=a*3;",
            "new=_hidden/3",
            "b=a+1",
            "a2=a",
            "a",
            "b",
            "c",
            "d",
        ],
        &["new==a*d or new==d*a", "_hidden>=new"],
    )
    .unwrap();

    assert_eq!(
        program.row_statements,
        vec![
            "__var__0=($2+$3)",
            "__var__1=($1/$3)",
            "__var__2=($1*3)",
            "__var__3=(__var__2/3)",
            "__var__1=($1+1)",
            "__var__0=$1",
            "__var__1=$2",
        ]
    );
    assert_eq!(
        program.to_string(),
        "{__var__0=($2+$3);__var__1=($1/$3);__var__2=($1*3);__var__3=(__var__2/3);\
         __var__1=($1+1);__var__0=$1;__var__1=$2;}\
         ((__var__3==($1*$4))||(__var__3==($4*$1)))&&(__var__2>=__var__3)\
         {print __var__0,__var__1,__var__3,$1,$3,$4;}"
    );
    assert_eq!(output.to_string(), "# a\tb\tnew:float\ta2\tc\td");
}

#[test]
fn test_renaming_a_column_emits_no_code() {
    let (program, output) = map_program(&schema("# a\tb:int"), &["x = b; y = x"], &[]).unwrap();
    assert!(program.row_statements.is_empty());
    assert_eq!(program.to_string(), "{print $2,$2;}");
    assert_eq!(output.to_string(), "# x:int\ty:int");
}

#[test]
fn test_in_place_rebinding_uses_one_variable() {
    let (program, _) = map_program(&schema("# b:int"), &["a = b+1; a = a*2"], &[]).unwrap();
    assert_eq!(
        program.row_statements,
        vec!["__var__0=($1+1)", "__var__0=(__var__0*2)"]
    );
    assert_eq!(program.output, vec!["__var__0"]);
}

#[test]
fn test_hidden_names_never_output() {
    let (program, output) = map_program(
        &schema("# a:int"),
        &["_double = a * 2; quad = _double * 2; _unused = 1"],
        &["_double > 2"],
    )
    .unwrap();
    assert_eq!(output.to_string(), "# quad:int");
    assert_eq!(program.output, vec!["__var__1"]);
    assert_eq!(program.conditions, vec!["(__var__0>2)"]);
}

#[test]
fn test_output_order_is_registration_order() {
    let (_, output) = map_program(&schema("# a\tb\tc"), &["c", "a", "b"], &[]).unwrap();
    assert_eq!(output.to_string(), "# c\ta\tb");
}

#[test]
fn test_pass_through_keeps_input_schema() {
    let input = schema("# a:int\tb\t# ORDER: a:num");
    let (program, output) = map_program(&input, &[] as &[&str], &["a > 3"]).unwrap();
    assert_eq!(program.to_string(), "($1>3){print $0;}");
    assert_eq!(output, input);

    let (program, output) = map_program(&input, &["_x = a * a"], &["_x < 100"]).unwrap();
    assert_eq!(program.to_string(), "{__var__0=($1*$1);}(__var__0<100){print $0;}");
    assert_eq!(output, input);
}

#[test]
fn test_order_survives_plain_column_outputs() {
    let input = schema("# a\tb:int\tc\t# ORDER: a, b:num:desc, c");

    let (_, output) = map_program(&input, &["key = a", "b", "x = c + 1"], &[]).unwrap();
    assert_eq!(
        output.to_string(),
        "# key\tb:int\tx:int\t# ORDER: key, b:num:desc"
    );

    let (_, output) = map_program(&input, &["b", "c"], &[]).unwrap();
    assert!(output.order().is_empty());
}

#[test]
fn test_language_extensions() {
    let (program, output) = map_program(
        &schema("# a:int\tb:float\tflag"),
        &["neg = -a; p = a ** 2; inv = not bool(flag); e = exp(b); t = int(log(b))"],
        &[],
    )
    .unwrap();
    assert_eq!(
        program.row_statements,
        vec![
            "__var__0=(-$1)",
            "__var__1=($1^2)",
            r#"__var__2=(!((($3)"")!="0"&&(($3)"")!=""))"#,
            "__var__3=exp($2)",
            "__var__4=int(log($2))",
        ]
    );
    assert_eq!(
        output.to_string(),
        "# neg:int\tp:int\tinv:bool\te:float\tt:int"
    );
}

#[test]
fn test_string_literals_are_escaped() {
    let (program, _) = map_program(
        &schema("# a"),
        &[r#"label = sprintf("%s \"x\"", a)"#],
        &[],
    )
    .unwrap();
    assert_eq!(
        program.row_statements,
        vec![r#"__var__0=sprintf("%s \"x\"",$1)"#]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unknown_identifier_names_clause() {
    let error = expect_error("# a", &["x = nope"], &[]);
    assert_eq!(
        error.to_string(),
        "Unknown identifier 'nope' in output expressions"
    );

    let error = expect_error("# a", &["a"], &["missing > 1"]);
    assert_eq!(
        error.to_string(),
        "Unknown identifier 'missing' in filter expressions"
    );
    match error {
        CompileError::InClause { clause, source } => {
            assert_eq!(clause, Clause::Filter);
            assert_eq!(
                *source,
                CompileError::UnknownIdentifier("missing".to_string())
            );
        }
        other => panic!("expected clause wrapper, got {:?}", other),
    }
}

#[test]
fn test_syntax_errors_name_construct() {
    let error = expect_error("# a", &["x = a < 1 < 2"], &[]);
    assert!(error
        .to_string()
        .starts_with("Syntax error: multiple comparators are not supported"));
    assert!(error.to_string().ends_with("in output expressions"));

    let error = expect_error("# a", &["x = log(a, base=2)"], &[]);
    assert!(error
        .to_string()
        .contains("only positional arguments to functions allowed"));

    let error = expect_error("# a", &["x = a.real"], &[]);
    assert!(error.to_string().contains("'.' is not supported"));

    let error = expect_error("# a", &["x = a % 2"], &[]);
    assert!(error.to_string().contains("'%' is not supported"));
}

#[test]
fn test_unknown_and_aggregate_functions() {
    let error = expect_error("# a", &["x = sqrt(a)"], &[]);
    assert_eq!(
        error.to_string(),
        "Syntax error: unknown function 'sqrt' in output expressions"
    );

    let error = expect_error("# a", &["x = sum(a)"], &[]);
    assert!(error
        .to_string()
        .contains("aggregate function 'sum' is only allowed in aggregate expressions"));
}

#[test]
fn test_assignment_in_filter_rejected() {
    let error = expect_error("# a", &["a"], &["a = 1"]);
    assert_eq!(
        error.to_string(),
        "Syntax error: assignment to 'a' is not allowed in filter expressions"
    );
}

#[test]
fn test_bare_expression_in_output_rejected() {
    let error = expect_error("# a", &["a + 1"], &[]);
    assert!(error
        .to_string()
        .contains("assign statements or field names expected"));
}
