//! Precedence and associativity tests for the expression parser.
//!
//! Expressions are rendered as fully parenthesized S-expressions so the
//! expected tree shape is visible in each assertion.

use tabkit_ast::{Expr, ExprKind, StmtKind};
use tabkit_parser::{parse_block, parse_expr};

fn sexpr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Integer(n) => n.to_string(),
        ExprKind::Float(x) => format!("{:?}", x),
        ExprKind::String(s) => format!("{:?}", s),
        ExprKind::Name(name) => name.clone(),
        ExprKind::Binary { op, left, right } => {
            format!("({} {} {})", op.symbol(), sexpr(left), sexpr(right))
        }
        ExprKind::Unary { op, operand } => format!("({} {})", op.symbol(), sexpr(operand)),
        ExprKind::Call { function, args } => {
            let args: Vec<String> = args.iter().map(sexpr).collect();
            format!("({} {})", function, args.join(" "))
        }
    }
}

fn parse(source: &str) -> String {
    sexpr(&parse_expr(source).expect("expression should parse"))
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(parse("a + b * c"), "(+ a (* b c))");
    assert_eq!(parse("a * b + c"), "(+ (* a b) c)");
    assert_eq!(parse("(a + b) * c"), "(* (+ a b) c)");
    assert_eq!(parse("a - b - c"), "(- (- a b) c)");
    assert_eq!(parse("a / b / c"), "(/ (/ a b) c)");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(parse("a ** b ** c"), "(** a (** b c))");
    assert_eq!(parse("2 * a ** 2"), "(* 2 (** a 2))");
}

#[test]
fn test_unary_minus_binds_looser_than_power() {
    assert_eq!(parse("-a ** 2"), "(- (** a 2))");
    assert_eq!(parse("-a * 2"), "(* (- a) 2)");
    assert_eq!(parse("2 ** -a"), "(** 2 (- a))");
    assert_eq!(parse("a - -b"), "(- a (- b))");
}

#[test]
fn test_comparison_below_arithmetic() {
    assert_eq!(parse("a + 1 >= b * 2"), "(>= (+ a 1) (* b 2))");
    assert_eq!(parse("a != \"x\""), "(!= a \"x\")");
}

#[test]
fn test_boolean_operators() {
    assert_eq!(parse("a or b and c"), "(or a (and b c))");
    assert_eq!(parse("a and b or c"), "(or (and a b) c)");
    assert_eq!(
        parse("a == 1 or b < 2 and c > 3"),
        "(or (== a 1) (and (< b 2) (> c 3)))"
    );
}

#[test]
fn test_not_binds_looser_than_comparison() {
    assert_eq!(parse("not a == b"), "(not (== a b))");
    assert_eq!(parse("not a and b"), "(and (not a) b)");
    assert_eq!(parse("not not a"), "(not (not a))");
}

#[test]
fn test_parenthesized_comparisons_may_nest() {
    assert_eq!(parse("(a < b) == (c < d)"), "(== (< a b) (< c d))");
}

#[test]
fn test_calls() {
    assert_eq!(parse("log(a)"), "(log a)");
    assert_eq!(parse("count()"), "(count )");
    assert_eq!(
        parse("sprintf(\"%d-%d\", a, b + 1)"),
        "(sprintf \"%d-%d\" a (+ b 1))"
    );
    assert_eq!(parse("2 ** int(log(b))"), "(** 2 (int (log b)))");
}

#[test]
fn test_literals() {
    assert_eq!(parse("42"), "42");
    assert_eq!(parse("2.5"), "2.5");
    assert_eq!(parse("'quoted'"), "\"quoted\"");
}

#[test]
fn test_block_statements() {
    let block = parse_block("a=b+c;b=a/c;_hidden=a*3;\nnew\n").expect("block should parse");
    assert_eq!(block.len(), 4);

    let targets: Vec<&str> = block
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Assign { target, .. } => target.as_str(),
            StmtKind::Expr(expr) => expr.as_name().expect("bare name"),
        })
        .collect();
    assert_eq!(targets, vec!["a", "b", "_hidden", "new"]);

    match &block[1].kind {
        StmtKind::Assign { value, .. } => assert_eq!(sexpr(value), "(/ a c)"),
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_empty_blocks() {
    assert!(parse_block("").unwrap().is_empty());
    assert!(parse_block(" ; ;\n ").unwrap().is_empty());
    assert!(parse_block("# only a comment").unwrap().is_empty());
}

#[test]
fn test_spans_cover_source() {
    let expr = parse_expr("a + log(b)").unwrap();
    assert_eq!(expr.span.start, 0);
    assert_eq!(expr.span.end, 10);

    let block = parse_block("x = 1; total = a * 2").unwrap();
    assert_eq!(block[1].span.start, 7);
    assert_eq!(block[1].span.end, 20);
}
