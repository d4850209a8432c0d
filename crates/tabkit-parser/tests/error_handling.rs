//! Error handling tests for the expression parser.
//!
//! Every unsupported construct must be rejected with a message that names
//! it, since the compiler relies on the parser for the closed grammar.

use tabkit_parser::{parse_block, parse_expr, ParseError, ParseErrorKind};

fn expect_error(source: &str) -> ParseError {
    match parse_block(source) {
        Ok(stmts) => panic!("Expected parse error for {:?}, got {:?}", source, stmts),
        Err(error) => error,
    }
}

// =============================================================================
// Unsupported constructs
// =============================================================================

#[test]
fn test_chained_comparison_rejected() {
    let error = expect_error("a < b < c");
    assert_eq!(error.kind, ParseErrorKind::Unsupported);
    assert!(error.message.contains("multiple comparators"));

    let error = expect_error("a == b != c");
    assert!(error.message.contains("multiple comparators"));

    let error = expect_error("x = 1 + a < b <= c");
    assert!(error.message.contains("multiple comparators"));
}

#[test]
fn test_not_inside_comparison_operand_rejected() {
    let error = expect_error("a == not b == c");
    assert_eq!(error.kind, ParseErrorKind::Unsupported);
    assert!(error.message.contains("'not' must be parenthesized"));
    assert_eq!(error.span.start, 5);

    let error = expect_error("x = 1 + not a");
    assert!(error.message.contains("'not' must be parenthesized"));

    let error = expect_error("x = -not a");
    assert!(error.message.contains("'not' must be parenthesized"));

    // Parenthesized, the operand is a single expression again.
    assert!(parse_block("a == (not b == c)").is_ok());
    assert!(parse_block("a and not b == c").is_ok());
}

#[test]
fn test_keyword_arguments_rejected() {
    for source in ["sprintf(fmt=a)", "log(a, base=2)", "f(*xs)", "f(**kw)"] {
        let error = expect_error(source);
        assert_eq!(error.kind, ParseErrorKind::Unsupported, "{}", source);
        assert!(
            error.message.contains("only positional arguments"),
            "{}: {}",
            source,
            error.message
        );
    }
}

#[test]
fn test_multiple_targets_rejected() {
    let error = expect_error("a = b = 1");
    assert_eq!(error.kind, ParseErrorKind::Unsupported);
    assert!(error.message.contains("multiple targets"));
}

#[test]
fn test_assignment_to_expression_rejected() {
    let error = expect_error("a + 1 = 2");
    assert_eq!(error.kind, ParseErrorKind::InvalidSyntax);
    assert_eq!(error.message, "cannot assign to binary operation");

    let error = expect_error("log(a) = 2");
    assert_eq!(error.message, "cannot assign to call");
}

#[test]
fn test_unknown_characters_name_the_construct() {
    let error = expect_error("a.b");
    assert_eq!(error.kind, ParseErrorKind::InvalidToken);
    assert_eq!(error.message, "'.' is not supported");

    let error = expect_error("a[0]");
    assert_eq!(error.message, "'[' is not supported");

    let error = expect_error("a % 2");
    assert_eq!(error.message, "'%' is not supported");
}

#[test]
fn test_calling_non_names_rejected() {
    let error = expect_error("(log)(a)");
    assert_eq!(error.kind, ParseErrorKind::InvalidSyntax);

    let error = expect_error("1(2)");
    assert!(error.message.contains("number cannot be called"));
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn test_unexpected_eof() {
    let error = expect_error("a +");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);

    let error = expect_error("log(a");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
    assert!(error.message.contains("expected ','"));

    let error = expect_error("x =");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_unclosed_and_stray_parentheses() {
    let error = expect_error("(a + b");
    assert!(error.message.contains("expected ')'"));

    let error = expect_error("a + b)");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);
    assert!(error.message.contains("after statement"));
}

#[test]
fn test_missing_separator_between_statements() {
    let error = expect_error("a b");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(error.span.start, 2);
}

#[test]
fn test_display_is_single_line_with_location() {
    let error = expect_error("a < b < c");
    let rendered = error.to_string();
    assert!(rendered.starts_with("Syntax error: multiple comparators are not supported"));
    assert!(rendered.ends_with("at 6..7"));
    assert!(!rendered.contains('\n'));
}

#[test]
fn test_parse_expr_rejects_trailing_tokens() {
    let error = parse_expr("a b").unwrap_err();
    assert!(error.message.contains("after expression"));
    assert!(parse_expr("a = 1").is_err());
}
