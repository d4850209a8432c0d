//! Parse error types.

use std::fmt;
use tabkit_ast::Span;
use tabkit_lexer::Token;

/// Parse error with source location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Source location where error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unexpected token encountered where a specific token was expected.
    ///
    /// Example: `log(a b)` (expected `,` or `)`).
    UnexpectedToken,

    /// Unexpected end of input while parsing was incomplete.
    ///
    /// Example: `a +` or `log(a`.
    UnexpectedEof,

    /// Text the lexer does not recognize.
    ///
    /// Covers attribute access, subscripts and operators outside the
    /// language, e.g. `a.b`, `a[0]`, `a % b`.
    InvalidToken,

    /// A recognizable construct the language deliberately does not support.
    ///
    /// Example: `a < b < c`, `f(x=1)`, `a = b = 1`.
    Unsupported,

    /// Tokens are present but violate the grammar.
    ///
    /// Example: `a + 1 = 2` (assignment to a non-name).
    InvalidSyntax,
}

impl ParseError {
    /// Create an "expected token" error.
    pub fn expected_token(expected: Token, found: Option<&Token>, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("expected '{}', found '{}'", expected, token),
            None => format!("expected '{}', found end of input", expected),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("unexpected '{}' {}", token, context),
            None => format!("unexpected end of input {}", context),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "invalid token" error for unlexable text.
    pub fn invalid_token(text: &str, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidToken,
            span,
            message: format!("'{}' is not supported", text),
        }
    }

    /// Create an "unsupported construct" error.
    pub fn unsupported(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Unsupported,
            span,
            message: message.into(),
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error: {} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}
