//! Hand-written recursive descent parser.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError
//! - `expr`: Expression parser using Pratt parsing
//! - `stmt`: Statement blocks (assignments and bare expressions)
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse_block(source: &str) -> Result<Vec<Stmt>, ParseError>
//! pub fn parse_expr(source: &str) -> Result<Expr, ParseError>
//! ```

mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

mod expr;
mod stmt;

use logos::Logos;
use std::ops::Range;
use tabkit_ast::{Expr, Span, Stmt};
use tabkit_lexer::Token;

/// A token paired with its byte range in the source.
pub type SpannedToken = (Token, Range<usize>);

/// Tokenize `source`, failing on the first unlexable construct.
///
/// # Errors
/// Returns [`ParseErrorKind::InvalidToken`] naming the offending text, e.g.
/// `.` for attribute access or `[` for subscripts.
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    for (result, range) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, range)),
            Err(()) => {
                let text = &source[range.clone()];
                return Err(ParseError::invalid_token(
                    text,
                    Span::new(range.start, range.end),
                ));
            }
        }
    }
    Ok(tokens)
}

/// Parse a block of statements separated by `;` or newlines.
///
/// Empty statements are skipped, so `"a;;b;"` yields two statements and
/// `""` yields none.
pub fn parse_block(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = lex(source)?;
    let mut stream = TokenStream::new(&tokens);
    stmt::parse_block(&mut stream)
}

/// Parse a single expression spanning the whole input.
pub fn parse_expr(source: &str) -> Result<Expr, ParseError> {
    let tokens = lex(source)?;
    let mut stream = TokenStream::new(&tokens);
    let expr = expr::parse_expr(&mut stream)?;
    if let Some(token) = stream.peek() {
        return Err(ParseError::unexpected_token(
            Some(token),
            "after expression",
            stream.current_span(),
        ));
    }
    Ok(expr)
}
