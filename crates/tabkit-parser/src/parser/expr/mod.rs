//! Expression parser using Pratt parsing (precedence climbing).
//!
//! ## Precedence Levels (lowest to highest)
//!
//! 1. `or` - left associative
//! 2. `and` - left associative
//! 3. `not` - prefix
//! 4. `==`, `!=`, `<`, `<=`, `>`, `>=` - non-associative (no chaining)
//! 5. `+`, `-` - left associative
//! 6. `*`, `/` - left associative
//! 7. Unary `-` - prefix
//! 8. `**` - right associative
//!
//! ## Module Organization
//!
//! - `pratt` - Pratt parser core (precedence climbing, binary/unary ops)
//! - `atoms` - Atomic expressions (literals, names, calls, parenthesized)

mod atoms;
mod pratt;

use super::{ParseError, TokenStream};
use tabkit_ast::Expr;

/// Parse an expression.
pub(super) fn parse_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    pratt::parse_pratt(stream, 0)
}
