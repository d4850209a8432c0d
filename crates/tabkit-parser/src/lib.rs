//! Hand-written recursive descent parser for the tabkit expression language.
//!
//! Parses one expression string (a block of `;`/newline separated
//! statements) into [`tabkit_ast::Stmt`] nodes. Unsupported constructs are
//! rejected here with a message naming the construct, so the compiler only
//! ever sees the closed set of supported nodes.

pub mod parser;

pub use parser::{lex, parse_block, parse_expr, ParseError, ParseErrorKind, SpannedToken};

// Re-export lexer
pub use tabkit_lexer::Token;
