// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for the tabkit expression language
//!
//! This crate contains the statement/expression node definitions produced by
//! the parser and the foundation types (spans, operators, the value type
//! lattice) shared by the schema model and the awk compiler.

pub mod ast;
pub mod foundation;

// Re-export commonly used types
pub use foundation::{parse_boolean, BinaryOp, Span, Type, UnaryOp};

pub use ast::*;
