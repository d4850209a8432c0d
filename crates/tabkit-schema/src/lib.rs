// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Schema model for tab-separated streams.
//!
//! A stream starts with a header line describing its columns and the sort
//! order its producer asserts:
//!
//! ```text
//! # date\tclicks:int\tctr:float\t# ORDER: date, clicks:num:desc
//! ```
//!
//! - [`Schema`]: ordered [`Field`]s plus the asserted [`OrderField`] list
//! - [`header`]: parsing and formatting of the header line
//! - [`SchemaError`]: lookup, reconciliation and header errors
//!
//! The value type lattice itself lives in `tabkit-ast` and is re-exported
//! here as [`Type`].

mod error;
pub mod header;
mod schema;

pub use error::{SchemaError, SchemaResult};
pub use header::{parse_header, parse_order};
pub use schema::{Field, OrderField, OrderKind, Schema};
pub use tabkit_ast::Type;
