// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Expression compiler targeting awk.
//!
//! Turns blocks of the tabkit expression language into awk program text and
//! derives the schema of the rows the program prints.
//!
//! # Pipeline
//!
//! ```text
//! Schema + expression strings
//!     → StatementCompiler   (outputs / group keys → Context)
//!     → ConditionCompiler   (filters over that Context)
//!     → AggregateCompiler   (aggregates over the group-key Context)
//!     → MapProgram / GroupProgram + output Schema
//! ```
//!
//! # Example
//!
//! ```rust
//! use tabkit_awk::map_program;
//! use tabkit_schema::Schema;
//!
//! let schema: Schema = "# a:int\tb:int".parse().unwrap();
//! let (program, output) = map_program(&schema, &["a", "total = a + b"], &["total > 2"]).unwrap();
//! assert_eq!(program.to_string(), "{__var__0=($1+$2);}(__var__0>2){print $1,__var__0;}");
//! assert_eq!(output.to_string(), "# a:int\ttotal:int");
//! ```

pub mod compiler;
pub mod context;
mod error;
pub mod expr;
pub mod functions;
pub mod pipeline;
pub mod program;

pub use context::Context;
pub use error::{Clause, CompileError, CompileResult};
pub use expr::{CompiledExpr, ValueKind};
pub use pipeline::{CompiledPipeline, ConfigError, Pipeline, Stage};
pub use program::{awk_args, group_program, map_program, GroupProgram, MapProgram, Program};
