//! Compilation errors.

use std::fmt;

use tabkit_parser::ParseError;
use tabkit_schema::SchemaError;
use thiserror::Error;

/// The clause of an operator an expression belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    /// Map output expressions.
    Output,
    /// Map filter expressions.
    Filter,
    /// Group key expressions.
    Group,
    /// Group aggregate expressions.
    Aggregate,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Clause::Output => "output",
            Clause::Filter => "filter",
            Clause::Group => "group",
            Clause::Aggregate => "aggregate",
        })
    }
}

/// Errors raised while compiling expressions into a program.
///
/// Every variant renders as a single line naming the offending construct.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The expression text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A parsed construct is not valid where it appears.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A name is neither a column nor a bound name.
    #[error("Unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// A call to a function outside the allow-list.
    #[error("Syntax error: unknown function '{0}'")]
    UnknownFunction(String),

    /// Output schema could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// An aggregate block assigned a value that varies within a group.
    #[error("Syntax error: need aggregate function to compute '{0}'")]
    NeedAggregate(String),

    /// An aggregate block read a hidden group name outside an aggregate
    /// function. Hidden names are not compared at group boundaries, so
    /// they may vary within a group.
    #[error("Syntax error: need aggregate function to compute '{target}': hidden group name '{name}' is not a group key")]
    HiddenGroupName {
        /// The assignment target.
        target: String,
        /// The hidden name read.
        name: String,
    },

    /// Error located in one clause of an operator.
    #[error("{source} in {clause} expressions")]
    InClause {
        /// The failing clause.
        clause: Clause,
        /// The underlying error.
        source: Box<CompileError>,
    },

    /// Error located in one stage of a pipeline.
    #[error("stage {index}: {source}")]
    InStage {
        /// Zero-based stage index.
        index: usize,
        /// The underlying error.
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Attach the clause the error occurred in.
    pub fn in_clause(self, clause: Clause) -> Self {
        CompileError::InClause {
            clause,
            source: Box::new(self),
        }
    }

    /// Attach the pipeline stage the error occurred in.
    pub fn in_stage(self, index: usize) -> Self {
        CompileError::InStage {
            index,
            source: Box::new(self),
        }
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        CompileError::Syntax(message.into())
    }
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
