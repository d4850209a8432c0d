//! Schema errors.

use thiserror::Error;

/// Errors raised while building, parsing or reconciling schemas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The header line does not start with `#` or declares no fields.
    #[error("Bad header")]
    BadHeader,

    /// A field declares a type outside `str`, `float`, `int`, `bool`.
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// An `ORDER:` entry is not `name[:kind][:desc|:asc]`.
    #[error("Bad order format '{0}'")]
    BadOrderFormat(String),

    /// An order entry names a field the schema does not have.
    #[error("Unknown order field '{0}'")]
    UnknownOrderField(String),

    /// Lookup of a field that does not exist.
    #[error("No such field '{0}'")]
    NoSuchField(String),

    /// Two fields share a name.
    #[error("Duplicate field '{0}'")]
    DuplicateField(String),

    /// Positional reconciliation failed.
    #[error("Incompatible headers: {0}")]
    Incompatible(String),
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
