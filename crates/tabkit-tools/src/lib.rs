//! Tabkit Tools
//!
//! CLI support for compiling tabkit expressions into awk programs.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tabkit_schema::{parse_header, Schema, SchemaError};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Logs go to stderr so program text on stdout stays clean.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Errors from reading stream headers.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("failed to read {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: io::Error,
    },

    #[error("{source_name} is empty, expected a header line")]
    Empty { source_name: String },

    #[error("{source_name}: {error}")]
    Schema {
        source_name: String,
        #[source]
        error: SchemaError,
    },
}

/// Read the header line at the start of a stream.
///
/// `source_name` only labels errors.
pub fn read_header<R: BufRead>(mut reader: R, source_name: &str) -> Result<Schema, HeaderError> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(|error| HeaderError::Io {
        source_name: source_name.to_string(),
        error,
    })?;
    if read == 0 {
        return Err(HeaderError::Empty {
            source_name: source_name.to_string(),
        });
    }
    parse_header(&line).map_err(|error| HeaderError::Schema {
        source_name: source_name.to_string(),
        error,
    })
}

/// Read the header of every file and reconcile them into one schema, the
/// way concatenating the files would.
pub fn read_headers(paths: &[PathBuf]) -> Result<Schema, HeaderError> {
    let mut schemas = Vec::with_capacity(paths.len());
    for path in paths {
        schemas.push(read_file_header(path)?);
    }
    let combined = Schema::generic_all(&schemas).map_err(|error| HeaderError::Schema {
        source_name: describe(paths),
        error,
    })?;
    debug!(inputs = paths.len(), schema = %combined, "read input headers");
    Ok(combined)
}

fn read_file_header(path: &Path) -> Result<Schema, HeaderError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|error| HeaderError::Io {
        source_name: source_name.clone(),
        error,
    })?;
    read_header(BufReader::new(file), &source_name)
}

fn describe(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
