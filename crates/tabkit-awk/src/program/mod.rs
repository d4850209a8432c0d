//! Program assemblers.
//!
//! - `map`: stateless per-row programs with an optional filter
//! - `group`: streaming aggregation over key-sorted input

mod group;
mod map;

pub use group::{group_program, GroupProgram};
pub use map::{map_program, MapProgram};

use std::fmt;

/// A compiled awk program of either shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Row-wise map/filter.
    Map(MapProgram),
    /// Grouped aggregation.
    Group(GroupProgram),
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Map(program) => program.fmt(f),
            Program::Group(program) => program.fmt(f),
        }
    }
}

/// Arguments for running `program` with awk over `separator`-delimited
/// input, e.g. `awk -F '\t' -v 'OFS=\t' '<program>'`.
pub fn awk_args(separator: &str, program: &impl fmt::Display) -> Vec<String> {
    vec![
        "-F".to_string(),
        separator.to_string(),
        "-v".to_string(),
        format!("OFS={}", separator),
        program.to_string(),
    ]
}

fn join_statements(statements: &[String]) -> String {
    statements.iter().map(|s| format!("{};", s)).collect()
}
