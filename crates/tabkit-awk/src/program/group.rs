//! Streaming grouped aggregation programs.

use std::fmt;

use tabkit_ast::Type;
use tabkit_schema::{Field, Schema};
use tracing::{debug, warn};

use super::join_statements;
use crate::compiler::{AggregateCompiler, StatementCompiler};
use crate::context::VarNames;
use crate::error::{Clause, CompileError, CompileResult};

/// A grouped aggregation over input sorted by the group keys:
///
/// ```text
/// {key statements;}
/// NR==1||k0!=key0||...{
///     if(NR>1)print k0,...,aggregates...;
///     k0=key0;...;
///     aggregator inits;
/// }
/// {aggregate steps;}
/// END{if(NR>0)print k0,...,aggregates...;}
/// ```
///
/// The first row starts a group without printing anything. Every later key
/// change prints the finished group before resetting. The last group is
/// printed at the end only if any row was read, so empty input yields no
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupProgram {
    /// Key assignments computed for every row.
    pub key_statements: Vec<String>,
    /// Key expressions compared against their cached values.
    pub keys: Vec<String>,
    /// Type of each key; string keys are compared as strings.
    pub key_types: Vec<Type>,
    /// Statements resetting aggregator state when a group starts.
    pub inits: Vec<String>,
    /// Aggregator steps and aggregate assignments run for every row.
    pub steps: Vec<String>,
    /// Aggregate expressions printed after the cached keys.
    pub aggregates: Vec<String>,
}

impl GroupProgram {
    /// Names of the variables caching the current group's keys.
    pub fn key_vars(&self) -> Vec<String> {
        (0..self.keys.len())
            .map(|index| format!("{}{:x}", VarNames::KEY, index))
            .collect()
    }

    /// Key expressions as cached and compared.
    ///
    /// awk compares two numeric-looking values as numbers, so `01` and `1`
    /// would be the same key. Concatenating `""` forces a string comparison
    /// for string keys.
    pub fn key_values(&self) -> Vec<String> {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| match self.key_types.get(index) {
                Some(Type::String) => format!("({} \"\")", key),
                _ => key.clone(),
            })
            .collect()
    }
}

impl fmt::Display for GroupProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_vars = self.key_vars();
        let key_values = self.key_values();
        let printed: Vec<&str> = key_vars
            .iter()
            .chain(&self.aggregates)
            .map(String::as_str)
            .collect();
        let print = format!("print {};", printed.join(","));

        if !self.key_statements.is_empty() {
            write!(f, "{{{}}}", join_statements(&self.key_statements))?;
        }

        f.write_str("NR==1")?;
        for (var, key) in key_vars.iter().zip(&key_values) {
            write!(f, "||{}!={}", var, key)?;
        }

        let cache: Vec<String> = key_vars
            .iter()
            .zip(&key_values)
            .map(|(var, key)| format!("{}={}", var, key))
            .collect();
        write!(
            f,
            "{{if(NR>1){}{}{}}}",
            print,
            join_statements(&cache),
            join_statements(&self.inits)
        )?;

        if !self.steps.is_empty() {
            write!(f, "{{{}}}", join_statements(&self.steps))?;
        }

        write!(f, "END{{if(NR>0){}}}", print)
    }
}

/// Compile a group operator.
///
/// `keys` are assignment blocks whose output names are the group keys;
/// `aggregates` are assignment blocks evaluated per group. The output schema
/// is the key columns followed by the aggregate columns.
///
/// # Errors
/// Failures are wrapped with the clause they occurred in. A group with
/// nothing to print is a syntax error.
pub fn group_program<S: AsRef<str>>(
    schema: &Schema,
    keys: &[S],
    aggregates: &[S],
) -> CompileResult<(GroupProgram, Schema)> {
    let mut group = StatementCompiler::new(schema);
    group
        .compile_all(keys)
        .map_err(|err| err.in_clause(Clause::Group))?;
    let group = group.finish();

    let mut aggregate = AggregateCompiler::new(schema, &group.context);
    aggregate
        .compile_all(aggregates)
        .map_err(|err| err.in_clause(Clause::Aggregate))?;
    let aggregate = aggregate.finish();

    if group.context.output_count() == 0 && aggregate.context.output_count() == 0 {
        return Err(CompileError::syntax("nothing to output in group program"));
    }

    let key_schema = group
        .context
        .output_schema(schema)
        .map_err(|err| CompileError::from(err).in_clause(Clause::Group))?;
    if key_schema.order().len() < key_schema.len() {
        warn!(
            keys = %key_schema,
            input = %schema,
            "group keys are not all covered by the input order; groups may repeat"
        );
    }

    let aggregate_schema = Schema::new(
        aggregate
            .context
            .outputs()
            .map(|(name, expr)| Field::new(name, expr.ty()))
            .collect(),
        Vec::new(),
    )
    .map_err(|err| CompileError::from(err).in_clause(Clause::Aggregate))?;
    let output_schema = key_schema
        .concat(&aggregate_schema)
        .map_err(|err| CompileError::from(err).in_clause(Clause::Aggregate))?;

    let program = GroupProgram {
        key_statements: group.code,
        keys: group.context.output_code(),
        key_types: group.context.outputs().map(|(_, expr)| expr.ty()).collect(),
        inits: aggregate.init_code(),
        steps: aggregate.steps,
        aggregates: aggregate.context.output_code(),
    };

    debug!(
        keys = program.keys.len(),
        aggregators = aggregate.aggregators.len(),
        "compiled group program"
    );
    Ok((program, output_schema))
}
