//! Name bindings accumulated while compiling a block of statements.

use indexmap::{IndexMap, IndexSet};
use tabkit_schema::{Field, OrderField, Schema, SchemaResult};
use tracing::trace;

use crate::expr::{CompiledExpr, ValueKind};

/// Names starting with this marker are private: usable by later
/// expressions but never emitted as output columns.
pub const HIDDEN_PREFIX: char = '_';

/// Whether `name` is a private name.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_PREFIX)
}

/// Generator of temporary variable names, `<prefix><hex counter>`.
///
/// Owned by a single compilation, so concurrent compilations never share
/// a counter.
#[derive(Debug, Clone)]
pub struct VarNames {
    prefix: &'static str,
    next: usize,
}

impl VarNames {
    /// Temporaries of statement blocks.
    pub const VARIABLE: &'static str = "__var__";
    /// Aggregators and temporaries of aggregate blocks.
    pub const AGGREGATE: &'static str = "__aggr__";
    /// Cached group key values.
    pub const KEY: &'static str = "__key__";

    /// Start a sequence at zero.
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    /// Next unused name.
    pub fn fresh(&mut self) -> String {
        let name = format!("{}{:x}", self.prefix, self.next);
        self.next += 1;
        trace!(var = %name, "allocated temporary");
        name
    }
}

/// Insertion-ordered map from user-visible names to their current value,
/// plus the names registered as output columns.
///
/// A context is built by one compiler and then handed, read-only, to the
/// next: output bindings to filters, group keys to aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    bindings: IndexMap<String, CompiledExpr>,
    outputs: IndexSet<String>,
}

impl Context {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current binding of `name`.
    pub fn get(&self, name: &str) -> Option<&CompiledExpr> {
        self.bindings.get(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Whether `name` is a registered output column.
    pub fn is_output(&self, name: &str) -> bool {
        self.outputs.contains(name)
    }

    /// All bindings in first-assignment order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &CompiledExpr)> {
        self.bindings.iter().map(|(name, expr)| (name.as_str(), expr))
    }

    /// Output columns in registration order, resolved through the final
    /// bindings.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &CompiledExpr)> {
        self.outputs.iter().filter_map(|name| {
            self.bindings
                .get(name)
                .map(|expr| (name.as_str(), expr))
        })
    }

    /// Number of output columns.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Awk code of each output column, for a `print` statement.
    pub fn output_code(&self) -> Vec<String> {
        self.outputs().map(|(_, expr)| expr.code().to_string()).collect()
    }

    /// Schema of the output columns, carrying over the prefix of `input`'s
    /// order that survives as unchanged column reads.
    pub fn output_schema(&self, input: &Schema) -> SchemaResult<Schema> {
        let fields = self
            .outputs()
            .map(|(name, expr)| Field::new(name, expr.ty()))
            .collect();
        Schema::new(fields, self.derived_order(input))
    }

    /// Input order keys that survive, renamed to the output reading them.
    ///
    /// Stops at the first key whose column is not output as a plain read.
    pub fn derived_order(&self, input: &Schema) -> Vec<OrderField> {
        let mut order = Vec::new();
        for key in input.order() {
            let Ok(index) = input.index(&key.name) else {
                break;
            };
            let output = self
                .outputs()
                .find(|(_, expr)| expr.kind() == ValueKind::Column(index));
            match output {
                Some((name, _)) => order.push(key.renamed(name)),
                None => break,
            }
        }
        order
    }

    /// Bind `target` to `value`, returning the awk statement to emit.
    ///
    /// - a new name bound to a simple reference is an alias, no code
    /// - rebinding a name to its own current value emits nothing
    /// - a name already stored in a temporary is updated in place
    /// - anything else gets a fresh temporary from `vars`
    ///
    /// Non-hidden names are registered as outputs on first assignment.
    pub(crate) fn assign(
        &mut self,
        target: &str,
        value: CompiledExpr,
        vars: &mut VarNames,
    ) -> Option<String> {
        if !is_hidden(target) {
            self.outputs.insert(target.to_string());
        }

        let slot = match self.bindings.get(target) {
            None if value.is_simple_reference() => {
                self.bindings.insert(target.to_string(), value);
                return None;
            }
            Some(current) if current.code() == value.code() => return None,
            Some(current) if current.kind() == ValueKind::Variable => current.code().to_string(),
            _ => vars.fresh(),
        };

        let statement = format!("{}={}", slot, value.code());
        self.bindings
            .insert(target.to_string(), CompiledExpr::variable(slot, value));
        Some(statement)
    }
}
