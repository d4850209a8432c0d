//! Scalar and aggregate function tables.

use tabkit_ast::Type;

use crate::error::{CompileError, CompileResult};
use crate::expr::{quote, CompiledExpr};

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exactly(usize),
    /// At least `n` arguments.
    AtLeast(usize),
    /// Between `min` and `max` arguments, inclusive.
    Between(usize, usize),
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(min, max) => (min..=max).contains(&count),
        }
    }

    fn describe(self) -> String {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match self {
            Arity::Exactly(n) => format!("{} {}", n, plural(n)),
            Arity::AtLeast(n) => format!("at least {} {}", n, plural(n)),
            Arity::Between(min, max) => format!("{} to {} arguments", min, max),
        }
    }

    /// Reject calls of `function` with the wrong number of arguments.
    pub fn check(self, function: &str, count: usize) -> CompileResult<()> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(CompileError::syntax(format!(
                "function '{}' takes {}, got {}",
                function,
                self.describe(),
                count
            )))
        }
    }
}

/// Per-row functions, available in every clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFunction {
    /// `int(x)`: truncate toward zero.
    Int,
    /// `sprintf(fmt, ...)`: printf-style formatting.
    Sprintf,
    /// `log(x)`: natural logarithm.
    Log,
    /// `exp(x)`: exponential.
    Exp,
    /// `bool(x)`: truthiness as 0/1.
    Bool,
}

impl ScalarFunction {
    /// Look up a function by its expression-language name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ScalarFunction::Int),
            "sprintf" => Some(ScalarFunction::Sprintf),
            "log" => Some(ScalarFunction::Log),
            "exp" => Some(ScalarFunction::Exp),
            "bool" => Some(ScalarFunction::Bool),
            _ => None,
        }
    }

    /// Expression-language name.
    pub fn name(self) -> &'static str {
        match self {
            ScalarFunction::Int => "int",
            ScalarFunction::Sprintf => "sprintf",
            ScalarFunction::Log => "log",
            ScalarFunction::Exp => "exp",
            ScalarFunction::Bool => "bool",
        }
    }

    /// Accepted argument counts.
    pub fn arity(self) -> Arity {
        match self {
            ScalarFunction::Sprintf => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    /// Compile a call over already compiled arguments.
    pub fn call(self, args: Vec<CompiledExpr>) -> CompileResult<CompiledExpr> {
        self.arity().check(self.name(), args.len())?;

        let arg_types: Vec<Type> = args.iter().map(CompiledExpr::ty).collect();
        let ty = Type::infer_call(self.name(), &arg_types)
            .ok_or_else(|| CompileError::UnknownFunction(self.name().to_string()))?;

        let joined = args
            .iter()
            .map(CompiledExpr::code)
            .collect::<Vec<_>>()
            .join(",");
        let code = match self {
            ScalarFunction::Bool => truth_test(&joined),
            _ => format!("{}({})", self.name(), joined),
        };
        Ok(CompiledExpr::computed(code, ty, args))
    }
}

/// awk test for the text form of `value`, matching
/// [`tabkit_ast::parse_boolean`]: only `"0"` and the empty text are false.
fn truth_test(value: &str) -> String {
    format!(r#"((({0})"")!="0"&&(({0})"")!="")"#, value)
}

/// Compile a call to a scalar function.
///
/// Aggregate function names are recognized so that using one outside an
/// aggregate block gets a pointed message.
pub fn scalar_call(function: &str, args: Vec<CompiledExpr>) -> CompileResult<CompiledExpr> {
    if let Some(scalar) = ScalarFunction::from_name(function) {
        return scalar.call(args);
    }
    if AggregateFunction::from_name(function).is_some() {
        return Err(CompileError::syntax(format!(
            "aggregate function '{}' is only allowed in aggregate expressions",
            function
        )));
    }
    Err(CompileError::UnknownFunction(function.to_string()))
}

/// Per-group reductions, available in aggregate blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// `sum(x)`, reset per group.
    Sum,
    /// `cumsum(x)`, running total over the whole stream.
    CumSum,
    /// `count()`, reset per group.
    Count,
    /// `cumcount()`, running row count over the whole stream.
    CumCount,
    /// `group_concat(x[, sep])`, values joined by `sep` (default `", "`).
    GroupConcat,
}

/// Separator used by `group_concat` without an explicit one.
pub const DEFAULT_CONCAT_SEPARATOR: &str = ", ";

impl AggregateFunction {
    /// Look up an aggregate by its expression-language name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(AggregateFunction::Sum),
            "cumsum" => Some(AggregateFunction::CumSum),
            "count" => Some(AggregateFunction::Count),
            "cumcount" => Some(AggregateFunction::CumCount),
            "group_concat" => Some(AggregateFunction::GroupConcat),
            _ => None,
        }
    }

    /// Expression-language name.
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::CumSum => "cumsum",
            AggregateFunction::Count => "count",
            AggregateFunction::CumCount => "cumcount",
            AggregateFunction::GroupConcat => "group_concat",
        }
    }

    /// Accepted argument counts.
    pub fn arity(self) -> Arity {
        match self {
            AggregateFunction::Sum | AggregateFunction::CumSum => Arity::Exactly(1),
            AggregateFunction::Count | AggregateFunction::CumCount => Arity::Exactly(0),
            AggregateFunction::GroupConcat => Arity::Between(1, 2),
        }
    }

    /// Whether the state carries over group boundaries.
    pub fn is_cumulative(self) -> bool {
        matches!(self, AggregateFunction::CumSum | AggregateFunction::CumCount)
    }

    /// Build the aggregator stored in `var`.
    pub fn instantiate(self, var: String, args: &[CompiledExpr]) -> CompileResult<Aggregator> {
        self.arity().check(self.name(), args.len())?;

        let (ty, init, step) = match self {
            AggregateFunction::Sum | AggregateFunction::CumSum => {
                let arg = &args[0];
                let ty = if arg.ty() == Type::Floating {
                    Type::Floating
                } else {
                    Type::Integer
                };
                (ty, format!("{}=0", var), format!("{}+={}", var, arg.code()))
            }
            AggregateFunction::Count | AggregateFunction::CumCount => {
                (Type::Integer, format!("{}=0", var), format!("{}++", var))
            }
            AggregateFunction::GroupConcat => {
                let value = args[0].code();
                let separator = match args.get(1) {
                    Some(sep) => sep.code().to_string(),
                    None => quote(DEFAULT_CONCAT_SEPARATOR),
                };
                let step = format!(
                    "{v}=(({v}==\"\")?{x}:({v} {sep} {x}))",
                    v = var,
                    x = value,
                    sep = separator
                );
                (Type::String, format!("{}=\"\"", var), step)
            }
        };

        Ok(Aggregator {
            function: self,
            init: (!self.is_cumulative()).then_some(init),
            step,
            ty,
            var,
        })
    }
}

/// State of one aggregate function call site.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    /// Which function this instance computes.
    pub function: AggregateFunction,
    /// State variable name.
    pub var: String,
    /// Statement run when a group starts; `None` for cumulative functions.
    pub init: Option<String>,
    /// Statement run for every input row.
    pub step: String,
    /// Result type.
    pub ty: Type,
}
