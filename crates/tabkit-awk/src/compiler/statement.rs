//! Output and group-key statement blocks.

use tabkit_parser::parse_block;
use tabkit_schema::Schema;
use tracing::debug;

use super::{as_assignment, column_ref, ExprLowering};
use crate::context::{Context, VarNames};
use crate::error::{CompileError, CompileResult};
use crate::expr::CompiledExpr;

/// Compiles assignment blocks against a schema.
///
/// Names resolve against the schema's columns first and the bindings made
/// so far second.
pub struct StatementCompiler<'a> {
    schema: &'a Schema,
    context: Context,
    vars: VarNames,
    code: Vec<String>,
}

/// Result of a statement compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementBlock {
    /// Assignment statements, in execution order.
    pub code: Vec<String>,
    /// Final bindings and output names.
    pub context: Context,
}

impl<'a> StatementCompiler<'a> {
    /// Start compiling against `schema`.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            context: Context::new(),
            vars: VarNames::new(VarNames::VARIABLE),
            code: Vec::new(),
        }
    }

    /// Compile one expression string and append its statements.
    pub fn compile(&mut self, source: &str) -> CompileResult<()> {
        let block = parse_block(source)?;
        let before = self.code.len();

        for stmt in &block {
            let (target, value) = as_assignment(stmt)?;
            let value = self.lower(value)?;
            if let Some(code) = self.context.assign(target, value, &mut self.vars) {
                self.code.push(code);
            }
        }

        debug!(
            statements = block.len(),
            emitted = self.code.len() - before,
            "compiled statement block"
        );
        Ok(())
    }

    /// Compile every string in `sources`.
    pub fn compile_all<S: AsRef<str>>(&mut self, sources: &[S]) -> CompileResult<()> {
        for source in sources {
            self.compile(source.as_ref())?;
        }
        Ok(())
    }

    /// Bindings made so far.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Finish, handing over the statements and the context.
    pub fn finish(self) -> StatementBlock {
        StatementBlock {
            code: self.code,
            context: self.context,
        }
    }
}

impl ExprLowering for StatementCompiler<'_> {
    fn lower_name(&self, name: &str) -> CompileResult<CompiledExpr> {
        if let Some(column) = column_ref(self.schema, name) {
            return Ok(column);
        }
        self.context
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        "# a\tb:int\tc:float\td".parse().unwrap()
    }

    fn compile(sources: &[&str]) -> StatementBlock {
        let schema = schema();
        let mut compiler = StatementCompiler::new(&schema);
        compiler.compile_all(sources).unwrap();
        compiler.finish()
    }

    #[test]
    fn test_rename_of_column_is_free() {
        let block = compile(&["x = b; y = x"]);
        assert!(block.code.is_empty());
        assert_eq!(block.context.output_code(), vec!["$2", "$2"]);
    }

    #[test]
    fn test_in_place_rebinding() {
        let block = compile(&["x = b + 1; x = x * 2"]);
        assert_eq!(block.code, vec!["__var__0=($2+1)", "__var__0=(__var__0*2)"]);
        assert_eq!(block.context.output_code(), vec!["__var__0"]);
    }

    #[test]
    fn test_schema_shadows_bindings() {
        let block = compile(&["a = b + c; e = a"]);
        assert_eq!(block.code, vec!["__var__0=($2+$3)"]);
        let outputs: Vec<(&str, &str)> = block
            .context
            .outputs()
            .map(|(name, expr)| (name, expr.code()))
            .collect();
        assert_eq!(outputs, vec![("a", "__var__0"), ("e", "$1")]);
    }

    #[test]
    fn test_bare_name_of_bound_name_is_noop() {
        let block = compile(&["x = b * 2", "x"]);
        assert_eq!(block.code, vec!["__var__0=($2*2)"]);
    }

    #[test]
    fn test_types_follow_values() {
        let block = compile(&["r = b / 2; n = b + 1; f = c * b; s = sprintf(\"%d\", b)"]);
        let types: Vec<String> = block
            .context
            .outputs()
            .map(|(name, expr)| format!("{}:{}", name, expr.ty()))
            .collect();
        assert_eq!(types, vec!["r:float", "n:int", "f:float", "s:str"]);
    }

    #[test]
    fn test_unknown_identifier() {
        let schema = schema();
        let mut compiler = StatementCompiler::new(&schema);
        let err = compiler.compile("x = nope + 1").unwrap_err();
        assert_eq!(err, CompileError::UnknownIdentifier("nope".to_string()));
        assert_eq!(err.to_string(), "Unknown identifier 'nope'");
    }

    #[test]
    fn test_bare_expression_rejected() {
        let schema = schema();
        let mut compiler = StatementCompiler::new(&schema);
        let err = compiler.compile("b + 1").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Syntax error: assign statements or field names expected"));
    }
}
