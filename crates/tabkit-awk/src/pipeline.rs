//! Multi-stage pipelines.
//!
//! A pipeline chains map and group stages: each stage is compiled against
//! the schema the previous one produces.
//!
//! # File Format
//!
//! ```yaml
//! separator: "\t"
//! stages:
//!   - kind: map
//!     output: ["a", "c = a + b"]
//!     filter: ["c > 0"]
//!   - kind: group
//!     keys: ["a"]
//!     aggregate: ["n = count()", "total = sum(c)"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabkit_schema::Schema;
use thiserror::Error;
use tracing::info;

use crate::error::CompileResult;
use crate::program::{awk_args, group_program, map_program, Program};

/// Errors that can occur when loading a pipeline definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the pipeline file.
    #[error("failed to read pipeline file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the pipeline YAML.
    #[error("failed to parse pipeline YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The pipeline has no stages.
    #[error("pipeline has no stages")]
    EmptyPipeline,
}

/// Result type for pipeline loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_separator() -> String {
    "\t".to_string()
}

/// An ordered list of stages over `separator`-delimited rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Field separator of input and output rows.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Stages in execution order.
    pub stages: Vec<Stage>,
}

/// One operator of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    /// Row-wise map/filter.
    Map {
        /// Output expression blocks.
        #[serde(default)]
        output: Vec<String>,
        /// Filter expressions.
        #[serde(default)]
        filter: Vec<String>,
    },
    /// Grouped aggregation.
    Group {
        /// Group key expression blocks.
        #[serde(default)]
        keys: Vec<String>,
        /// Aggregate expression blocks.
        #[serde(default)]
        aggregate: Vec<String>,
    },
}

impl Stage {
    /// Compile this stage against `schema`.
    pub fn compile(&self, schema: &Schema) -> CompileResult<(Program, Schema)> {
        match self {
            Stage::Map { output, filter } => {
                let (program, schema) = map_program(schema, output, filter)?;
                Ok((Program::Map(program), schema))
            }
            Stage::Group { keys, aggregate } => {
                let (program, schema) = group_program(schema, keys, aggregate)?;
                Ok((Program::Group(program), schema))
            }
        }
    }
}

/// Programs of a compiled pipeline and the schema of its final output.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPipeline {
    /// One program per stage.
    pub programs: Vec<Program>,
    /// Schema after the last stage.
    pub schema: Schema,
}

impl Pipeline {
    /// Create a pipeline over tab-separated rows.
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            separator: default_separator(),
            stages,
        }
    }

    /// Load a pipeline from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a pipeline from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let pipeline: Pipeline = serde_yaml::from_str(yaml)?;
        if pipeline.stages.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }
        Ok(pipeline)
    }

    /// Compile every stage, feeding each output schema into the next stage.
    ///
    /// # Errors
    /// The first failure, tagged with its zero-based stage index.
    pub fn compile(&self, input: &Schema) -> CompileResult<CompiledPipeline> {
        let mut schema = input.clone();
        let mut programs = Vec::with_capacity(self.stages.len());

        for (index, stage) in self.stages.iter().enumerate() {
            let (program, next) = stage.compile(&schema).map_err(|err| err.in_stage(index))?;
            programs.push(program);
            schema = next;
        }

        info!(stages = programs.len(), output = %schema, "compiled pipeline");
        Ok(CompiledPipeline { programs, schema })
    }
}

impl CompiledPipeline {
    /// awk arguments for each stage, in order.
    pub fn awk_invocations(&self, separator: &str) -> Vec<Vec<String>> {
        self.programs
            .iter()
            .map(|program| awk_args(separator, program))
            .collect()
    }
}
