//!
//! Compile tabkit expressions into awk programs.
//!
//! Usage: `tabkit-compile [FILE...] [--header H] [-o EXPR]... [-f EXPR]...`
//!        `tabkit-compile [FILE...] -g KEYS... -A AGGREGATES...`
//!        `tabkit-compile [FILE...] --config pipeline.yaml`
//!
//! Prints the output header followed by one awk program per stage. Nothing
//! is executed.

use clap::Parser;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use tabkit_awk::{Pipeline, Stage};
use tabkit_schema::Schema;
use tabkit_tools::{read_header, read_headers};

#[derive(Parser, Debug)]
#[command(name = "tabkit-compile")]
#[command(about = "Compile tabkit expressions into awk programs")]
struct Args {
    /// Input files whose header lines describe the input (stdin if none)
    files: Vec<PathBuf>,

    /// Input header line, instead of reading it from the input
    #[arg(long)]
    header: Option<String>,

    /// Output expressions of a map stage
    #[arg(short = 'o', long = "output")]
    output: Vec<String>,

    /// Filter expressions of a map stage
    #[arg(short = 'f', long = "filter")]
    filter: Vec<String>,

    /// Output every input field ahead of the output expressions
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Group key expressions
    #[arg(short = 'g', long = "group")]
    group: Vec<String>,

    /// Aggregate expressions
    #[arg(short = 'A', long = "aggregate")]
    aggregate: Vec<String>,

    /// Pipeline definition file
    #[arg(short = 'c', long = "config", conflicts_with_all = ["output", "filter", "all", "group", "aggregate"])]
    config: Option<PathBuf>,

    /// Field separator (overridden by a pipeline file)
    #[arg(short = 'F', long = "separator", default_value = "\t")]
    separator: String,

    /// Omit the output header line
    #[arg(short = 'N', long = "no-header")]
    no_header: bool,

    /// Print each stage as a complete awk command line
    #[arg(long = "awk-args")]
    awk_args: bool,
}

fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

fn input_schema(args: &Args) -> Schema {
    let result = match (&args.header, args.files.is_empty()) {
        (Some(header), _) => read_header(header.as_bytes(), "--header"),
        (None, true) => read_header(BufReader::new(io::stdin().lock()), "<stdin>"),
        (None, false) => read_headers(&args.files),
    };
    match result {
        Ok(schema) => schema,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn command_line_pipeline(args: &Args, schema: &Schema) -> Pipeline {
    let stage = if !args.group.is_empty() || !args.aggregate.is_empty() {
        if !args.filter.is_empty() || !args.output.is_empty() || args.all {
            error!("--group/--aggregate cannot be combined with --output, --filter or --all");
            process::exit(1);
        }
        Stage::Group {
            keys: args.group.clone(),
            aggregate: args.aggregate.clone(),
        }
    } else {
        let mut output: Vec<String> = Vec::new();
        if args.all {
            output.extend(schema.field_names().map(str::to_string));
        }
        output.extend(args.output.iter().cloned());
        Stage::Map {
            output,
            filter: args.filter.clone(),
        }
    };

    let mut pipeline = Pipeline::new(vec![stage]);
    pipeline.separator = args.separator.clone();
    pipeline
}

fn main() {
    tabkit_tools::init_logging();

    let args = Args::parse();
    let schema = input_schema(&args);

    let pipeline = match &args.config {
        Some(path) => match Pipeline::load(path) {
            Ok(pipeline) => {
                info!("Loaded {} stage(s) from {}", pipeline.stages.len(), path.display());
                pipeline
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => command_line_pipeline(&args, &schema),
    };

    let compiled = match pipeline.compile(&schema) {
        Ok(compiled) => compiled,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if !args.no_header {
        println!("{}", compiled.schema);
    }
    if args.awk_args {
        for invocation in compiled.awk_invocations(&pipeline.separator) {
            let quoted: Vec<String> = invocation.iter().map(|arg| shell_quote(arg)).collect();
            println!("awk {}", quoted.join(" "));
        }
    } else {
        for program in &compiled.programs {
            println!("{}", program);
        }
    }
}
