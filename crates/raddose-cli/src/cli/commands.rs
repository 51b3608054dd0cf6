use super::CliError;
use super::helpers::*;
use anyhow::Context;
use raddose_core::render::{render_input, write_input_file};
use raddose_core::runner::{RunRequest, Runner};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct SchemaFlags {
    /// Skip unknown fields with a warning instead of rejecting them
    #[arg(long)]
    allow_unknown_fields: bool,
}

#[derive(clap::Args)]
pub(super) struct EngineFlags {
    /// RADDOSE-3D jar
    #[arg(long, env = "RADDOSE3D_JAR")]
    jar: Option<PathBuf>,

    /// Java launcher
    #[arg(long, env = "RADDOSE3D_JAVA", default_value = "java")]
    java: String,

    /// Directory for input files and engine outputs
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Tolerate stderr lines containing this text (repeatable)
    #[arg(long = "allow-stderr", value_name = "PATTERN")]
    allow_stderr: Vec<String>,

    /// Treat any stderr output as failure, including JVM notices
    #[arg(long)]
    strict_stderr: bool,
}

impl EngineFlags {
    fn runner(&self) -> Result<Runner, CliError> {
        let command = engine_command(self.jar.as_deref(), &self.java)?;
        Ok(Runner::new(command)
            .with_stderr_policy(stderr_policy(self.strict_stderr, &self.allow_stderr)))
    }
}

#[derive(clap::Args)]
pub(super) struct ValidateArgs {
    /// Experiment document (JSON)
    document: PathBuf,

    #[command(flatten)]
    schema: SchemaFlags,
}

#[derive(clap::Args)]
pub(super) struct RenderArgs {
    /// Experiment document (JSON)
    document: PathBuf,

    /// Write the input file here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(flatten)]
    schema: SchemaFlags,
}

#[derive(clap::Args)]
pub(super) struct RunArgs {
    /// Experiment document (JSON)
    document: PathBuf,

    /// Sample id used to name the input file and output prefix
    #[arg(long)]
    sample_id: String,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    engine: EngineFlags,

    #[command(flatten)]
    schema: SchemaFlags,
}

#[derive(clap::Args)]
pub(super) struct BatchArgs {
    /// Directory of experiment documents
    directory: PathBuf,

    /// File name pattern selecting documents
    #[arg(long, default_value = "*.json")]
    pattern: String,

    #[command(flatten)]
    engine: EngineFlags,

    #[command(flatten)]
    schema: SchemaFlags,
}

#[derive(clap::Args)]
pub(super) struct SummaryArgs {
    /// Summary CSV written by RADDOSE-3D
    csv: PathBuf,

    /// Print the table as JSON
    #[arg(long)]
    json: bool,
}

pub(super) fn run_validate_command(args: ValidateArgs) -> Result<i32, CliError> {
    let config = load_experiment(&args.document, schema_options(args.schema.allow_unknown_fields))?;
    println!(
        "Experiment '{}' is valid ({} wedge block(s)).",
        args.document.display(),
        config.exposures().len()
    );
    Ok(0)
}

pub(super) fn run_render_command(args: RenderArgs) -> Result<i32, CliError> {
    let config = load_experiment(&args.document, schema_options(args.schema.allow_unknown_fields))?;
    match args.output {
        Some(path) => {
            write_input_file(&config, &path)?;
            println!("Input file: {}", path.display());
        }
        None => print!("{}", render_input(&config)),
    }
    Ok(0)
}

pub(super) fn run_run_command(args: RunArgs) -> Result<i32, CliError> {
    let config = load_experiment(&args.document, schema_options(args.schema.allow_unknown_fields))?;
    let runner = args.engine.runner()?;
    let request = RunRequest::new(args.sample_id, config, args.engine.output_dir);

    let outcome = runner.run(&request)?;
    if args.json {
        let json = serde_json::to_string_pretty(&outcome.summary)
            .context("failed to serialize summary table")?;
        println!("{json}");
    } else {
        println!("Summary: {}", outcome.artifacts.summary_path.display());
        println!("{}", render_summary_table(&outcome.summary));
    }
    Ok(0)
}

pub(super) fn run_batch_command(args: BatchArgs) -> Result<i32, CliError> {
    let options = schema_options(args.schema.allow_unknown_fields);
    let documents = collect_documents(&args.directory, &args.pattern)?;
    if documents.is_empty() {
        return Err(CliError::Usage(format!(
            "no documents matching '{}' in '{}'",
            args.pattern,
            args.directory.display()
        )));
    }

    let runner = args.engine.runner()?;
    let requests = documents
        .iter()
        .map(|path| {
            Ok(RunRequest::new(
                sample_id_for(path)?,
                load_experiment(path, options)?,
                args.engine.output_dir.clone(),
            ))
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    println!("Running {} sample(s)...", requests.len());
    let results = runner.run_batch(&requests)?;

    let mut exit_code = 0;
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(outcome) => println!(
                "{}: OK ({})",
                request.sample_id,
                outcome.artifacts.summary_path.display()
            ),
            Err(error) => {
                println!("{}: FAILED", request.sample_id);
                eprintln!("{}", error.diagnostic_line());
                if exit_code == 0 {
                    exit_code = error.exit_code();
                }
            }
        }
    }
    Ok(exit_code)
}

pub(super) fn run_summary_command(args: SummaryArgs) -> Result<i32, CliError> {
    let table = load_summary(&args.csv)?;
    if args.json {
        let json =
            serde_json::to_string_pretty(&table).context("failed to serialize summary table")?;
        println!("{json}");
    } else {
        println!("{}", render_summary_table(&table));
    }
    Ok(0)
}
