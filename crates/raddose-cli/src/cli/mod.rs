mod commands;
mod helpers;

use clap::Parser;
use raddose_core::domain::{ErrorCategory, RaddoseError};

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            eprintln!("FATAL EXIT CODE: {}", error.exit_code());
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("raddose3d-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_logging(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "raddose3d-rs",
    version,
    about = "Validate, render and run RADDOSE-3D dose experiments"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Validate an experiment document
    Validate(commands::ValidateArgs),
    /// Render an experiment document to a RADDOSE-3D input file
    Render(commands::RenderArgs),
    /// Run RADDOSE-3D for one experiment document
    Run(commands::RunArgs),
    /// Run RADDOSE-3D concurrently for every matching document in a directory
    Batch(commands::BatchArgs),
    /// Print a RADDOSE-3D summary table
    Summary(commands::SummaryArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Validate(args) => commands::run_validate_command(args),
        CliCommand::Render(args) => commands::run_render_command(args),
        CliCommand::Run(args) => commands::run_run_command(args),
        CliCommand::Batch(args) => commands::run_batch_command(args),
        CliCommand::Summary(args) => commands::run_summary_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Core(#[from] RaddoseError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Usage(_) => ErrorCategory::InputValidationError,
            Self::Core(error) => error.category(),
            Self::Internal(_) => ErrorCategory::IoSystemError,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::Usage(_) => "INPUT.CLI_USAGE",
            Self::Core(error) => error.placeholder(),
            Self::Internal(_) => "IO.CLI",
        }
    }

    fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    fn diagnostic_line(&self) -> String {
        let message = match self {
            Self::Internal(error) => format!("{error:#}"),
            other => other.to_string(),
        };
        format!("ERROR: [{}] {}", self.placeholder(), message.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, run};
    use raddose_core::domain::RaddoseError;

    #[test]
    fn help_and_version_exit_successfully() {
        assert_eq!(run(["--help"]).expect("help is not an error"), 0);
        assert_eq!(run(["--version"]).expect("version is not an error"), 0);
    }

    #[test]
    fn unknown_commands_are_usage_errors() {
        let error = run(["simulate"]).expect_err("command does not exist");
        assert!(matches!(error, CliError::Usage(_)));
        assert_eq!(error.exit_code(), 2);
        assert!(error.diagnostic_line().starts_with("ERROR: [INPUT.CLI_USAGE]"));
    }

    #[test]
    fn core_errors_keep_their_codes() {
        let error = CliError::from(RaddoseError::EmptyExposureSequence);
        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.EMPTY_WEDGES] an exposure sequence must contain at least one wedge"
        );
    }

    #[test]
    fn internal_errors_are_reported_with_context() {
        let error = CliError::from(
            anyhow::anyhow!("permission denied").context("failed to read experiment 'a.json'"),
        );
        assert_eq!(error.exit_code(), 3);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [IO.CLI] failed to read experiment 'a.json': permission denied"
        );
    }
}
