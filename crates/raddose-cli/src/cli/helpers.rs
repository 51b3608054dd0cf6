use super::CliError;
use anyhow::Context;
use globset::Glob;
use raddose_core::results::SummaryTable;
use raddose_core::runner::{EngineCommand, StderrPolicy};
use raddose_core::schema::{ExperimentConfig, SchemaOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
pub(super) fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(super) fn schema_options(allow_unknown_fields: bool) -> SchemaOptions {
    SchemaOptions {
        reject_unknown_fields: !allow_unknown_fields,
    }
}

pub(super) fn load_experiment(
    path: &Path,
    options: SchemaOptions,
) -> Result<ExperimentConfig, CliError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read experiment document '{}'", path.display()))?;
    let config = ExperimentConfig::from_json_str(&text, options)?;
    tracing::debug!(path = %path.display(), wedges = config.exposures().len(), "loaded experiment");
    Ok(config)
}

pub(super) fn engine_command(jar: Option<&Path>, java: &str) -> Result<EngineCommand, CliError> {
    let jar = jar.ok_or_else(|| {
        CliError::Usage(
            "the RADDOSE-3D jar is required; pass --jar <path> or set RADDOSE3D_JAR".to_string(),
        )
    })?;
    Ok(EngineCommand::java_jar(java, jar))
}

pub(super) fn stderr_policy(strict: bool, allowed: &[String]) -> StderrPolicy {
    let base = if strict {
        StderrPolicy::strict()
    } else {
        StderrPolicy::default()
    };
    allowed
        .iter()
        .fold(base, |policy, pattern| policy.allow(pattern.clone()))
}

/// Files directly inside `dir` whose name matches `pattern`, sorted.
pub(super) fn collect_documents(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    let matcher = Glob::new(pattern)
        .map_err(|error| CliError::Usage(format!("invalid --pattern '{}': {}", pattern, error)))?
        .compile_matcher();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list experiment directory '{}'", dir.display()))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to list experiment directory '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.file_name().is_some_and(|name| matcher.is_match(name)) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

pub(super) fn sample_id_for(path: &Path) -> Result<String, CliError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::Usage(format!(
                "cannot derive a sample id from '{}'",
                path.display()
            ))
        })
}

pub(super) fn render_summary_table(table: &SummaryTable) -> String {
    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(table.headers.join("\t"));
    for row in &table.rows {
        lines.push(
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\t"),
        );
    }
    lines.join("\n")
}

pub(super) fn load_summary(path: &Path) -> Result<SummaryTable, CliError> {
    Ok(SummaryTable::from_path(path)?)
}
