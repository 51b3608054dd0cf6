//! Runs RADDOSE-3D for validated experiments.
//!
//! A run writes `<output_dir>/<sample_id>.txt`, invokes the engine with the
//! output prefix `<output_dir>/<sample_id>-` and loads
//! `<output_dir>/<sample_id>-Summary.csv`. Batches run concurrently on the
//! rayon pool; runs share nothing but the filesystem.

mod engine;
mod stderr;

pub use engine::{EngineCommand, EngineExecutor, EngineInvocation, EngineOutput, ProcessExecutor};
pub use stderr::{JVM_NOTICES, StderrPolicy};

use crate::domain::{RaddoseError, RaddoseResult, RunArtifacts};
use crate::render::write_input_file;
use crate::results::SummaryTable;
use crate::schema::ExperimentConfig;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub sample_id: String,
    pub config: ExperimentConfig,
    pub output_dir: PathBuf,
}

impl RunRequest {
    pub fn new(
        sample_id: impl Into<String>,
        config: ExperimentConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            config,
            output_dir: output_dir.into(),
        }
    }

    pub fn artifacts(&self) -> RunArtifacts {
        RunArtifacts::for_sample(&self.output_dir, &self.sample_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub sample_id: String,
    pub artifacts: RunArtifacts,
    pub stdout: String,
    pub summary: SummaryTable,
}

pub struct Runner<E = ProcessExecutor> {
    command: EngineCommand,
    executor: E,
    stderr_policy: StderrPolicy,
}

impl Runner<ProcessExecutor> {
    pub fn new(command: EngineCommand) -> Self {
        Self::with_executor(command, ProcessExecutor)
    }
}

impl<E: EngineExecutor> Runner<E> {
    pub fn with_executor(command: EngineCommand, executor: E) -> Self {
        Self {
            command,
            executor,
            stderr_policy: StderrPolicy::default(),
        }
    }

    pub fn with_stderr_policy(mut self, policy: StderrPolicy) -> Self {
        self.stderr_policy = policy;
        self
    }

    pub fn run(&self, request: &RunRequest) -> RaddoseResult<RunOutcome> {
        check_sample_id(&request.sample_id)?;
        let artifacts = request.artifacts();
        fs::create_dir_all(&request.output_dir).map_err(|source| {
            RaddoseError::io("creating output directory", &request.output_dir, source)
        })?;
        write_input_file(&request.config, &artifacts.input_path)?;
        remove_stale_summary(&artifacts.summary_path)?;

        let invocation = self
            .command
            .invocation(&artifacts.input_path, &artifacts.output_prefix);
        tracing::info!(
            sample = request.sample_id.as_str(),
            command = %invocation.command_line(),
            "starting engine run"
        );
        let output = self.executor.execute(&invocation)?;

        let unexpected = self.stderr_policy.unexpected_lines(&output.stderr);
        if !output.success || !unexpected.is_empty() {
            return Err(RaddoseError::ExternalExecutionFailure {
                sample_id: request.sample_id.clone(),
                status: output.status,
                stderr: output.stderr,
            });
        }
        if !output.stderr.trim().is_empty() {
            tracing::warn!(
                sample = request.sample_id.as_str(),
                stderr = output.stderr.trim_end(),
                "tolerating engine stderr"
            );
        }

        let summary = SummaryTable::from_path(&artifacts.summary_path)?;
        tracing::info!(
            sample = request.sample_id.as_str(),
            rows = summary.row_count(),
            "engine run finished"
        );

        Ok(RunOutcome {
            sample_id: request.sample_id.clone(),
            artifacts,
            stdout: output.stdout,
            summary,
        })
    }

    /// Runs every request concurrently. Results keep the input order.
    pub fn run_batch(&self, requests: &[RunRequest]) -> RaddoseResult<Vec<RaddoseResult<RunOutcome>>> {
        ensure_unique_samples(requests)?;
        Ok(requests.par_iter().map(|request| self.run(request)).collect())
    }
}

fn check_sample_id(sample_id: &str) -> RaddoseResult<()> {
    let reserved = matches!(sample_id, "" | "." | "..");
    if reserved || sample_id.contains(['/', '\\']) {
        return Err(RaddoseError::InvalidSampleId {
            sample_id: sample_id.to_string(),
        });
    }
    Ok(())
}

/// Absolute form of `dir` with `.` components dropped, so `out` and `./out`
/// compare equal. Symlinks and `..` are left alone.
fn normalized_dir(dir: &Path) -> RaddoseResult<PathBuf> {
    let absolute = std::path::absolute(dir)
        .map_err(|source| RaddoseError::io("resolving output directory", dir, source))?;
    Ok(absolute
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect())
}

fn ensure_unique_samples(requests: &[RunRequest]) -> RaddoseResult<()> {
    let mut seen = HashSet::new();
    for request in requests {
        check_sample_id(&request.sample_id)?;
        let dir = normalized_dir(&request.output_dir)?;
        if !seen.insert((dir, request.sample_id.as_str())) {
            return Err(RaddoseError::DuplicateSample {
                sample_id: request.sample_id.clone(),
                output_dir: request.output_dir.clone(),
            });
        }
    }
    Ok(())
}

fn remove_stale_summary(path: &Path) -> RaddoseResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed summary from a previous run");
            Ok(())
        }
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RaddoseError::io("removing stale summary", path, source)),
    }
}
