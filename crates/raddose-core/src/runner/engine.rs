use crate::domain::{RaddoseError, RaddoseResult};
use std::path::Path;
use std::process::Command;

/// How the RADDOSE-3D engine is launched, minus the per-run arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub leading_args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    /// `<java> -jar <jar>`.
    pub fn java_jar(java: impl Into<String>, jar: &Path) -> Self {
        Self::new(java)
            .arg("-jar")
            .arg(jar.to_string_lossy().into_owned())
    }

    /// Appends `-i <input> -p <prefix>`.
    pub fn invocation(&self, input_path: &Path, output_prefix: &str) -> EngineInvocation {
        let mut args = self.leading_args.clone();
        args.push("-i".to_string());
        args.push(input_path.to_string_lossy().into_owned());
        args.push("-p".to_string());
        args.push(output_prefix.to_string());
        EngineInvocation {
            program: self.program.clone(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineInvocation {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of one engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub trait EngineExecutor: Send + Sync {
    fn execute(&self, invocation: &EngineInvocation) -> RaddoseResult<EngineOutput>;
}

/// Runs the engine as a child process and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl EngineExecutor for ProcessExecutor {
    fn execute(&self, invocation: &EngineInvocation) -> RaddoseResult<EngineOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|source| RaddoseError::EngineLaunch {
                program: invocation.program.clone(),
                detail: source.to_string(),
            })?;

        Ok(EngineOutput {
            status: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineCommand, EngineExecutor, ProcessExecutor};
    use crate::domain::RaddoseError;
    use std::path::Path;

    #[test]
    fn java_jar_invocation_matches_engine_command_line() {
        let command = EngineCommand::java_jar("java", Path::new("raddose3d.jar"));
        let invocation = command.invocation(Path::new("sample.txt"), "sample-");

        assert_eq!(invocation.program, "java");
        assert_eq!(
            invocation.args,
            ["-jar", "raddose3d.jar", "-i", "sample.txt", "-p", "sample-"]
        );
        assert_eq!(
            invocation.command_line(),
            "java -jar raddose3d.jar -i sample.txt -p sample-"
        );
    }

    #[test]
    fn missing_programs_fail_to_launch() {
        let invocation = EngineCommand::new("raddose3d-definitely-not-installed")
            .invocation(Path::new("sample.txt"), "sample-");
        let error = ProcessExecutor
            .execute(&invocation)
            .expect_err("program does not exist");
        assert!(matches!(error, RaddoseError::EngineLaunch { .. }));
        assert_eq!(error.exit_code(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn process_executor_captures_both_streams() {
        let invocation = EngineCommand::new("sh")
            .arg("-c")
            .arg("echo running; echo warning >&2; exit 3")
            .arg("engine")
            .invocation(Path::new("sample.txt"), "sample-");
        let output = ProcessExecutor.execute(&invocation).expect("sh launches");

        assert_eq!(output.stdout, "running\n");
        assert_eq!(output.stderr, "warning\n");
        assert_eq!(output.status, Some(3));
        assert!(!output.success);
    }
}
