/// Decides whether engine stderr output means the run failed.
///
/// The engine has no reliable exit code, so stderr is the failure signal.
/// Lines containing one of `benign_patterns` are tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StderrPolicy {
    pub benign_patterns: Vec<String>,
}

pub const JVM_NOTICES: &[&str] = &["Picked up JAVA_TOOL_OPTIONS", "Picked up _JAVA_OPTIONS"];

impl Default for StderrPolicy {
    fn default() -> Self {
        Self {
            benign_patterns: JVM_NOTICES.iter().map(|notice| notice.to_string()).collect(),
        }
    }
}

impl StderrPolicy {
    /// Any stderr output is a failure.
    pub fn strict() -> Self {
        Self {
            benign_patterns: Vec::new(),
        }
    }

    pub fn allow(mut self, pattern: impl Into<String>) -> Self {
        self.benign_patterns.push(pattern.into());
        self
    }

    pub fn is_benign(&self, line: &str) -> bool {
        self.benign_patterns
            .iter()
            .any(|pattern| line.contains(pattern.as_str()))
    }

    pub fn unexpected_lines<'a>(&self, stderr: &'a str) -> Vec<&'a str> {
        stderr.lines().filter(|line| !self.is_benign(line)).collect()
    }

    pub fn is_failure(&self, stderr: &str) -> bool {
        !self.unexpected_lines(stderr).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::StderrPolicy;

    #[test]
    fn default_policy_tolerates_jvm_notices_only() {
        let policy = StderrPolicy::default();

        assert!(!policy.is_failure(""));
        assert!(!policy.is_failure("Picked up JAVA_TOOL_OPTIONS: -Xmx2g\n"));
        assert!(policy.is_failure(
            "Picked up _JAVA_OPTIONS: -Xmx2g\nException in thread \"main\" java.lang.NullPointerException\n"
        ));
        assert_eq!(
            policy.unexpected_lines("Picked up _JAVA_OPTIONS: x\nboom\n"),
            vec!["boom"]
        );
    }

    #[test]
    fn strict_policy_fails_on_any_output() {
        let strict = StderrPolicy::strict();
        assert!(strict.is_failure("Picked up JAVA_TOOL_OPTIONS: -Xmx2g"));
        assert!(strict.is_failure("\n   \n"));
        assert!(strict.is_failure(" "));
        assert!(StderrPolicy::default().is_failure("\n"));
    }

    #[test]
    fn custom_patterns_extend_the_allowlist() {
        let policy = StderrPolicy::strict().allow("WARNING: deprecated");
        assert!(!policy.is_failure("WARNING: deprecated flag used"));
        assert!(policy.is_failure("ERROR: crystal outside beam"));
    }
}
