use super::Section;
use std::path::PathBuf;

pub type RaddoseResult<T> = Result<T, RaddoseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RaddoseError {
    #[error("{field}: '{value}' is not an allowed value; allowed values are [{}]", .allowed.join(", "))]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },

    #[error(
        "{field}={value} requires {}; current values are {}",
        dependent_names(.dependents),
        dependent_values(.dependents)
    )]
    MissingDependentField {
        field: &'static str,
        value: String,
        dependents: Vec<(&'static str, Option<String>)>,
    },

    #[error("{field}: {value} is out of range ({constraint})")]
    OutOfRange {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    #[error("unknown field '{field}' in {section}")]
    UnknownField { section: Section, field: String },

    #[error("missing required field '{field}' in {section}")]
    MissingRequiredField {
        section: Section,
        field: &'static str,
    },

    #[error("{field}: expected {expected}, found {found}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{field}: malformed tuple ({detail})")]
    MalformedTuple { field: &'static str, detail: String },

    #[error("{field}: value must fit on one line")]
    LineBreakInValue { field: &'static str },

    #[error("an exposure sequence must contain at least one wedge")]
    EmptyExposureSequence,

    #[error("experiment document is invalid: {0}")]
    Document(String),

    #[error("sample id '{sample_id}' must be a non-empty file name without path separators")]
    InvalidSampleId { sample_id: String },

    #[error("sample '{sample_id}' is scheduled more than once in '{}'", .output_dir.display())]
    DuplicateSample {
        sample_id: String,
        output_dir: PathBuf,
    },

    #[error("{context} '{}': {detail}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        detail: String,
    },

    #[error("failed to launch engine '{program}': {detail}")]
    EngineLaunch { program: String, detail: String },

    #[error("engine run for sample '{sample_id}' failed ({}): {stderr}", status_text(.status))]
    ExternalExecutionFailure {
        sample_id: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("result table '{}' is unavailable: {detail}", .path.display())]
    ResultUnavailable { path: PathBuf, detail: String },
}

fn dependent_names(dependents: &[(&'static str, Option<String>)]) -> String {
    dependents
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(" and ")
}

fn dependent_values(dependents: &[(&'static str, Option<String>)]) -> String {
    dependents
        .iter()
        .map(|(name, current)| format!("{}={}", name, current.as_deref().unwrap_or("None")))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn status_text(status: &Option<i32>) -> String {
    status.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {}", code),
    )
}

impl RaddoseError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            detail: source.to_string(),
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidEnumValue { .. }
            | Self::MissingDependentField { .. }
            | Self::OutOfRange { .. }
            | Self::UnknownField { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidFieldType { .. }
            | Self::MalformedTuple { .. }
            | Self::LineBreakInValue { .. }
            | Self::EmptyExposureSequence
            | Self::Document(_)
            | Self::InvalidSampleId { .. }
            | Self::DuplicateSample { .. } => ErrorCategory::InputValidationError,
            Self::Io { .. } | Self::ResultUnavailable { .. } => ErrorCategory::IoSystemError,
            Self::EngineLaunch { .. } | Self::ExternalExecutionFailure { .. } => {
                ErrorCategory::ComputationError
            }
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::InvalidEnumValue { .. } => "INPUT.INVALID_ENUM",
            Self::MissingDependentField { .. } => "INPUT.MISSING_DEPENDENT_FIELD",
            Self::OutOfRange { .. } => "INPUT.OUT_OF_RANGE",
            Self::UnknownField { .. } => "INPUT.UNKNOWN_FIELD",
            Self::MissingRequiredField { .. } => "INPUT.MISSING_FIELD",
            Self::InvalidFieldType { .. } => "INPUT.FIELD_TYPE",
            Self::MalformedTuple { .. } => "INPUT.MALFORMED_TUPLE",
            Self::LineBreakInValue { .. } => "INPUT.LINE_BREAK",
            Self::EmptyExposureSequence => "INPUT.EMPTY_WEDGES",
            Self::Document(_) => "INPUT.DOCUMENT",
            Self::InvalidSampleId { .. } => "INPUT.SAMPLE_ID",
            Self::DuplicateSample { .. } => "INPUT.DUPLICATE_SAMPLE",
            Self::Io { .. } => "IO.FILESYSTEM",
            Self::ResultUnavailable { .. } => "IO.RESULT_UNAVAILABLE",
            Self::EngineLaunch { .. } => "RUN.ENGINE_LAUNCH",
            Self::ExternalExecutionFailure { .. } => "RUN.ENGINE_STDERR",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}
