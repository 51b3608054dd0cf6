pub mod errors;

pub use errors::{ErrorCategory, RaddoseError, RaddoseResult};

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level blocks of a RADDOSE-3D input file, plus the document root
/// that holds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Experiment,
    Crystal,
    Beam,
    Wedge,
}

impl Section {
    /// Keyword that opens the block in the rendered input file.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Experiment => "Experiment",
            Self::Crystal => "Crystal",
            Self::Beam => "Beam",
            Self::Wedge => "Wedge",
        }
    }

    /// Key used for the block in experiment documents.
    pub const fn document_key(self) -> &'static str {
        match self {
            Self::Experiment => "experiment",
            Self::Crystal => "crystal",
            Self::Beam => "beam",
            Self::Wedge => "wedge",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).document_key())
    }
}

/// Files belonging to one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub input_path: PathBuf,
    pub output_prefix: String,
    pub summary_path: PathBuf,
}

impl RunArtifacts {
    pub fn for_sample(output_dir: &Path, sample_id: &str) -> Self {
        let input_path = output_dir.join(format!("{sample_id}.txt"));
        let output_prefix = output_dir
            .join(format!("{sample_id}-"))
            .to_string_lossy()
            .into_owned();
        let summary_path = PathBuf::from(format!("{output_prefix}Summary.csv"));
        Self {
            input_path,
            output_prefix,
            summary_path,
        }
    }
}
