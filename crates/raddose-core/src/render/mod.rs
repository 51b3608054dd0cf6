//! Renders an [`ExperimentConfig`] into the RADDOSE-3D keyword input file.
//!
//! Output layout:
//!
//! ```text
//! Crystal
//! Type Cuboid
//! Dimensions 100 100 100
//!
//! Beam
//! Type Gaussian
//! ...
//!
//! # Wedge
//! Wedge 0.0 90.0
//! ExposureTime 50.0
//! ```

mod serialization;

pub use serialization::{normalize_text_artifact, write_text_artifact};

use crate::domain::{RaddoseError, RaddoseResult, Section};
use crate::schema::ExperimentConfig;
use std::path::Path;

/// Marker written ahead of every exposure block.
pub const WEDGE_MARKER: &str = "# Wedge";

pub fn render_input(config: &ExperimentConfig) -> String {
    let mut blocks = Vec::with_capacity(2 + config.exposures().len());
    blocks.push(render_block(
        Section::Crystal.keyword(),
        &config.geometry().entries(),
    ));
    blocks.push(render_block(Section::Beam.keyword(), &config.beam().entries()));
    for exposure in config.exposures() {
        blocks.push(render_block(WEDGE_MARKER, &exposure.entries()));
    }
    blocks.join("\n")
}

fn render_block(header: &str, entries: &[(&'static str, String)]) -> String {
    let mut block = String::new();
    block.push_str(header);
    block.push('\n');
    for (name, value) in entries {
        block.push_str(&render_line(name, value));
        block.push('\n');
    }
    block
}

fn render_line(name: &str, value: &str) -> String {
    format!("{name} {value}")
}

/// Writes the rendered input file to `path`. Nothing else is touched.
pub fn write_input_file(config: &ExperimentConfig, path: &Path) -> RaddoseResult<()> {
    let content = render_input(config);
    tracing::debug!(path = %path.display(), bytes = content.len(), "writing engine input file");
    write_text_artifact(path, &content)
        .map_err(|source| RaddoseError::io("writing engine input file", path, source))
}
