use super::beam::BeamSpec;
use super::exposure::ExposureSpec;
use super::geometry::GeometrySpec;
use super::record::{FieldRecord, SchemaOptions};
use crate::domain::{RaddoseError, RaddoseResult, Section};
use serde_json::Value;

/// One wedge, or an ordered multi-segment scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Exposures {
    Single(ExposureSpec),
    Sequence(Vec<ExposureSpec>),
}

impl Exposures {
    pub fn as_slice(&self) -> &[ExposureSpec] {
        match self {
            Self::Single(exposure) => std::slice::from_ref(exposure),
            Self::Sequence(exposures) => exposures,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<ExposureSpec> for Exposures {
    fn from(exposure: ExposureSpec) -> Self {
        Self::Single(exposure)
    }
}

impl From<Vec<ExposureSpec>> for Exposures {
    fn from(exposures: Vec<ExposureSpec>) -> Self {
        Self::Sequence(exposures)
    }
}

/// A validated crystal, beam and exposure set, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    geometry: GeometrySpec,
    beam: BeamSpec,
    exposures: Exposures,
}

impl ExperimentConfig {
    /// Validates each component independently; the first violation wins.
    pub fn new(
        geometry: GeometrySpec,
        beam: BeamSpec,
        exposures: impl Into<Exposures>,
    ) -> RaddoseResult<Self> {
        let exposures = exposures.into();
        geometry.validate()?;
        beam.validate()?;
        if exposures.is_empty() {
            return Err(RaddoseError::EmptyExposureSequence);
        }
        for exposure in exposures.as_slice() {
            exposure.validate()?;
        }

        Ok(Self {
            geometry,
            beam,
            exposures,
        })
    }

    pub fn from_json_str(text: &str, options: SchemaOptions) -> RaddoseResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|error| RaddoseError::Document(format!("invalid JSON: {error}")))?;
        Self::from_json_value(&value, options)
    }

    /// Builds a configuration from `{"crystal": {..}, "beam": {..}, "wedge": {..} | [..]}`.
    pub fn from_json_value(value: &Value, options: SchemaOptions) -> RaddoseResult<Self> {
        let Value::Object(document) = value else {
            return Err(RaddoseError::Document(
                "experiment document must be a JSON object".to_string(),
            ));
        };

        for key in document.keys() {
            let known = [Section::Crystal, Section::Beam, Section::Wedge]
                .iter()
                .any(|section| section.document_key() == key);
            if known {
                continue;
            }
            if options.reject_unknown_fields {
                return Err(RaddoseError::UnknownField {
                    section: Section::Experiment,
                    field: key.clone(),
                });
            }
            tracing::warn!(key = key.as_str(), "ignoring unknown top-level key");
        }

        let geometry = GeometrySpec::from_record(&section_record(document, Section::Crystal)?, options)?;
        let beam = BeamSpec::from_record(&section_record(document, Section::Beam)?, options)?;

        let exposures = match section_value(document, Section::Wedge)? {
            Value::Array(items) => Exposures::Sequence(
                items
                    .iter()
                    .map(|item| {
                        FieldRecord::from_json_object(Section::Wedge, item)
                            .and_then(|record| ExposureSpec::from_record(&record, options))
                    })
                    .collect::<RaddoseResult<Vec<_>>>()?,
            ),
            single => {
                let record = FieldRecord::from_json_object(Section::Wedge, single)?;
                Exposures::Single(ExposureSpec::from_record(&record, options)?)
            }
        };

        Self::new(geometry, beam, exposures)
    }

    pub fn geometry(&self) -> &GeometrySpec {
        &self.geometry
    }

    pub fn beam(&self) -> &BeamSpec {
        &self.beam
    }

    pub fn exposures(&self) -> &[ExposureSpec] {
        self.exposures.as_slice()
    }
}

fn section_value(
    document: &serde_json::Map<String, Value>,
    section: Section,
) -> RaddoseResult<&Value> {
    document.get(section.document_key()).ok_or_else(|| {
        RaddoseError::Document(format!("missing '{}' section", section.document_key()))
    })
}

fn section_record(
    document: &serde_json::Map<String, Value>,
    section: Section,
) -> RaddoseResult<FieldRecord> {
    FieldRecord::from_json_object(section, section_value(document, section)?)
}
