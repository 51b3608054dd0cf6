use super::record::{
    FieldDef, FieldRecord, SchemaOptions, apply_record, field, render_fields, required,
    validate_fields,
};
use super::tokens::{TokenShape, Tokens};
use crate::domain::{RaddoseResult, Section};

const WEDGE: TokenShape = TokenShape::NonNegative { arities: &[2] };
const TRANSLATION: TokenShape = TokenShape::Signed { arities: &[3] };

/// One `Wedge` block: an angular range and how long it is exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureSpec {
    pub wedge: Tokens,
    pub exposure_time: f64,
    pub angular_resolution: Option<f64>,
    pub start_offset: Option<Tokens>,
    pub translate_per_degree: Option<Tokens>,
    pub rot_ax_beam_offset: Option<f64>,
}

impl ExposureSpec {
    pub fn new(wedge: impl Into<Tokens>, exposure_time: f64) -> Self {
        Self {
            wedge: wedge.into(),
            exposure_time,
            angular_resolution: None,
            start_offset: None,
            translate_per_degree: None,
            rot_ax_beam_offset: None,
        }
    }

    /// Keyword table in block order. `Wedge` opens the block.
    pub fn fields() -> Vec<FieldDef<Self>> {
        vec![
            field!(ExposureSpec, "Wedge", wedge, shape = WEDGE),
            field!(ExposureSpec, "ExposureTime", exposure_time, non_negative),
            field!(ExposureSpec, "AngularResolution", angular_resolution, non_negative),
            field!(ExposureSpec, "StartOffset", start_offset, shape = TRANSLATION),
            field!(ExposureSpec, "TranslatePerDegree", translate_per_degree, shape = TRANSLATION),
            field!(ExposureSpec, "RotAxBeamOffset", rot_ax_beam_offset),
        ]
    }

    pub fn from_record(record: &FieldRecord, options: SchemaOptions) -> RaddoseResult<Self> {
        let wedge: Tokens = required(Section::Wedge, "Wedge", record)?;
        let exposure_time = required(Section::Wedge, "ExposureTime", record)?;
        let mut spec = Self::new(wedge, exposure_time);
        apply_record(Section::Wedge, &Self::fields(), record, options, &mut spec)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Start > end is tolerated and only logged.
    pub fn validate(&self) -> RaddoseResult<()> {
        validate_fields(&Self::fields(), self)?;
        if let Some((start, end)) = self.angular_range()
            && start > end
        {
            tracing::warn!(start, end, "wedge start angle is greater than its end angle");
        }
        Ok(())
    }

    /// Start and end angles of a structured wedge.
    pub fn angular_range(&self) -> Option<(f64, f64)> {
        match self.wedge.as_structured()? {
            [start, end] => Some((start.as_number()?, end.as_number()?)),
            _ => None,
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        render_fields(&Self::fields(), self)
    }
}
