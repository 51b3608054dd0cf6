use super::enums::BeamType;
use super::record::{
    FieldDef, FieldRecord, SchemaOptions, apply_record, field, render_fields, required,
    validate_fields,
};
use super::tokens::{TokenShape, Tokens};
use crate::domain::{RaddoseResult, Section};

const PAIR: TokenShape = TokenShape::NonNegative { arities: &[2] };
const COLLIMATION: TokenShape = TokenShape::Labelled {
    labels: &["rectangular", "circular"],
    numbers: 2,
};

/// The `Beam` block.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSpec {
    pub kind: BeamType,
    pub flux: f64,
    pub fwhm: Option<Tokens>,
    pub energy: f64,
    pub energy_fwhm: Option<f64>,
    pub file: Option<String>,
    pub pixel_size: Option<Tokens>,
    pub collimation: Option<Tokens>,
    pub pulse_energy: Option<f64>,
}

impl BeamSpec {
    pub fn new(kind: BeamType, flux: f64, energy: f64) -> Self {
        Self {
            kind,
            flux,
            fwhm: None,
            energy,
            energy_fwhm: None,
            file: None,
            pixel_size: None,
            collimation: None,
            pulse_energy: None,
        }
    }

    pub fn fields() -> Vec<FieldDef<Self>> {
        vec![
            field!(BeamSpec, "Type", kind),
            field!(BeamSpec, "Flux", flux, non_negative),
            field!(BeamSpec, "FWHM", fwhm, shape = PAIR),
            field!(BeamSpec, "Energy", energy, non_negative),
            field!(BeamSpec, "EnergyFWHM", energy_fwhm, non_negative),
            field!(BeamSpec, "File", file),
            field!(BeamSpec, "PixelSize", pixel_size, shape = PAIR),
            field!(BeamSpec, "Collimation", collimation, shape = COLLIMATION),
            field!(BeamSpec, "PulseEnergy", pulse_energy, non_negative),
        ]
    }

    pub fn from_record(record: &FieldRecord, options: SchemaOptions) -> RaddoseResult<Self> {
        let kind = required(Section::Beam, "Type", record)?;
        let flux = required(Section::Beam, "Flux", record)?;
        let energy = required(Section::Beam, "Energy", record)?;
        let mut spec = Self::new(kind, flux, energy);
        apply_record(Section::Beam, &Self::fields(), record, options, &mut spec)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> RaddoseResult<()> {
        validate_fields(&Self::fields(), self)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        render_fields(&Self::fields(), self)
    }
}
