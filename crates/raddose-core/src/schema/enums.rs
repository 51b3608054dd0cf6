//! Enumerated keyword values.
//!
//! Parsing is case-insensitive; rendering always uses the canonical
//! RADDOSE-3D spelling.

use super::record::{FieldCodec, FieldValue, type_error};
use crate::domain::{RaddoseError, RaddoseResult};
use std::fmt::{Display, Formatter};

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $canonical:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical),+
                }
            }

            /// Parses a keyword value, ignoring case.
            pub fn parse_keyword(value: &str) -> RaddoseResult<Self> {
                let trimmed = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| RaddoseError::InvalidEnumValue {
                        field: $field,
                        value: value.to_string(),
                        allowed: Self::ALL
                            .iter()
                            .map(|candidate| candidate.as_str().to_ascii_lowercase())
                            .collect(),
                    })
            }
        }

        impl std::str::FromStr for $name {
            type Err = RaddoseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse_keyword(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str((*self).as_str())
            }
        }

        impl FieldCodec for $name {
            fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
                match value {
                    FieldValue::Text(text) => Self::parse_keyword(text),
                    other => Err(type_error(field, "string", other)),
                }
            }

            fn encode(&self) -> Option<String> {
                Some(self.as_str().to_string())
            }
        }
    };
}

keyword_enum! {
    /// Crystal shape.
    CrystalType, field = "Type" {
        Cuboid => "Cuboid",
        Spherical => "Spherical",
        Cylinder => "Cylinder",
        Polyhedron => "Polyhedron",
    }
}

keyword_enum! {
    /// Strategy used to derive absorption coefficients.
    AbsCoefCalc, field = "AbsCoefCalc" {
        Average => "Average",
        Dummy => "Dummy",
        Rd => "RD",
        Rdv2 => "RDV2",
        Rdv3 => "RDV3",
        Rd3d => "RD3D",
        Exp => "EXP",
        Sequence => "Sequence",
        Saxs => "SAXS",
        SaxsSeq => "SAXSseq",
        SmallMole => "SmallMole",
        Cif => "CIF",
    }
}

keyword_enum! {
    ContainerMaterialType, field = "ContainerMaterialType" {
        None => "None",
        Mixture => "Mixture",
        Elemental => "Elemental",
    }
}

keyword_enum! {
    Subprogram, field = "Subprogram" {
        Xfel => "XFEL",
        MonteCarlo => "MonteCarlo",
    }
}

keyword_enum! {
    /// Beam profile.
    BeamType, field = "Type" {
        TopHat => "TopHat",
        Gaussian => "Gaussian",
        ExperimentalPgm => "ExperimentalPGM",
    }
}

/// Orientation keywords that only accept 0 or 90 degrees
/// (`GoniometerAxis`, `PolarisationDirection`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightAngle {
    Zero,
    Ninety,
}

impl RightAngle {
    pub const fn degrees(self) -> i64 {
        match self {
            Self::Zero => 0,
            Self::Ninety => 90,
        }
    }

    pub fn from_degrees(field: &'static str, degrees: i64) -> RaddoseResult<Self> {
        match degrees {
            0 => Ok(Self::Zero),
            90 => Ok(Self::Ninety),
            other => Err(RaddoseError::InvalidEnumValue {
                field,
                value: other.to_string(),
                allowed: vec!["0".to_string(), "90".to_string()],
            }),
        }
    }
}

impl Display for RightAngle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FieldCodec for RightAngle {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        let degrees = i64::decode(field, value)?;
        Self::from_degrees(field, degrees)
    }

    fn encode(&self) -> Option<String> {
        Some(self.degrees().to_string())
    }
}
