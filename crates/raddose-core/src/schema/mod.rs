//! Typed RADDOSE-3D input schema.
//!
//! Each block (`Crystal`, `Beam`, `Wedge`) is a plain struct backed by an
//! explicit field table. The table drives record decoding, validation and
//! rendering, always in declared keyword order.

mod beam;
pub mod enums;
mod experiment;
mod exposure;
mod geometry;
pub mod record;
pub mod tokens;

pub use beam::BeamSpec;
pub use enums::{AbsCoefCalc, BeamType, ContainerMaterialType, CrystalType, RightAngle, Subprogram};
pub use experiment::{ExperimentConfig, Exposures};
pub use exposure::ExposureSpec;
pub use geometry::GeometrySpec;
pub use record::{FieldCodec, FieldDef, FieldRecord, FieldValue, SchemaOptions};
pub use tokens::{Scalar, TokenShape, Tokens, format_real, normalize_tokens};
