//! Typed input schema, renderer and process runner for the RADDOSE-3D
//! radiation dose engine.

pub mod domain;
pub mod render;
pub mod results;
pub mod runner;
pub mod schema;
