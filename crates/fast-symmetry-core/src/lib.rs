//! Core types for fast bilateral symmetry detection.
//!
//! This crate is intentionally small. It holds the binary edge map types
//! consumed by the voting stage, the angular acceptance range shared by
//! voting and peak extraction, and the logger used by the binaries. It does
//! *not* depend on any concrete edge detector or image library.

mod angle;
mod image;
mod logger;

pub use angle::{wrap_angle_pi, AngleRange, AngleWindow};
pub use image::{EdgeMap, EdgeMapError, EdgeMapView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
