//! Fast bilateral symmetry detection in binary edge images.
//!
//! Every pair of edge pixels votes for its perpendicular bisector, the one
//! line that would mirror the two pixels onto each other. Votes land in a
//! quantized `(r, θ)` accumulator; the strongest, mutually suppressed bins
//! are the detected symmetry axes, refined to sub-bin precision.
//!
//! ## Quickstart
//!
//! ```no_run
//! use fast_symmetry::{detect, SymmetryConfig};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let edges = ImageReader::open("edges.png")?.decode()?.to_luma8();
//! let results = detect::detect_symmetry(&edges, &SymmetryConfig::default(), 4)?;
//! for line in &results {
//!     println!("r = {:.1} px, theta = {:.1} deg", line.r, line.theta.to_degrees());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Conventions
//! - Pixel `(x, y)` is (column, row) with the origin at the top-left pixel.
//! - An axis is `x·sin θ + y·cos θ = r`, `θ ∈ [0, π)`: `θ = 0` is a horizontal
//!   axis, `θ = π/2` a vertical one. `r` is signed.
//! - Angular ranges in [`VoteParams`] and [`PeakParams`] are in degrees.
//!
//! ## API map
//! - [`SymmetryDetector`]: owns the grids; `vote`, `get_result`, `reset`.
//! - [`IndexMapper`]: `(r, θ)` to bin conversions.
//! - [`SymmetryResults`] / [`SymmetryLine`]: extraction output.
//! - `detect` (feature `image`): helpers for `image::GrayImage` edge maps.

mod accumulator;
mod detector;
mod error;
mod grid;
mod index;
mod params;
mod peaks;
mod result;

#[cfg(feature = "image")]
pub mod detect;

pub use accumulator::{VoteStats, VotingAccumulator};
pub use detector::SymmetryDetector;
pub use error::SymmetryError;
pub use grid::HoughGrid;
pub use index::IndexMapper;
pub use params::{AccumulatorConfig, PeakParams, SymmetryConfig, VoteParams};
pub use peaks::PeakExtractor;
pub use result::{SymmetryLine, SymmetryResults};

pub use fast_symmetry_core as core;
pub use fast_symmetry_core::{AngleRange, EdgeMap, EdgeMapError, EdgeMapView};
