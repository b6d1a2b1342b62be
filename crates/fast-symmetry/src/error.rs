/// Errors returned by the symmetry detector.
///
/// Only configuration problems are errors. Degenerate inputs (no edges, an
/// empty distance range, an all-zero accumulator) produce empty results.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SymmetryError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidImageSize { width: usize, height: usize },

    #[error("invalid accumulator resolution (r_bins={r_bins}, theta_bins={theta_bins})")]
    InvalidBins { r_bins: usize, theta_bins: usize },

    #[error(
        "edge map is {width}x{height} but the detector was built for {expected_width}x{expected_height}"
    )]
    EdgeMapSize {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("edge map buffer has {got} bytes, expected {expected}")]
    EdgeMapBuffer { expected: usize, got: usize },
}
