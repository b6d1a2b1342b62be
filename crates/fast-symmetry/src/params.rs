use fast_symmetry_core::AngleRange;
use serde::{Deserialize, Serialize};

/// Accumulator resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Number of r bins. `None` picks `hypot(width, height) + 1`. The r-range
    /// is `[-height, hypot(width, height)]`, so those bins are 1 to about 2
    /// pixels wide depending on the aspect ratio.
    pub r_bins: Option<usize>,
    /// Number of θ bins on [0, π). 180 gives one degree per bin.
    pub theta_bins: usize,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            r_bins: None,
            theta_bins: 180,
        }
    }
}

impl AccumulatorConfig {
    /// Concrete `(r_bins, theta_bins)` for an image size.
    pub fn resolve(&self, width: usize, height: usize) -> (usize, usize) {
        let r_bins = self
            .r_bins
            .unwrap_or_else(|| (width as f32).hypot(height as f32) as usize + 1);
        (r_bins, self.theta_bins)
    }
}

/// Parameters of one voting pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteParams {
    /// Minimal distance between the two pixels of a pair (inclusive).
    pub min_dist: f32,
    /// Maximal distance between the two pixels of a pair (inclusive).
    pub max_dist: f32,
    /// Only vote for axes whose orientation falls in this range (degrees).
    pub angle_range: Option<AngleRange>,
}

impl Default for VoteParams {
    fn default() -> Self {
        Self {
            min_dist: 25.0,
            max_dist: 250.0,
            angle_range: Some(AngleRange::default()),
        }
    }
}

impl VoteParams {
    /// Vote for every orientation with the given pair distance range.
    pub fn unrestricted(min_dist: f32, max_dist: f32) -> Self {
        Self {
            min_dist,
            max_dist,
            angle_range: None,
        }
    }
}

/// Parameters of one peak extraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Maximal number of peaks to return. Also capped by the result set capacity.
    pub num_peaks: usize,
    /// Suppression window size along r, in bins.
    pub suppress_width: usize,
    /// Suppression window size along θ, in bins.
    pub suppress_height: usize,
    /// Keep bins masked by earlier extractions excluded. When `false` the
    /// mask is cleared before searching.
    pub use_mask: bool,
    /// Only consider bins whose centre orientation falls in this range (degrees).
    pub angle_range: Option<AngleRange>,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            num_peaks: 1,
            suppress_width: 10,
            suppress_height: 10,
            use_mask: false,
            angle_range: Some(AngleRange::default()),
        }
    }
}

impl PeakParams {
    /// `num_peaks` peaks over all orientations with a square suppression window.
    pub fn unrestricted(num_peaks: usize, suppress: usize) -> Self {
        Self {
            num_peaks,
            suppress_width: suppress,
            suppress_height: suppress,
            use_mask: false,
            angle_range: None,
        }
    }
}

/// Complete detector configuration, as loaded by the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryConfig {
    pub accumulator: AccumulatorConfig,
    pub vote: VoteParams,
    pub peaks: PeakParams,
}
