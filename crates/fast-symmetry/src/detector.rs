use fast_symmetry_core::EdgeMapView;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::accumulator::{VoteStats, VotingAccumulator};
use crate::error::SymmetryError;
use crate::grid::HoughGrid;
use crate::index::IndexMapper;
use crate::params::{AccumulatorConfig, PeakParams, VoteParams};
use crate::peaks::PeakExtractor;
use crate::result::SymmetryResults;

/// Bilateral symmetry detector for edge maps of one fixed size.
///
/// Typical per-frame use:
///
/// ```
/// use fast_symmetry::{EdgeMap, PeakParams, SymmetryDetector, SymmetryResults, VoteParams};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let edges = EdgeMap::from_points(100, 40, &[(40, 10), (60, 10), (45, 30), (55, 30)])?;
/// let mut detector = SymmetryDetector::new(100, 40, 200, 180)?;
/// let mut results = SymmetryResults::with_capacity(4);
///
/// detector.reset();
/// detector.vote(&edges.view(), &VoteParams::unrestricted(5.0, 50.0))?;
/// detector.get_result(&mut results, &PeakParams::unrestricted(1, 10));
///
/// let axis = results.lines()[0];
/// assert!((axis.r - 50.0).abs() < 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SymmetryDetector {
    width: usize,
    height: usize,
    accumulator: VotingAccumulator,
    extractor: PeakExtractor,
}

impl SymmetryDetector {
    /// Build a detector for `width × height` edge maps with an
    /// `r_bins × theta_bins` accumulator.
    pub fn new(
        width: usize,
        height: usize,
        r_bins: usize,
        theta_bins: usize,
    ) -> Result<Self, SymmetryError> {
        if width == 0 || height == 0 {
            return Err(SymmetryError::InvalidImageSize { width, height });
        }
        if r_bins == 0 || theta_bins == 0 || r_bins.checked_mul(theta_bins).is_none() {
            return Err(SymmetryError::InvalidBins { r_bins, theta_bins });
        }
        let mapper = IndexMapper::for_image(width, height, r_bins, theta_bins);
        debug!(
            "symmetry detector {width}x{height}: {r_bins} r bins ({:.3} px), {theta_bins} theta bins ({:.3} deg)",
            mapper.r_step(),
            mapper.theta_step().to_degrees()
        );
        Ok(Self {
            width,
            height,
            accumulator: VotingAccumulator::new(mapper),
            extractor: PeakExtractor::new(r_bins, theta_bins),
        })
    }

    /// Build a detector with a resolution resolved from `config`.
    pub fn from_config(
        width: usize,
        height: usize,
        config: &AccumulatorConfig,
    ) -> Result<Self, SymmetryError> {
        let (r_bins, theta_bins) = config.resolve(width, height);
        Self::new(width, height, r_bins, theta_bins)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mapper(&self) -> &IndexMapper {
        self.accumulator.mapper()
    }

    /// Clear the vote grid. Voting never does this on its own.
    pub fn reset(&mut self) {
        self.accumulator.reset();
    }

    /// Vote every qualifying edge-pixel pair of `edges` into the accumulator.
    ///
    /// Votes add to whatever the grid already holds, so several edge maps
    /// can be integrated before extraction. The mask is not touched.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, edges, params),
            fields(width = edges.width, height = edges.height)
        )
    )]
    pub fn vote(
        &mut self,
        edges: &EdgeMapView<'_>,
        params: &VoteParams,
    ) -> Result<VoteStats, SymmetryError> {
        if edges.width != self.width || edges.height != self.height {
            return Err(SymmetryError::EdgeMapSize {
                expected_width: self.width,
                expected_height: self.height,
                width: edges.width,
                height: edges.height,
            });
        }
        let expected = self.width * self.height;
        if edges.data.len() != expected {
            return Err(SymmetryError::EdgeMapBuffer {
                expected,
                got: edges.data.len(),
            });
        }
        Ok(self.accumulator.vote(edges, params))
    }

    /// Extract up to `params.num_peaks` symmetry axes into `results`.
    ///
    /// The accumulator is first copied to the backup grid. Each peak is then
    /// zeroed in the accumulator and marked in the mask together with its
    /// suppression window. Returns the number of axes found.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, results, params),
            fields(num_peaks = params.num_peaks)
        )
    )]
    pub fn get_result(&mut self, results: &mut SymmetryResults, params: &PeakParams) -> usize {
        let Self {
            accumulator,
            extractor,
            ..
        } = self;
        extractor.extract(accumulator, results, params)
    }

    /// Put the pre-suppression votes of the last extraction back into the
    /// accumulator so extraction can be repeated.
    pub fn restore_from_backup(&mut self) {
        self.extractor.restore(&mut self.accumulator);
    }

    /// Forget all bins masked by earlier extractions.
    pub fn clear_mask(&mut self) {
        self.extractor.clear_mask();
    }

    /// Live vote grid.
    pub fn accumulator(&self) -> &HoughGrid<u32> {
        self.accumulator.grid()
    }

    /// Vote grid as it was before the last extraction suppressed anything.
    pub fn backup(&self) -> &HoughGrid<u32> {
        self.extractor.backup()
    }

    /// Bins suppressed by extraction.
    pub fn mask(&self) -> &HoughGrid<bool> {
        self.extractor.mask()
    }

    /// Distance in pixels represented by an r bin.
    pub fn pixel_from_index(&self, r_bin: usize) -> f32 {
        self.mapper().from_r_bin(r_bin)
    }

    /// Angle in radians represented by a θ bin.
    pub fn radians_from_index(&self, theta_bin: usize) -> f32 {
        self.mapper().from_theta_bin(theta_bin)
    }
}
