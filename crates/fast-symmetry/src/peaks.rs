//! Peak extraction with non-maximum suppression and sub-bin refinement.

use log::debug;

use crate::accumulator::VotingAccumulator;
use crate::grid::HoughGrid;
use crate::index::IndexMapper;
use crate::params::PeakParams;
use crate::result::{SymmetryLine, SymmetryResults};

/// Backup and mask grids used across extractions.
///
/// The backup holds the accumulator as it was before the last extraction
/// suppressed anything. The mask marks every bin suppressed so far; it is
/// cleared at the start of an extraction unless `use_mask` is set.
#[derive(Clone, Debug)]
pub struct PeakExtractor {
    backup: HoughGrid<u32>,
    mask: HoughGrid<bool>,
}

impl PeakExtractor {
    pub(crate) fn new(r_bins: usize, theta_bins: usize) -> Self {
        Self {
            backup: HoughGrid::new(r_bins, theta_bins),
            mask: HoughGrid::new(r_bins, theta_bins),
        }
    }

    pub fn backup(&self) -> &HoughGrid<u32> {
        &self.backup
    }

    pub fn mask(&self) -> &HoughGrid<bool> {
        &self.mask
    }

    pub(crate) fn clear_mask(&mut self) {
        self.mask.fill(false);
    }

    /// Copy the backup into the accumulator, undoing the last extraction's
    /// suppression.
    pub(crate) fn restore(&self, acc: &mut VotingAccumulator) {
        acc.grid_mut().copy_from(&self.backup);
    }

    /// Find up to `params.num_peaks` spatially distinct peaks.
    ///
    /// Suppressed windows are zeroed in the accumulator and marked in the mask.
    pub(crate) fn extract(
        &mut self,
        acc: &mut VotingAccumulator,
        results: &mut SymmetryResults,
        params: &PeakParams,
    ) -> usize {
        self.backup.copy_from(acc.grid());
        if !params.use_mask {
            self.clear_mask();
        }
        results.clear();

        let mapper = *acc.mapper();
        let allowed = allowed_theta_bins(&mapper, params);
        let half_w = (params.suppress_width / 2).min(mapper.r_bins());
        let half_h = (params.suppress_height / 2).min(mapper.theta_bins());

        for _ in 0..params.num_peaks {
            if results.is_full() {
                break;
            }
            let Some(peak) = find_max(acc.grid(), &self.mask, &allowed) else {
                break;
            };

            let r_idx = peak.r_bin as f32 + parabolic_offset(neighbors_r(&self.backup, &peak));
            let t_off = parabolic_offset(neighbors_theta(&self.backup, &mapper, &peak));
            let (r, theta) = mapper.line_at(r_idx, peak.theta_bin as f32 + t_off);

            debug!(
                "peak {}: bin ({}, {}) votes {} -> r {:.2} theta {:.2} deg",
                results.len(),
                peak.r_bin,
                peak.theta_bin,
                peak.votes,
                r,
                theta.to_degrees()
            );

            results.push(SymmetryLine {
                r,
                theta,
                r_index_raw: peak.r_bin,
                theta_index_raw: peak.theta_bin,
                votes: peak.votes,
            });

            suppress(
                acc.grid_mut(),
                &mut self.mask,
                &mapper,
                peak.r_bin,
                peak.theta_bin,
                half_w,
                half_h,
            );
        }

        results.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Peak {
    r_bin: usize,
    theta_bin: usize,
    votes: u32,
}

fn allowed_theta_bins(mapper: &IndexMapper, params: &PeakParams) -> Vec<bool> {
    match params.angle_range {
        Some(range) => {
            let window = range.window();
            (0..mapper.theta_bins())
                .map(|t| window.contains(mapper.from_theta_bin(t)))
                .collect()
        }
        None => vec![true; mapper.theta_bins()],
    }
}

/// Largest unmasked, allowed bin. Scanning is r-major and only a strictly
/// larger count replaces the current best, so ties go to the lowest
/// `r_bin`, then the lowest `theta_bin`. `None` if the best count is zero.
fn find_max(grid: &HoughGrid<u32>, mask: &HoughGrid<bool>, allowed: &[bool]) -> Option<Peak> {
    let mut best = Peak {
        r_bin: 0,
        theta_bin: 0,
        votes: 0,
    };
    for r_bin in 0..grid.r_bins() {
        let row = grid.r_row(r_bin);
        let mask_row = mask.r_row(r_bin);
        for (theta_bin, (&v, &masked)) in row.iter().zip(mask_row).enumerate() {
            if v > best.votes && !masked && allowed[theta_bin] {
                best = Peak {
                    r_bin,
                    theta_bin,
                    votes: v,
                };
            }
        }
    }
    (best.votes > 0).then_some(best)
}

fn neighbors_r(grid: &HoughGrid<u32>, peak: &Peak) -> Option<[f32; 3]> {
    let prev = grid.get(peak.r_bin.checked_sub(1)?, peak.theta_bin)?;
    let next = grid.get(peak.r_bin + 1, peak.theta_bin)?;
    let mid = grid.get(peak.r_bin, peak.theta_bin)?;
    Some([prev as f32, mid as f32, next as f32])
}

/// θ neighbours of a peak. θ is periodic: the neighbour across either end
/// of the half circle is read at the mirrored r bin.
fn neighbors_theta(
    grid: &HoughGrid<u32>,
    mapper: &IndexMapper,
    peak: &Peak,
) -> Option<[f32; 3]> {
    if mapper.theta_bins() < 2 {
        return None;
    }
    let last = mapper.theta_bins() - 1;
    let (r_bin, theta_bin) = (peak.r_bin, peak.theta_bin);
    let prev = match theta_bin {
        0 => grid.get(mapper.mirror_r_bin(r_bin), last)?,
        t => grid.get(r_bin, t - 1)?,
    };
    let next = if theta_bin == last {
        grid.get(mapper.mirror_r_bin(r_bin), 0)?
    } else {
        grid.get(r_bin, theta_bin + 1)?
    };
    let mid = grid.get(r_bin, theta_bin)?;
    Some([prev as f32, mid as f32, next as f32])
}

/// Vertex offset of the parabola through three equally spaced samples,
/// clamped to half a bin. Zero at a grid edge or without a strict maximum.
fn parabolic_offset(samples: Option<[f32; 3]>) -> f32 {
    let Some([y0, y1, y2]) = samples else {
        return 0.0;
    };
    let denom = y0 - 2.0 * y1 + y2;
    if denom >= -1e-6 {
        return 0.0;
    }
    (0.5 * (y0 - y2) / denom).clamp(-0.5, 0.5)
}

/// Zero and mask the window `[r ± half_w] × [θ ± half_h]` around a peak.
///
/// θ rows past either end wrap to the other end with the r centre mirrored,
/// since `(r, θ)` and `(-r, θ ± π)` are the same line. `half_h` must not
/// exceed the number of θ bins.
fn suppress(
    grid: &mut HoughGrid<u32>,
    mask: &mut HoughGrid<bool>,
    mapper: &IndexMapper,
    r_bin: usize,
    theta_bin: usize,
    half_w: usize,
    half_h: usize,
) {
    let theta_bins = mapper.theta_bins() as isize;
    let r_bins = mapper.r_bins();
    let mirrored = mapper.mirror_r_bin(r_bin);

    for dt in -(half_h as isize)..=(half_h as isize) {
        let t = theta_bin as isize + dt;
        let (t, r_centre) = if t < 0 {
            (t + theta_bins, mirrored)
        } else if t >= theta_bins {
            (t - theta_bins, mirrored)
        } else {
            (t, r_bin)
        };
        if !(0..theta_bins).contains(&t) {
            continue;
        }
        let t = t as usize;
        let r_lo = r_centre.saturating_sub(half_w);
        let r_hi = (r_centre + half_w).min(r_bins - 1);
        for r in r_lo..=r_hi {
            grid.set(r, t, 0);
            mask.set(r, t, true);
        }
    }
}
