//! Pairwise voting of edge pixels into the `(r, θ)` accumulator.
//!
//! Every unordered pair of edge pixels `p`, `q` whose distance lies in
//! `[min_dist, max_dist]` votes once for its perpendicular bisector, the only
//! axis that maps `p` onto `q`. Pairing is exhaustive; rows are scanned in
//! order so the inner loop stops once the row gap alone exceeds `max_dist`.
//! No gradient-based pruning is done, so no qualifying pair is ever skipped.

use fast_symmetry_core::{AngleWindow, EdgeMapView};
use log::debug;
use nalgebra::Point2;

use crate::grid::HoughGrid;
use crate::index::IndexMapper;
use crate::params::VoteParams;

/// Counters from one voting pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoteStats {
    /// Edge pixels found in the map.
    pub edge_points: usize,
    /// Pairs whose distance fell in the configured range.
    pub pairs_in_range: u64,
    /// Votes actually cast (pairs in range that passed the angle filter).
    pub votes: u64,
}

/// Vote grid over `(r_bin, theta_bin)` plus the mapper that defines its bins.
///
/// Votes accumulate across calls to [`VotingAccumulator::vote`]; call
/// [`VotingAccumulator::reset`] to start a fresh query.
#[derive(Clone, Debug)]
pub struct VotingAccumulator {
    mapper: IndexMapper,
    votes: HoughGrid<u32>,
    points: Vec<Point2<i32>>,
}

impl VotingAccumulator {
    pub(crate) fn new(mapper: IndexMapper) -> Self {
        Self {
            votes: HoughGrid::new(mapper.r_bins(), mapper.theta_bins()),
            mapper,
            points: Vec::new(),
        }
    }

    pub fn mapper(&self) -> &IndexMapper {
        &self.mapper
    }

    pub fn grid(&self) -> &HoughGrid<u32> {
        &self.votes
    }

    pub(crate) fn grid_mut(&mut self) -> &mut HoughGrid<u32> {
        &mut self.votes
    }

    pub fn reset(&mut self) {
        self.votes.fill(0);
    }

    /// Add the votes of every qualifying pair in `edges` to the grid.
    ///
    /// The caller has already checked that `edges` matches the grid's image.
    pub(crate) fn vote(&mut self, edges: &EdgeMapView<'_>, params: &VoteParams) -> VoteStats {
        self.points.clear();
        edges.collect_edge_points(&mut self.points);

        let mut stats = VoteStats {
            edge_points: self.points.len(),
            ..VoteStats::default()
        };

        let Some(filter) = PairFilter::new(params) else {
            debug!(
                "empty distance range [{}, {}], no votes cast",
                params.min_dist, params.max_dist
            );
            return stats;
        };

        let points = &self.points;
        for (i, p) in points.iter().enumerate() {
            for q in &points[i + 1..] {
                // Points are in row order, so every later q is at least this far below.
                if (q.y - p.y) as i64 > filter.max_row_gap {
                    break;
                }
                let Some(axis) = filter.bisector(p, q) else {
                    continue;
                };
                stats.pairs_in_range += 1;
                if let Some(window) = &filter.window {
                    if !window.contains(axis.theta) {
                        continue;
                    }
                }
                let r_bin = self.mapper.to_r_bin(axis.r);
                let theta_bin = self.mapper.to_theta_bin(axis.theta);
                self.votes.increment(r_bin, theta_bin);
                stats.votes += 1;
            }
        }

        debug!(
            "voted {} edge points: {} pairs in range, {} votes",
            stats.edge_points, stats.pairs_in_range, stats.votes
        );
        stats
    }
}

/// Perpendicular bisector of a pixel pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bisector {
    pub r: f32,
    pub theta: f32,
}

/// Precomputed distance bounds and angle window for one voting pass.
struct PairFilter {
    min_sq: i64,
    max_sq: i64,
    max_row_gap: i64,
    window: Option<AngleWindow>,
}

impl PairFilter {
    /// `None` when no pair can satisfy the distance range.
    fn new(params: &VoteParams) -> Option<Self> {
        let min_dist = params.min_dist.max(0.0);
        let max_dist = params.max_dist;
        if min_dist.is_nan() || max_dist.is_nan() || min_dist > max_dist || max_dist <= 0.0 {
            return None;
        }
        // Integer bounds on squared distances: d² >= min² and d² <= max².
        let min_sq = (min_dist as f64 * min_dist as f64).ceil() as i64;
        let max_sq = (max_dist as f64 * max_dist as f64).floor() as i64;
        if min_sq > max_sq {
            return None;
        }
        Some(Self {
            min_sq: min_sq.max(1),
            max_sq,
            max_row_gap: max_dist as i64,
            window: params.angle_range.map(|r| r.window()),
        })
    }

    #[inline]
    fn bisector(&self, p: &Point2<i32>, q: &Point2<i32>) -> Option<Bisector> {
        let (vx, vy) = ((q.x - p.x) as i64, (q.y - p.y) as i64);
        let d_sq = vx * vx + vy * vy;
        if d_sq < self.min_sq || d_sq > self.max_sq {
            return None;
        }
        Some(pair_bisector(p, q))
    }
}

/// Axis `(r, θ)` that reflects `p` onto `q`.
///
/// The axis normal is the pair direction `v`, flipped so that `θ = atan2(vx, vy)`
/// lands in [0, π); `r` is the projection of the midpoint on that normal.
#[inline]
pub(crate) fn pair_bisector(p: &Point2<i32>, q: &Point2<i32>) -> Bisector {
    let (mut vx, mut vy) = ((q.x - p.x) as f32, (q.y - p.y) as f32);
    if vx < 0.0 || (vx == 0.0 && vy < 0.0) {
        vx = -vx;
        vy = -vy;
    }
    let len = vx.hypot(vy);
    let sx = (p.x + q.x) as f32;
    let sy = (p.y + q.y) as f32;
    Bisector {
        r: (sx * vx + sy * vy) / (2.0 * len),
        theta: vx.atan2(vy),
    }
}
