use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// One detected symmetry axis.
///
/// The axis is the line `x·sin θ + y·cos θ = r` in pixel coordinates.
/// `r`/`theta` are sub-bin refined; the raw indices are the winning bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymmetryLine {
    /// Signed distance of the axis from the top-left pixel, in pixels.
    pub r: f32,
    /// Axis orientation in radians, in [0, π).
    pub theta: f32,
    pub r_index_raw: usize,
    pub theta_index_raw: usize,
    /// Votes in the winning bin before suppression.
    pub votes: u32,
}

impl SymmetryLine {
    /// Unit vector along the axis.
    pub fn direction(&self) -> Vector2<f32> {
        Vector2::new(self.theta.cos(), -self.theta.sin())
    }

    /// Unit normal; `r` is measured along it.
    pub fn normal(&self) -> Vector2<f32> {
        Vector2::new(self.theta.sin(), self.theta.cos())
    }

    /// Signed distance from `p` to the axis.
    pub fn signed_distance(&self, p: Point2<f32>) -> f32 {
        self.normal().dot(&p.coords) - self.r
    }

    /// Mirror image of `p` across the axis.
    pub fn reflect(&self, p: Point2<f32>) -> Point2<f32> {
        p - self.normal() * (2.0 * self.signed_distance(p))
    }

    /// The part of the axis inside the `width × height` pixel rectangle, if any.
    pub fn segment_in(&self, width: usize, height: usize) -> Option<(Point2<f32>, Point2<f32>)> {
        if width == 0 || height == 0 {
            return None;
        }
        let origin = Point2::from(self.normal() * self.r);
        let d = self.direction();
        let bounds = [(width - 1) as f32, (height - 1) as f32];

        let mut t0 = f32::NEG_INFINITY;
        let mut t1 = f32::INFINITY;
        for axis in 0..2 {
            let (o, v, hi) = (origin[axis], d[axis], bounds[axis]);
            if v.abs() < 1e-9 {
                if o < 0.0 || o > hi {
                    return None;
                }
                continue;
            }
            let (a, b) = ((0.0 - o) / v, (hi - o) / v);
            t0 = t0.max(a.min(b));
            t1 = t1.min(a.max(b));
        }
        if t0 > t1 {
            return None;
        }
        Some((origin + d * t0, origin + d * t1))
    }
}

/// Caller-owned, fixed-capacity list of detected axes, strongest first.
///
/// Extraction clears and refills it; it never grows past its capacity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymmetryResults {
    capacity: usize,
    lines: Vec<SymmetryLine>,
}

impl SymmetryResults {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            lines: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of axes found by the last extraction.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[SymmetryLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymmetryLine> {
        self.lines.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    pub(crate) fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    pub(crate) fn push(&mut self, line: SymmetryLine) {
        if !self.is_full() {
            self.lines.push(line);
        }
    }
}

impl<'a> IntoIterator for &'a SymmetryResults {
    type Item = &'a SymmetryLine;
    type IntoIter = std::slice::Iter<'a, SymmetryLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
