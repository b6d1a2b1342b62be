//! Conversion between continuous line parameters and accumulator bins.
//!
//! Lines are written in normal form `x·sin θ + y·cos θ = r` with pixel
//! coordinates `(x, y)` (column, row) and `θ ∈ [0, π)` the orientation of
//! the line itself: a horizontal axis has `θ = 0`, a vertical one `θ = π/2`.
//! `r` is signed. Over a `w × h` image it spans `[-h, hypot(w, h)]`.
//!
//! Bins are centred on `r_min + i·r_step` and `j·θ_step`, so quantization
//! rounds to the nearest centre and the round trip error is at most half a
//! bin for in-range values.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use fast_symmetry_core::wrap_angle_pi;

/// Linear quantization of `(r, θ)` into `(r_bins, theta_bins)` cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexMapper {
    r_bins: usize,
    theta_bins: usize,
    r_min: f32,
    r_max: f32,
    r_step: f32,
    theta_step: f32,
}

impl IndexMapper {
    /// Mapper over an explicit r-range. Bin counts must be non-zero; the
    /// detector validates them before calling this.
    pub(crate) fn new(r_bins: usize, theta_bins: usize, r_min: f32, r_max: f32) -> Self {
        let r_step = if r_bins > 1 {
            (r_max - r_min) / (r_bins - 1) as f32
        } else {
            (r_max - r_min).max(1.0)
        };
        Self {
            r_bins,
            theta_bins,
            r_min,
            r_max,
            r_step,
            theta_step: PI / theta_bins as f32,
        }
    }

    /// Mapper covering every line that can pass through a `width × height` image.
    pub(crate) fn for_image(width: usize, height: usize, r_bins: usize, theta_bins: usize) -> Self {
        let diag = (width as f32).hypot(height as f32);
        Self::new(r_bins, theta_bins, -(height as f32), diag)
    }

    pub fn r_bins(&self) -> usize {
        self.r_bins
    }

    pub fn theta_bins(&self) -> usize {
        self.theta_bins
    }

    /// Inclusive r-range covered by the bin centres.
    pub fn r_range(&self) -> (f32, f32) {
        (self.r_min, self.r_max)
    }

    /// Bin width along r in pixels.
    pub fn r_step(&self) -> f32 {
        self.r_step
    }

    /// Bin width along θ in radians.
    pub fn theta_step(&self) -> f32 {
        self.theta_step
    }

    #[inline]
    pub fn to_r_bin(&self, r: f32) -> usize {
        let x = ((r - self.r_min) / self.r_step).round();
        clamp_index(x, self.r_bins)
    }

    /// `theta` is in radians. Values past the last bin clamp to it instead of
    /// wrapping, since wrapping would also flip the sign of `r`.
    #[inline]
    pub fn to_theta_bin(&self, theta: f32) -> usize {
        let x = (theta / self.theta_step).round();
        clamp_index(x, self.theta_bins)
    }

    /// Centre of the r bin, in pixels.
    #[inline]
    pub fn from_r_bin(&self, r_bin: usize) -> f32 {
        self.r_at(r_bin as f32)
    }

    /// Centre of the θ bin, in radians.
    #[inline]
    pub fn from_theta_bin(&self, theta_bin: usize) -> f32 {
        self.theta_at(theta_bin as f32)
    }

    /// r at a fractional bin index.
    #[inline]
    pub fn r_at(&self, index: f32) -> f32 {
        self.r_min + index * self.r_step
    }

    /// θ at a fractional bin index, not wrapped.
    #[inline]
    pub fn theta_at(&self, index: f32) -> f32 {
        index * self.theta_step
    }

    /// Continuous `(r, θ)` at fractional indices, folded back to `θ ∈ [0, π)`.
    ///
    /// A θ that crosses either end of the half circle is wrapped and `r`
    /// negated, since `(r, θ)` and `(-r, θ + π)` are the same line.
    pub fn line_at(&self, r_index: f32, theta_index: f32) -> (f32, f32) {
        let r = self.r_at(r_index);
        let theta = self.theta_at(theta_index);
        if !(0.0..PI).contains(&theta) {
            (-r, wrap_angle_pi(theta))
        } else {
            (r, theta)
        }
    }

    /// r bin holding the same line as `r_bin` once θ wraps around by π.
    #[inline]
    pub(crate) fn mirror_r_bin(&self, r_bin: usize) -> usize {
        self.to_r_bin(-self.from_r_bin(r_bin))
    }
}

#[inline]
fn clamp_index(x: f32, bins: usize) -> usize {
    if x.is_nan() || x <= 0.0 {
        0
    } else {
        (x as usize).min(bins - 1)
    }
}
