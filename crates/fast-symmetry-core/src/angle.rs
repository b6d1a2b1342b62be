//! Angles on the half circle `[0, π)` and angular acceptance ranges.
//!
//! Axis orientations are only defined modulo π, so every comparison here
//! wraps with period π.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Wrap an angle to [0, π).
#[inline]
pub fn wrap_angle_pi(theta: f32) -> f32 {
    let mut t = theta % PI;
    if t < 0.0 {
        t += PI;
    }
    if t >= PI {
        t -= PI;
    }
    t
}

/// Angular acceptance range in degrees.
///
/// The range covers the arc from `min_deg` counter-clockwise to `max_deg`
/// modulo 180°. `-25..25` therefore accepts `[155°, 180°) ∪ [0°, 25°]`, and an
/// inverted pair such as `160..20` accepts `[160°, 180°) ∪ [0°, 20°]`. A span
/// of 180° or more in either direction accepts every orientation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min_deg: f32,
    pub max_deg: f32,
}

impl Default for AngleRange {
    fn default() -> Self {
        Self {
            min_deg: -25.0,
            max_deg: 25.0,
        }
    }
}

impl AngleRange {
    pub fn new(min_deg: f32, max_deg: f32) -> Self {
        Self { min_deg, max_deg }
    }

    /// Precompute the radian form used in hot loops.
    pub fn window(&self) -> AngleWindow {
        let span_deg = self.max_deg - self.min_deg;
        if span_deg.abs() >= 180.0 {
            return AngleWindow {
                start: 0.0,
                span: PI,
                full: true,
            };
        }
        AngleWindow {
            start: wrap_angle_pi(self.min_deg.to_radians()),
            span: wrap_angle_pi(span_deg.to_radians()),
            full: false,
        }
    }

    pub fn contains(&self, theta: f32) -> bool {
        self.window().contains(theta)
    }
}

/// Radian form of an [`AngleRange`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleWindow {
    start: f32,
    span: f32,
    full: bool,
}

impl AngleWindow {
    const EPS: f32 = 1e-5;

    /// Whether `theta` (radians, any value) falls inside the window.
    #[inline]
    pub fn contains(&self, theta: f32) -> bool {
        if self.full {
            return true;
        }
        let offset = wrap_angle_pi(theta - self.start);
        offset <= self.span + Self::EPS || offset >= PI - Self::EPS
    }
}
