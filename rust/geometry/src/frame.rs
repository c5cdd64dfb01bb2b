// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Smoothed tangent frames along a closed path
//!
//! Two-point finite differences jitter badly around relaxed corners, so
//! tangents are built in two passes:
//!
//! 1. a distance-weighted central difference over `window` neighbours on
//!    each side (`weight = 1 / offset`)
//! 2. a weighted average of tangent *angles* over a smaller window, each
//!    unwrapped relative to the centre sample so no difference exceeds PI

use crate::path::{wrap_index, PathSample, MIN_SEGMENT_LENGTH};
use nalgebra::Vector2;
use smallvec::SmallVec;
use std::f64::consts::PI;

/// Half-window of the angle smoothing pass
pub const ANGLE_SMOOTHING_RADIUS: usize = 2;

/// Local frame at one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Unit planar tangent
    pub tangent: Vector2<f64>,
}

impl Frame {
    /// Frame from a tangent angle in radians
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self {
            tangent: Vector2::new(angle.cos(), angle.sin()),
        }
    }

    /// Unit left-hand normal `(-ty, tx)`
    #[inline]
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(-self.tangent.y, self.tangent.x)
    }

    /// Tangent heading in radians
    #[inline]
    pub fn angle(&self) -> f64 {
        self.tangent.y.atan2(self.tangent.x)
    }
}

/// Default first-pass window for a loop of `sample_count` samples
#[inline]
pub fn default_window(sample_count: usize) -> usize {
    (sample_count / 20).max(3)
}

/// Wrap an angle difference into `[-PI, PI]`
#[inline]
fn unwrap_delta(mut delta: f64) -> f64 {
    while delta > PI {
        delta -= 2.0 * PI;
    }
    while delta < -PI {
        delta += 2.0 * PI;
    }
    delta
}

/// First pass: weighted central differences, normalized
fn raw_tangents(samples: &[PathSample], window: usize) -> Vec<Vector2<f64>> {
    let n = samples.len();
    (0..n)
        .map(|i| {
            let mut sum = Vector2::zeros();
            let mut weight_sum = 0.0;

            for offset in 1..=window.max(1) {
                let o = offset as isize;
                let ahead = samples[wrap_index(i, o, n)];
                let behind = samples[wrap_index(i, -o, n)];
                let weight = 1.0 / offset as f64;
                sum += Vector2::new(ahead.x - behind.x, ahead.y - behind.y) * weight;
                weight_sum += weight;
            }

            let mean = sum / weight_sum;
            let len = mean.norm();
            if len > MIN_SEGMENT_LENGTH {
                mean / len
            } else {
                Vector2::x()
            }
        })
        .collect()
}

/// Compute a smoothed frame for every sample of a closed path.
///
/// `window` is the first-pass half-window; see [`default_window`].
pub fn compute_frames(samples: &[PathSample], window: usize) -> Vec<Frame> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let angles: Vec<f64> = raw_tangents(samples, window)
        .iter()
        .map(|t| t.y.atan2(t.x))
        .collect();

    let radius = ANGLE_SMOOTHING_RADIUS as isize;
    let frames: Vec<Frame> = (0..n)
        .map(|i| {
            let base = angles[i];
            let neighbours: SmallVec<[(f64, f64); 8]> = (-radius..=radius)
                .map(|o| {
                    let angle = base + unwrap_delta(angles[wrap_index(i, o, n)] - base);
                    (angle, 1.0 / (1.0 + o.unsigned_abs() as f64))
                })
                .collect();

            let weight_sum: f64 = neighbours.iter().map(|(_, w)| w).sum();
            let mean = neighbours.iter().map(|(a, w)| a * w).sum::<f64>() / weight_sum;
            Frame::from_angle(mean)
        })
        .collect();

    tracing::debug!(samples = n, window, "Computed smoothed frames");
    frames
}
