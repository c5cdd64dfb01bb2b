// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control points, path samples and circular index arithmetic
//!
//! Every sequence in the pipeline is a closed loop: index `n - 1` is
//! adjacent to index `0`. Adjacency is modelled purely by index arithmetic.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector2};

/// Minimum number of samples any stage may produce
pub const MIN_SAMPLES: usize = 3;

/// Maximum number of samples any stage may produce
pub const MAX_SAMPLES: usize = 1 << 20;

/// Segments shorter than this are treated as zero-length
pub const MIN_SEGMENT_LENGTH: f64 = 0.001;

/// A point on the synthesized path. `z` carries elevation.
pub type PathSample = Point3<f64>;

/// User-supplied 2D control point with optional elevation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: Option<f64>,
}

impl ControlPoint {
    /// Create a flat control point
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            elevation: None,
        }
    }

    /// Create a control point with an elevation
    #[inline]
    pub fn with_elevation(x: f64, y: f64, elevation: f64) -> Self {
        Self {
            x,
            y,
            elevation: Some(elevation),
        }
    }

    /// Elevation, or ground level when none was given
    #[inline]
    pub fn height(&self) -> f64 {
        self.elevation.unwrap_or(0.0)
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for ControlPoint {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::with_elevation(x, y, z)
    }
}

/// Index of the sample before `i` on a loop of length `n`
#[inline]
pub fn prev_index(i: usize, n: usize) -> usize {
    (i + n - 1) % n
}

/// Index of the sample after `i` on a loop of length `n`
#[inline]
pub fn next_index(i: usize, n: usize) -> usize {
    (i + 1) % n
}

/// Index at signed `offset` from `i` on a loop of length `n`
#[inline]
pub fn wrap_index(i: usize, offset: isize, n: usize) -> usize {
    (i as isize + offset).rem_euclid(n as isize) as usize
}

/// Planar (xy) difference `b - a`
#[inline]
pub fn planar_delta(a: &PathSample, b: &PathSample) -> Vector2<f64> {
    Vector2::new(b.x - a.x, b.y - a.y)
}

/// Planar (xy) distance between two samples
#[inline]
pub fn planar_distance(a: &PathSample, b: &PathSample) -> f64 {
    planar_delta(a, b).norm()
}

/// Lengths of every segment of the closed loop, including the wrap segment
/// from the last sample back to the first. Lengths are measured in 3D.
pub fn segment_lengths(samples: &[PathSample]) -> Vec<f64> {
    let n = samples.len();
    (0..n)
        .map(|i| (samples[next_index(i, n)] - samples[i]).norm())
        .collect()
}

/// Total closed-loop arc length
pub fn loop_length(samples: &[PathSample]) -> f64 {
    segment_lengths(samples).iter().sum()
}

/// Reject loops that cannot carry a corridor
pub fn ensure_loop(samples: &[PathSample]) -> Result<()> {
    if samples.len() < MIN_SAMPLES {
        return Err(Error::DegeneratePath(format!(
            "a closed path needs at least {} samples, got {}",
            MIN_SAMPLES,
            samples.len()
        )));
    }
    if samples
        .iter()
        .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(Error::DegeneratePath(
            "path contains non-finite coordinates".to_string(),
        ));
    }
    Ok(())
}

/// Reject a requested sample count above [`MAX_SAMPLES`].
///
/// `None` stands for a count whose computation overflowed.
pub fn require_sample_count(name: &str, count: Option<usize>) -> Result<usize> {
    match count {
        Some(count) if count <= MAX_SAMPLES => Ok(count),
        Some(count) => Err(Error::InvalidParameter(format!(
            "{} would produce {} samples, more than the limit of {}",
            name, count, MAX_SAMPLES
        ))),
        None => Err(Error::InvalidParameter(format!(
            "{} would produce more than {} samples",
            name, MAX_SAMPLES
        ))),
    }
}
