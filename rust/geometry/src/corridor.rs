// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptive corridor profile
//!
//! Where the local curvature radius is small compared to the corridor
//! half-width, the edge on the inside of the turn is pulled in so the two
//! edges of the ribbon never cross. The outside edge always keeps the full
//! half-width.

use crate::curvature::{estimate_curvature, CurvatureEstimate, TurnDirection};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::path::PathSample;
use nalgebra::{Point3, Vector3};

/// Radii above this multiple of the half-width need no adjustment
const RELAXED_RADIUS_FACTOR: f64 = 3.0;

/// Fraction of the curvature radius the inside edge may reach
const INSIDE_RADIUS_FACTOR: f64 = 0.85;

/// Clearance subtracted from the scaled radius
const INSIDE_CLEARANCE: f64 = 0.1;

/// Narrowest inside offset; keeps the corridor from collapsing to zero width
pub const MIN_INSIDE_OFFSET: f64 = 0.1;

/// Edge distances from the centreline at one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorOffsets {
    /// Distance to the left edge (along the left normal)
    pub left: f64,
    /// Distance to the right edge (against the left normal)
    pub right: f64,
}

impl CorridorOffsets {
    /// Symmetric offsets
    #[inline]
    pub fn uniform(half_width: f64) -> Self {
        Self {
            left: half_width,
            right: half_width,
        }
    }

    /// Apply the adaptive rule to one curvature estimate
    pub fn adaptive(estimate: &CurvatureEstimate, half_width: f64) -> Self {
        if estimate.radius > half_width * RELAXED_RADIUS_FACTOR {
            return Self::uniform(half_width);
        }

        let floor = MIN_INSIDE_OFFSET.min(half_width);
        let inside = (estimate.radius * INSIDE_RADIUS_FACTOR - INSIDE_CLEARANCE)
            .min(half_width)
            .max(floor);

        match estimate.direction() {
            TurnDirection::Left => Self {
                left: inside,
                right: half_width,
            },
            TurnDirection::Right => Self {
                left: half_width,
                right: inside,
            },
            TurnDirection::Straight => Self::uniform(half_width),
        }
    }
}

/// Compute per-sample corridor offsets for a closed path.
///
/// Both offsets satisfy `0 < offset <= half_width`.
pub fn compute_offsets(samples: &[PathSample], half_width: f64) -> Result<Vec<CorridorOffsets>> {
    Error::require_positive("half_width", half_width)?;

    let offsets: Vec<CorridorOffsets> = estimate_curvature(samples)
        .iter()
        .map(|e| CorridorOffsets::adaptive(e, half_width))
        .collect();

    let narrowed = offsets
        .iter()
        .filter(|o| o.left < half_width || o.right < half_width)
        .count();
    tracing::debug!(samples = offsets.len(), narrowed, "Computed adaptive corridor offsets");

    Ok(offsets)
}

/// Full half-width on both sides at every sample
pub fn uniform_offsets(sample_count: usize, half_width: f64) -> Result<Vec<CorridorOffsets>> {
    Error::require_positive("half_width", half_width)?;
    Ok(vec![CorridorOffsets::uniform(half_width); sample_count])
}

/// Which side of the roadway a barrier runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierSide {
    /// Left of the travel direction (the outer barrier)
    Left,
    /// Right of the travel direction (the inner barrier)
    Right,
}

/// Signed centreline offsets (positive = left) placing a barrier of
/// `barrier_width` flush against the adaptive roadway edge.
pub fn barrier_center_offsets(
    offsets: &[CorridorOffsets],
    side: BarrierSide,
    barrier_width: f64,
) -> Vec<f64> {
    let half = barrier_width / 2.0;
    offsets
        .iter()
        .map(|o| match side {
            BarrierSide::Left => o.left + half,
            BarrierSide::Right => -(o.right + half),
        })
        .collect()
}

/// Cross-section corners at one sample, in the order
/// `[left_top, right_top, right_bottom, left_bottom]`
pub type Section = [Point3<f64>; 4];

pub const LEFT_TOP: usize = 0;
pub const RIGHT_TOP: usize = 1;
pub const RIGHT_BOTTOM: usize = 2;
pub const LEFT_BOTTOM: usize = 3;

/// Left/right 3D edge points at the top and bottom of a slab, per sample.
/// This is everything the mesh builder needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorStrip {
    pub sections: Vec<Section>,
}

impl CorridorStrip {
    /// Roadway strip: edges at the (possibly asymmetric) adaptive offsets,
    /// bottom on the path and top `thickness` above it.
    pub fn roadway(
        samples: &[PathSample],
        frames: &[Frame],
        offsets: &[CorridorOffsets],
        thickness: f64,
    ) -> Result<Self> {
        if offsets.len() != samples.len() {
            return Err(Error::MismatchedLengths(format!(
                "{} offsets for {} samples",
                offsets.len(),
                samples.len()
            )));
        }
        if offsets
            .iter()
            .any(|o| !(o.left > 0.0 && o.right > 0.0 && o.left.is_finite() && o.right.is_finite()))
        {
            return Err(Error::InvalidParameter(
                "corridor offsets must be positive and finite".to_string(),
            ));
        }
        Self::from_edges(samples, frames, 0.0, thickness, |i| {
            (offsets[i].left, -offsets[i].right)
        })
    }

    /// Symmetric ribbon of `width` centred `center_offsets[i]` along the
    /// left normal, spanning `base_height..base_height + height` above the path.
    pub fn ribbon(
        samples: &[PathSample],
        frames: &[Frame],
        center_offsets: &[f64],
        width: f64,
        height: f64,
        base_height: f64,
    ) -> Result<Self> {
        Error::require_positive("ribbon width", width)?;
        if !base_height.is_finite() {
            return Err(Error::InvalidParameter("base_height must be finite".to_string()));
        }
        if center_offsets.len() != samples.len() {
            return Err(Error::MismatchedLengths(format!(
                "{} ribbon offsets for {} samples",
                center_offsets.len(),
                samples.len()
            )));
        }
        let half = width / 2.0;
        Self::from_edges(samples, frames, base_height, height, |i| {
            (center_offsets[i] + half, center_offsets[i] - half)
        })
    }

    /// Shared construction from signed left/right edge positions along the normal
    fn from_edges(
        samples: &[PathSample],
        frames: &[Frame],
        base_height: f64,
        height: f64,
        edges: impl Fn(usize) -> (f64, f64),
    ) -> Result<Self> {
        Error::require_positive("slab height", height)?;
        if frames.len() != samples.len() {
            return Err(Error::MismatchedLengths(format!(
                "{} frames for {} samples",
                frames.len(),
                samples.len()
            )));
        }

        let up = Vector3::z();
        let sections = samples
            .iter()
            .zip(frames)
            .enumerate()
            .map(|(i, (p, frame))| {
                let (left, right) = edges(i);
                let n = frame.normal();
                let normal = Vector3::new(n.x, n.y, 0.0);
                let bottom = p + up * base_height;
                let left_bottom = bottom + normal * left;
                let right_bottom = bottom + normal * right;
                [
                    left_bottom + up * height,
                    right_bottom + up * height,
                    right_bottom,
                    left_bottom,
                ]
            })
            .collect();

        Ok(Self { sections })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
