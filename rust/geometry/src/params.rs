// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Track and conditioning parameters

use crate::error::{Error, Result};
use crate::path::require_sample_count;

/// Corridor dimensions and synthesis switches for one track.
///
/// All lengths share the unit of the control points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackParams {
    /// Full roadway width (default 6.0)
    pub track_width: f64,
    /// Roadway slab thickness (default 0.3)
    pub track_thickness: f64,
    /// Barrier height above the roadway top (default 0.6)
    pub barrier_height: f64,
    /// Barrier width across the track (default 0.12)
    pub barrier_width: f64,
    /// Emit inner and outer barrier ribbons (default true)
    pub include_barriers: bool,
    /// Base spline samples between consecutive control points (default 16)
    pub segments_per_section: usize,
    /// Densify sharp spline sections up to 3x (default true)
    pub adaptive_subdivision: bool,
    /// Shrink the inside edge on tight turns (default true)
    pub adaptive_width: bool,
    /// Resample to uniform arc-length spacing before relaxation (default true)
    pub resample: bool,
    /// Translation applied to the conditioned path before meshing
    pub location: [f64; 3],
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            track_width: 6.0,
            track_thickness: 0.3,
            barrier_height: 0.6,
            barrier_width: 0.12,
            include_barriers: true,
            segments_per_section: 16,
            adaptive_subdivision: true,
            adaptive_width: true,
            resample: true,
            location: [0.0; 3],
        }
    }
}

impl TrackParams {
    /// Default parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track_width(mut self, width: f64) -> Self {
        self.track_width = width;
        self
    }

    pub fn with_track_thickness(mut self, thickness: f64) -> Self {
        self.track_thickness = thickness;
        self
    }

    /// Set barrier dimensions (height, width)
    pub fn with_barriers(mut self, height: f64, width: f64) -> Self {
        self.include_barriers = true;
        self.barrier_height = height;
        self.barrier_width = width;
        self
    }

    pub fn without_barriers(mut self) -> Self {
        self.include_barriers = false;
        self
    }

    pub fn with_segments_per_section(mut self, segments: usize) -> Self {
        self.segments_per_section = segments;
        self
    }

    pub fn with_adaptive_subdivision(mut self, enabled: bool) -> Self {
        self.adaptive_subdivision = enabled;
        self
    }

    pub fn with_adaptive_width(mut self, enabled: bool) -> Self {
        self.adaptive_width = enabled;
        self
    }

    pub fn with_resample(mut self, enabled: bool) -> Self {
        self.resample = enabled;
        self
    }

    pub fn with_location(mut self, x: f64, y: f64, z: f64) -> Self {
        self.location = [x, y, z];
        self
    }

    /// Half the roadway width
    #[inline]
    pub fn half_width(&self) -> f64 {
        self.track_width / 2.0
    }

    /// Reject non-positive or non-finite dimensions before any computation.
    /// Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        Error::require_positive("track_width", self.track_width)?;
        Error::require_positive("track_thickness", self.track_thickness)?;
        if self.include_barriers {
            Error::require_positive("barrier_height", self.barrier_height)?;
            Error::require_positive("barrier_width", self.barrier_width)?;
        }
        if self.segments_per_section == 0 {
            return Err(Error::InvalidParameter(
                "segments_per_section must be at least 1".to_string(),
            ));
        }
        require_sample_count("segments_per_section", Some(self.segments_per_section))?;
        if self.location.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidParameter(
                "location must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tunables for resampling and curvature relaxation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConditioningOptions {
    /// Target arc-length spacing; `None` derives `track_width / 3`
    pub spacing: Option<f64>,
    /// Lower bound on the resampled point count (default 100)
    pub min_points: usize,
    /// Hard cap on relaxation sweeps (default 50)
    pub max_iterations: usize,
    /// Worst-case excess angle, in radians, accepted as converged (default 0.01)
    pub tolerance: f64,
}

impl Default for ConditioningOptions {
    fn default() -> Self {
        Self {
            spacing: None,
            min_points: 100,
            max_iterations: 50,
            tolerance: 0.01,
        }
    }
}

impl ConditioningOptions {
    /// Spacing to resample at for a corridor of `track_width`
    #[inline]
    pub fn spacing_for(&self, track_width: f64) -> f64 {
        self.spacing.unwrap_or(track_width / 3.0)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(spacing) = self.spacing {
            Error::require_positive("spacing", spacing)?;
        }
        Error::require_positive("tolerance", self.tolerance)?;
        require_sample_count("min_points", Some(self.min_points))?;
        Ok(())
    }
}
