// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path sources
//!
//! A track path comes either from sparse control points (synthesized with
//! [`crate::spline::synthesize`]) or from one of the parametric presets
//! below, which emit a dense closed path directly. Both feed the same
//! conditioning and meshing stages.

use crate::error::{Error, Result};
use crate::params::TrackParams;
use crate::path::{
    ensure_loop, require_sample_count, wrap_index, ControlPoint, PathSample, MIN_SAMPLES,
};
use crate::spline::synthesize;
use nalgebra::Point3;
use std::f64::consts::PI;

/// Figure-eight lobe scale relative to the requested size
const FIGURE8_SCALE: f64 = 1.8;
/// Half-width of the bridge plateau around the crossing, relative to scale
const BRIDGE_ZONE: f64 = 0.4;
/// Length of the bridge ramp, relative to scale
const RAMP_ZONE: f64 = 0.3;
/// Half-window of the figure-eight height smoothing
const HEIGHT_SMOOTHING_WINDOW: usize = 8;
/// Weight of a sample's own height in the smoothing blend
const HEIGHT_KEEP: f64 = 0.7;

/// Where a track's centreline comes from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum PathSource {
    /// Sparse control loop, interpolated with Catmull-Rom
    ControlPoints {
        points: Vec<ControlPoint>,
        /// Per-point elevation; overrides `ControlPoint::elevation`
        #[cfg_attr(feature = "serde", serde(default))]
        elevation: Option<Vec<f64>>,
    },
    Circle {
        radius: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_circle_segments"))]
        segments: usize,
    },
    Oval {
        radius_x: f64,
        radius_y: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_oval_segments"))]
        segments: usize,
    },
    /// Two semicircles joined by straights
    Stadium {
        /// Distance between the semicircle centres
        length: f64,
        radius: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_curve_segments"))]
        segments_per_curve: usize,
    },
    /// Lemniscate with one lobe crossing over the other on a bridge
    FigureEight {
        size: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_bridge_height"))]
        bridge_height: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_figure8_segments"))]
        segments: usize,
    },
    /// Already-dense closed path, `[x, y, z]` per sample
    Polyline { points: Vec<[f64; 3]> },
}

#[cfg(feature = "serde")]
fn default_circle_segments() -> usize {
    32
}

#[cfg(feature = "serde")]
fn default_oval_segments() -> usize {
    64
}

#[cfg(feature = "serde")]
fn default_curve_segments() -> usize {
    16
}

#[cfg(feature = "serde")]
fn default_bridge_height() -> f64 {
    4.0
}

#[cfg(feature = "serde")]
fn default_figure8_segments() -> usize {
    96
}

impl PathSource {
    /// Control point loop without elevation list
    pub fn control_points<P: Into<ControlPoint>>(points: impl IntoIterator<Item = P>) -> Self {
        PathSource::ControlPoints {
            points: points.into_iter().map(Into::into).collect(),
            elevation: None,
        }
    }

    pub fn circle(radius: f64) -> Self {
        PathSource::Circle {
            radius,
            segments: 32,
        }
    }

    pub fn oval(radius_x: f64, radius_y: f64) -> Self {
        PathSource::Oval {
            radius_x,
            radius_y,
            segments: 64,
        }
    }

    pub fn stadium(length: f64, radius: f64) -> Self {
        PathSource::Stadium {
            length,
            radius,
            segments_per_curve: 16,
        }
    }

    pub fn figure_eight(size: f64, bridge_height: f64) -> Self {
        PathSource::FigureEight {
            size,
            bridge_height,
            segments: 96,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            PathSource::ControlPoints { .. } => "control_points",
            PathSource::Circle { .. } => "circle",
            PathSource::Oval { .. } => "oval",
            PathSource::Stadium { .. } => "stadium",
            PathSource::FigureEight { .. } => "figure_eight",
            PathSource::Polyline { .. } => "polyline",
        }
    }

    /// Produce the raw (unconditioned) closed path
    pub fn to_path(&self, params: &TrackParams) -> Result<Vec<PathSample>> {
        match self {
            PathSource::ControlPoints { points, elevation } => synthesize(
                points,
                elevation.as_deref(),
                params.segments_per_section,
                params.adaptive_subdivision,
            ),
            PathSource::Circle { radius, segments } => generate_circle_path(*radius, *segments),
            PathSource::Oval {
                radius_x,
                radius_y,
                segments,
            } => generate_oval_path(*radius_x, *radius_y, *segments),
            PathSource::Stadium {
                length,
                radius,
                segments_per_curve,
            } => generate_stadium_path(*length, *radius, *segments_per_curve),
            PathSource::FigureEight {
                size,
                bridge_height,
                segments,
            } => generate_figure8_path(*size, *bridge_height, *segments),
            PathSource::Polyline { points } => {
                let path: Vec<PathSample> =
                    points.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect();
                ensure_loop(&path)?;
                Ok(path)
            }
        }
    }
}

fn require_segments(name: &str, segments: usize) -> Result<()> {
    if segments < MIN_SAMPLES {
        return Err(Error::InvalidParameter(format!(
            "{} must be at least {}, got {}",
            name, MIN_SAMPLES, segments
        )));
    }
    require_sample_count(name, Some(segments))?;
    Ok(())
}

/// Hermite smooth step on `t` clamped to `[0, 1]`
#[inline]
pub fn smooth_step(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Blend each height with the circular mean of its `2 * window + 1`
/// neighbours (`0.7` own, `0.3` mean). Planar coordinates are untouched.
pub fn smooth_height_transitions(points: &[PathSample], window: usize) -> Vec<PathSample> {
    let n = points.len();
    let w = window as isize;
    (0..n)
        .map(|i| {
            let sum: f64 = (-w..=w).map(|o| points[wrap_index(i, o, n)].z).sum();
            let mean = sum / (2 * window + 1) as f64;
            let p = points[i];
            Point3::new(p.x, p.y, HEIGHT_KEEP * p.z + (1.0 - HEIGHT_KEEP) * mean)
        })
        .collect()
}

/// Axis-aligned ellipse centred at the origin, counter-clockwise from `+x`
pub fn generate_oval_path(
    radius_x: f64,
    radius_y: f64,
    segments: usize,
) -> Result<Vec<PathSample>> {
    Error::require_positive("radius_x", radius_x)?;
    Error::require_positive("radius_y", radius_y)?;
    require_segments("segments", segments)?;

    Ok((0..segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / segments as f64;
            Point3::new(radius_x * angle.cos(), radius_y * angle.sin(), 0.0)
        })
        .collect())
}

pub fn generate_circle_path(radius: f64, segments: usize) -> Result<Vec<PathSample>> {
    generate_oval_path(radius, radius, segments)
}

/// Stadium loop, travelled clockwise: right semicircle, bottom straight,
/// left semicircle, top straight. Each straight gets
/// `max(4, floor(length / 5))` segments.
pub fn generate_stadium_path(
    length: f64,
    radius: f64,
    segments_per_curve: usize,
) -> Result<Vec<PathSample>> {
    Error::require_positive("length", length)?;
    Error::require_positive("radius", radius)?;
    require_segments("segments_per_curve", segments_per_curve)?;

    let half_length = length / 2.0;
    let straight_segments = ((length / 5.0) as usize).max(4);
    let capacity = require_sample_count(
        "stadium length",
        segments_per_curve
            .checked_add(straight_segments)
            .and_then(|c| c.checked_mul(2)),
    )?;
    let mut points = Vec::with_capacity(capacity);

    let arc = |points: &mut Vec<PathSample>, center_x: f64, start: f64| {
        for i in 0..segments_per_curve {
            let angle = start - PI * i as f64 / segments_per_curve as f64;
            points.push(Point3::new(
                center_x + radius * angle.cos(),
                radius * angle.sin(),
                0.0,
            ));
        }
    };
    let straight = |points: &mut Vec<PathSample>, from_x: f64, direction: f64, y: f64| {
        for i in 0..straight_segments {
            let t = i as f64 / straight_segments as f64;
            points.push(Point3::new(from_x + direction * length * t, y, 0.0));
        }
    };

    arc(&mut points, half_length, PI / 2.0);
    straight(&mut points, half_length, -1.0, -radius);
    arc(&mut points, -half_length, -PI / 2.0);
    straight(&mut points, -half_length, 1.0, radius);

    Ok(points)
}

/// Figure-eight (lemniscate of Bernoulli, scale `1.8 * size`).
///
/// The first half of the parameter range is lifted by `bridge_height` near
/// the crossing so the two lobes pass over each other; `bridge_height = 0`
/// gives a flat figure-eight.
pub fn generate_figure8_path(
    size: f64,
    bridge_height: f64,
    segments: usize,
) -> Result<Vec<PathSample>> {
    Error::require_positive("size", size)?;
    if !bridge_height.is_finite() || bridge_height < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "bridge_height must be finite and non-negative, got {}",
            bridge_height
        )));
    }
    require_segments("segments", segments)?;

    let a = size * FIGURE8_SCALE;
    let cross_zone = a * BRIDGE_ZONE;
    let ramp_zone = a * RAMP_ZONE;

    let raw: Vec<PathSample> = (0..segments)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / segments as f64;
            let denom = 1.0 + t.sin().powi(2);
            let x = a * t.cos() / denom;
            let y = a * t.sin() * t.cos() / denom;

            let distance = x.abs();
            let lift = if t >= PI || distance >= cross_zone + ramp_zone {
                0.0
            } else if distance < cross_zone {
                1.0
            } else {
                1.0 - smooth_step((distance - cross_zone) / ramp_zone)
            };

            Point3::new(x, y, bridge_height * lift)
        })
        .collect();

    Ok(smooth_height_transitions(&raw, HEIGHT_SMOOTHING_WINDOW))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_points_on_radius() {
        let path = generate_circle_path(15.0, 32).unwrap();
        assert_eq!(path.len(), 32);
        for p in &path {
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 15.0, epsilon = 1e-9);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_oval_extents() {
        let path = generate_oval_path(30.0, 10.0, 64).unwrap();
        assert_relative_eq!(path[0].x, 30.0);
        assert_relative_eq!(path[16].y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stadium_layout() {
        let path = generate_stadium_path(40.0, 15.0, 16).unwrap();
        // 16 + 8 + 16 + 8
        assert_eq!(path.len(), 48);
        assert_relative_eq!(path[0].x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(path[0].y, 15.0, epsilon = 1e-9);
        // Bottom straight starts at the right end
        assert_relative_eq!(path[16].x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(path[16].y, -15.0, epsilon = 1e-9);
        // Top straight
        assert_relative_eq!(path[40].x, -20.0, epsilon = 1e-9);
        assert_relative_eq!(path[40].y, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_short_stadium_keeps_four_straight_segments() {
        let path = generate_stadium_path(10.0, 5.0, 8).unwrap();
        assert_eq!(path.len(), 8 + 4 + 8 + 4);
    }

    #[test]
    fn test_figure8_bridge() {
        let path = generate_figure8_path(20.0, 4.0, 96).unwrap();
        assert_eq!(path.len(), 96);

        // First crossing (t = PI/2) is on the bridge, second is at ground level
        assert_relative_eq!(path[24].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(path[24].z, 4.0, epsilon = 1e-9);
        assert_relative_eq!(path[72].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(path[72].z, 0.0, epsilon = 1e-9);
        // Far end of the lobe stays flat
        assert_relative_eq!(path[0].x, 36.0, epsilon = 1e-9);
        assert_relative_eq!(path[0].z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_flat_figure8() {
        let path = generate_figure8_path(10.0, 0.0, 48).unwrap();
        assert!(path.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_smooth_step() {
        assert_eq!(smooth_step(-1.0), 0.0);
        assert_eq!(smooth_step(0.5), 0.5);
        assert_eq!(smooth_step(2.0), 1.0);
    }

    #[test]
    fn test_height_smoothing_blends_step() {
        let mut pts = vec![Point3::new(0.0, 0.0, 0.0); 10];
        pts[0].z = 10.0;
        let smoothed = smooth_height_transitions(&pts, 1);
        assert_relative_eq!(smoothed[0].z, 0.7 * 10.0 + 0.3 * 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[1].z, 0.3 * 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[9].z, 0.3 * 10.0 / 3.0, epsilon = 1e-12);
        assert_eq!(smoothed[5].z, 0.0);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(generate_circle_path(0.0, 32).is_err());
        assert!(generate_circle_path(10.0, 2).is_err());
        assert!(generate_stadium_path(f64::INFINITY, 5.0, 16).is_err());
        assert!(generate_figure8_path(10.0, -1.0, 96).is_err());
    }

    #[test]
    fn test_oversized_segment_counts_rejected() {
        let huge: usize = 1_000_000_000_000_000_000;
        assert!(matches!(
            generate_circle_path(10.0, huge),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_stadium_path(40.0, 15.0, huge),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_stadium_path(1e12, 15.0, 16),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_figure8_path(20.0, 4.0, usize::MAX),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sources_dispatch() {
        let params = TrackParams::default();

        let square =
            PathSource::control_points([(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)]);
        assert_eq!(square.kind(), "control_points");
        // Square corners are right angles: every section is densified
        assert!(square.to_path(&params).unwrap().len() > 4 * 16);

        let polyline = PathSource::Polyline {
            points: vec![[0.0, 0.0, 0.0], [10.0, 0.0, 1.0], [5.0, 8.0, 2.0]],
        };
        let path = polyline.to_path(&params).unwrap();
        assert_eq!(path[1], Point3::new(10.0, 0.0, 1.0));

        let too_short = PathSource::Polyline {
            points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        };
        assert!(matches!(too_short.to_path(&params), Err(Error::DegeneratePath(_))));

        assert_eq!(PathSource::circle(10.0).to_path(&params).unwrap().len(), 32);
    }
}
