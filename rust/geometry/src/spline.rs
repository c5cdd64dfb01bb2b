// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path synthesis - closed Catmull-Rom interpolation of control points
//!
//! Section `i` runs from control point `i` to `i + 1` and takes its tangents
//! from the circular neighbours `i - 1` and `i + 2`. Elevation is
//! interpolated with the same basis so height and position stay in phase.

use crate::error::{Error, Result};
use crate::path::{require_sample_count, wrap_index, ControlPoint, PathSample, MIN_SEGMENT_LENGTH};
use nalgebra::{Point3, Vector2};

/// Upper bound on the adaptive section density multiplier
const MAX_DENSITY_MULTIPLIER: f64 = 3.0;

/// Uniform Catmull-Rom basis evaluated on one scalar channel, `t` in `[0, 1)`
#[inline]
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Unit chord direction from `a` to `b`, or `fallback` for a zero-length chord
#[inline]
fn chord_direction(
    a: &ControlPoint,
    b: &ControlPoint,
    fallback: Option<Vector2<f64>>,
) -> Option<Vector2<f64>> {
    let chord = Vector2::new(b.x - a.x, b.y - a.y);
    let len = chord.norm();
    if len < MIN_SEGMENT_LENGTH {
        fallback
    } else {
        Some(chord / len)
    }
}

/// Estimate how sharply a section bends from its four control points.
///
/// Returns the larger `|sin|` of the two chord-to-chord direction changes.
/// `0` is straight, `1` is a right angle, and the value falls back toward
/// `0` as a turn approaches a full reversal, so hairpins are not densified.
/// Zero-length chords reuse the previous chord's direction.
pub fn section_curvature(quad: &[ControlPoint; 4]) -> f64 {
    let d1 = chord_direction(&quad[0], &quad[1], None);
    let d2 = chord_direction(&quad[1], &quad[2], d1);
    let d3 = chord_direction(&quad[2], &quad[3], d2);

    let bend = |a: Option<Vector2<f64>>, b: Option<Vector2<f64>>| match (a, b) {
        (Some(a), Some(b)) => a.perp(&b).abs(),
        _ => 0.0,
    };

    bend(d1, d2).max(bend(d2, d3))
}

/// Sample count for one section, scaled up to 3x for sharp sections
#[inline]
fn section_segments(base: usize, curvature: f64, adaptive: bool) -> usize {
    if !adaptive {
        return base;
    }
    let multiplier = (1.0 + curvature * 2.0).min(MAX_DENSITY_MULTIPLIER);
    ((base as f64 * multiplier) as usize).max(1)
}

/// Synthesize a dense closed path through `control_points`.
///
/// `elevation`, when given, must parallel `control_points` and overrides
/// any per-point elevation. Each section contributes `segments_per_section`
/// samples at uniform parameter steps (more when `adaptive_subdivision` is
/// set); the end of one section is the start of the next, so no sample is
/// duplicated and the loop closes on the first control point.
pub fn synthesize(
    control_points: &[ControlPoint],
    elevation: Option<&[f64]>,
    segments_per_section: usize,
    adaptive_subdivision: bool,
) -> Result<Vec<PathSample>> {
    let n = control_points.len();
    if n < 3 {
        return Err(Error::TooFewControlPoints(n));
    }
    if segments_per_section == 0 {
        return Err(Error::InvalidParameter(
            "segments_per_section must be at least 1".to_string(),
        ));
    }
    if let Some(heights) = elevation {
        if heights.len() != n {
            return Err(Error::MismatchedElevations {
                points: n,
                elevations: heights.len(),
            });
        }
    }
    if control_points
        .iter()
        .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.height().is_finite()))
        || elevation.is_some_and(|h| h.iter().any(|z| !z.is_finite()))
    {
        return Err(Error::InvalidParameter(
            "control points must have finite coordinates".to_string(),
        ));
    }

    let height_at = |i: usize| match elevation {
        Some(heights) => heights[i],
        None => control_points[i].height(),
    };

    let multiplier = if adaptive_subdivision {
        MAX_DENSITY_MULTIPLIER as usize
    } else {
        1
    };
    let capacity = require_sample_count(
        "segments_per_section",
        n.checked_mul(segments_per_section)
            .and_then(|c| c.checked_mul(multiplier)),
    )?;
    let mut samples = Vec::with_capacity(capacity);

    for i in 0..n {
        let idx = [-1isize, 0, 1, 2].map(|o| wrap_index(i, o, n));
        let quad = [
            control_points[idx[0]],
            control_points[idx[1]],
            control_points[idx[2]],
            control_points[idx[3]],
        ];
        let h = [height_at(idx[0]), height_at(idx[1]), height_at(idx[2]), height_at(idx[3])];

        let segments = section_segments(
            segments_per_section,
            section_curvature(&quad),
            adaptive_subdivision,
        );

        for j in 0..segments {
            let t = j as f64 / segments as f64;
            samples.push(Point3::new(
                catmull_rom(quad[0].x, quad[1].x, quad[2].x, quad[3].x, t),
                catmull_rom(quad[0].y, quad[1].y, quad[2].y, quad[3].y, t),
                catmull_rom(h[0], h[1], h[2], h[3], t),
            ));
        }
    }

    tracing::debug!(
        control_points = n,
        samples = samples.len(),
        adaptive = adaptive_subdivision,
        "Synthesized closed spline"
    );

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn diamond() -> Vec<ControlPoint> {
        vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(30.0, 20.0),
            ControlPoint::new(50.0, 0.0),
            ControlPoint::new(30.0, -20.0),
        ]
    }

    #[test]
    fn test_too_few_control_points() {
        let pts = vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 0.0)];
        assert_eq!(
            synthesize(&pts, None, 16, true),
            Err(Error::TooFewControlPoints(2))
        );
    }

    #[test]
    fn test_mismatched_elevations() {
        let heights = [0.0, 1.0];
        let err = synthesize(&diamond(), Some(&heights), 16, false).unwrap_err();
        assert_eq!(
            err,
            Error::MismatchedElevations {
                points: 4,
                elevations: 2
            }
        );
    }

    #[test]
    fn test_passes_through_control_points() {
        let samples = synthesize(&diamond(), None, 8, false).unwrap();
        assert_eq!(samples.len(), 32);
        for (k, cp) in diamond().iter().enumerate() {
            let s = samples[k * 8];
            assert_relative_eq!(s.x, cp.x, epsilon = 1e-12);
            assert_relative_eq!(s.y, cp.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_elevation_is_phase_locked() {
        let heights = [0.0, 3.0, 5.0, 2.0];
        let samples = synthesize(&diamond(), Some(&heights), 4, false).unwrap();
        for (k, h) in heights.iter().enumerate() {
            assert_relative_eq!(samples[k * 4].z, *h, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_per_point_elevation_used_without_list() {
        let pts = vec![
            ControlPoint::with_elevation(0.0, 0.0, 1.0),
            ControlPoint::with_elevation(10.0, 0.0, 2.0),
            ControlPoint::new(5.0, 8.0),
        ];
        let samples = synthesize(&pts, None, 2, false).unwrap();
        assert_relative_eq!(samples[0].z, 1.0);
        assert_relative_eq!(samples[2].z, 2.0);
        assert_relative_eq!(samples[4].z, 0.0);
    }

    #[test]
    fn test_adaptive_subdivision_densifies_sharp_sections() {
        let flat = synthesize(&diamond(), None, 16, false).unwrap();
        let adaptive = synthesize(&diamond(), None, 16, true).unwrap();
        assert!(adaptive.len() > flat.len());
        assert!(adaptive.len() <= flat.len() * 3);
    }

    #[test]
    fn test_section_curvature_straight_and_corner() {
        let straight = [
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 0.0),
            ControlPoint::new(2.0, 0.0),
            ControlPoint::new(3.0, 0.0),
        ];
        assert_relative_eq!(section_curvature(&straight), 0.0);

        let corner = [
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 0.0),
            ControlPoint::new(1.0, 1.0),
            ControlPoint::new(1.0, 2.0),
        ];
        assert_relative_eq!(section_curvature(&corner), 1.0);
    }

    #[test]
    fn test_oversized_section_density_rejected() {
        assert!(matches!(
            synthesize(&diamond(), None, usize::MAX / 2, false),
            Err(Error::InvalidParameter(_))
        ));
        // Fits without adaptive subdivision, not with the 3x allowance
        let segments = crate::path::MAX_SAMPLES / 4;
        assert!(synthesize(&diamond(), None, segments, true).is_err());
    }

    #[test]
    fn test_duplicate_control_points_do_not_divide_by_zero() {
        let pts = vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(10.0, 0.0),
            ControlPoint::new(10.0, 0.0),
            ControlPoint::new(5.0, 8.0),
        ];
        let samples = synthesize(&pts, None, 8, true).unwrap();
        assert!(samples.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
