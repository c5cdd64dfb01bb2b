// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uniform arc-length resampling of a closed path
//!
//! Spline sampling at uniform parameter steps bunches points up in tight
//! curves and spreads them out on straights. The relaxation and offset
//! stages assume comparable segment lengths, so the loop is redistributed
//! at an (almost) constant spacing first.

use crate::error::{Error, Result};
use crate::path::{
    ensure_loop, next_index, require_sample_count, segment_lengths, PathSample, MIN_SAMPLES,
    MIN_SEGMENT_LENGTH,
};

/// Spacing used when neither a target spacing nor a corridor width is known
const FALLBACK_SPACING: f64 = 2.0;

/// Number of samples to emit for a loop of `total` length
fn target_count(
    total: f64,
    input_len: usize,
    target_spacing: Option<f64>,
    min_points: usize,
) -> usize {
    let by_length = match target_spacing {
        Some(spacing) => (total / spacing) as usize,
        None => ((total / FALLBACK_SPACING) as usize).max(input_len),
    };
    by_length.max(min_points).max(MIN_SAMPLES)
}

/// Resample a closed path to near-uniform arc-length spacing.
///
/// Walks the loop (including the wrap segment) and emits a sample each time
/// the travelled distance crosses a multiple of the actual spacing
/// `total / count`, interpolating position and elevation linearly. The
/// first output sample coincides with the first input sample. Segments
/// shorter than [`MIN_SEGMENT_LENGTH`] are stepped over.
pub fn resample(
    samples: &[PathSample],
    target_spacing: Option<f64>,
    min_points: usize,
) -> Result<Vec<PathSample>> {
    ensure_loop(samples)?;
    if let Some(spacing) = target_spacing {
        Error::require_positive("target_spacing", spacing)?;
    }

    let n = samples.len();
    let lengths = segment_lengths(samples);
    let total: f64 = lengths.iter().sum();
    if total < MIN_SEGMENT_LENGTH {
        return Err(Error::DegeneratePath(format!(
            "closed path has near-zero length ({:.6})",
            total
        )));
    }

    let count = require_sample_count(
        "resampled path",
        Some(target_count(total, n, target_spacing, min_points)),
    )?;
    let spacing = total / count as f64;

    let mut resampled = Vec::with_capacity(count);
    let mut segment = 0usize;
    let mut progress = 0.0f64;
    // Bounds the walk to one lap plus slack for rounding
    let mut walked = 0usize;

    for _ in 0..count {
        while (lengths[segment] < MIN_SEGMENT_LENGTH || progress >= lengths[segment])
            && walked < 2 * n
        {
            progress = (progress - lengths[segment]).max(0.0);
            segment = next_index(segment, n);
            walked += 1;
        }

        let len = lengths[segment];
        let t = if len >= MIN_SEGMENT_LENGTH {
            (progress / len).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let a = samples[segment];
        let b = samples[next_index(segment, n)];
        resampled.push(a + (b - a) * t);

        progress += spacing;
    }

    tracing::debug!(
        input = n,
        output = resampled.len(),
        total_length = total,
        spacing,
        "Resampled path"
    );

    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::loop_length;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::PI;

    fn polygon(radius: f64, segments: usize) -> Vec<PathSample> {
        (0..segments)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / segments as f64;
                Point3::new(radius * a.cos(), radius * a.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn test_min_points_respected() {
        let out = resample(&polygon(10.0, 64), Some(2.0), 100).unwrap();
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn test_spacing_drives_count_when_larger() {
        let square = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(100.0, 0.0, 0.0),
            Point3::new(100.0, 100.0, 0.0),
            Point3::new(0.0, 100.0, 0.0),
        ];
        let out = resample(&square, Some(1.0), 10).unwrap();
        assert_eq!(out.len(), 400);
        assert_relative_eq!(out[1].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(out[150].x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(out[150].y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_uniform_spacing_on_uneven_input() {
        // Dense cluster on one side, sparse on the other
        let mut input = Vec::new();
        for i in 0..50 {
            input.push(Point3::new(i as f64 * 0.1, 0.0, 0.0));
        }
        input.push(Point3::new(20.0, 0.0, 0.0));
        input.push(Point3::new(20.0, 10.0, 0.0));
        input.push(Point3::new(0.0, 10.0, 0.0));

        let out = resample(&input, Some(0.5), 10).unwrap();
        let expected = loop_length(&input) / out.len() as f64;
        for i in 0..out.len() {
            let d = (out[(i + 1) % out.len()] - out[i]).norm();
            assert!(d <= expected + 1e-9);
            assert!(d > expected * 0.7, "spacing collapsed at {}: {}", i, d);
        }
    }

    #[test]
    fn test_elevation_is_interpolated() {
        let input = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 10.0),
            Point3::new(10.0, 10.0, 10.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        let out = resample(&input, Some(1.0), 3).unwrap();
        let total = loop_length(&input);
        let spacing = total / out.len() as f64;
        // Sample 1 lies on the first (sloped) segment
        let along = spacing / (10.0f64 * 2.0f64.sqrt());
        assert_relative_eq!(out[1].z, 10.0 * along, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_samples_are_stepped_over() {
        let input = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        let out = resample(&input, Some(1.0), 3).unwrap();
        assert_eq!(out.len(), 40);
        for i in 0..out.len() {
            let d = (out[(i + 1) % out.len()] - out[i]).norm();
            assert!(d > 0.5);
        }
    }

    #[test]
    fn test_tiny_spacing_rejected() {
        assert!(matches!(
            resample(&polygon(10.0, 64), Some(1e-9), 100),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            resample(&polygon(10.0, 64), None, usize::MAX),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_length_loop_rejected() {
        let input = vec![Point3::new(1.0, 1.0, 0.0); 5];
        assert!(matches!(
            resample(&input, None, 100),
            Err(Error::DegeneratePath(_))
        ));
    }
}
