// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curvature measurement and curvature limiting
//!
//! A ribbon of fixed width swept through a turn sharper than its own
//! radius folds its inner edge over itself. [`limit_curvature`] relaxes
//! every sample whose turn angle exceeds the safe angle for its local
//! segment length, and reports whatever excess remains when the iteration
//! cap is reached.

use crate::error::{Error, Result};
use crate::path::{next_index, planar_delta, prev_index, wrap_index, PathSample, MIN_SEGMENT_LENGTH};
use nalgebra::Point3;
use std::f64::consts::PI;

/// Safe turn angle for segments at least as long as the corridor is wide (72 degrees)
pub const MAX_SAFE_TURN: f64 = PI * 0.4;

/// Safe turn angle assigned to zero-length segments
const DEGENERATE_SAFE_TURN: f64 = 0.1;

/// Margin applied to the geometric no-crossing bound
const SAFETY_FACTOR: f64 = 0.8;

/// Largest fraction of the way to the neighbour midpoint a sample moves per sweep
const MAX_PULL: f64 = 0.3;

/// Residual excess (radians, about 0.5 degrees) accepted as converged
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Triangles with less area than this are treated as collinear
const MIN_TRIANGLE_AREA: f64 = 0.0001;

/// Dead band on the raw cross product when classifying turn direction
const STRAIGHT_EPSILON: f64 = 0.001;

/// Half-window for the conservative radius smoothing
pub const RADIUS_SMOOTHING_WINDOW: usize = 2;

/// Turn geometry at one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnMeasure {
    /// Unsigned angle between incoming and outgoing directions, `0..=PI`
    pub angle: f64,
    /// Mean of the incoming and outgoing planar segment lengths
    pub segment_length: f64,
    /// Cross product of the unit directions; positive turns left
    pub cross: f64,
}

impl TurnMeasure {
    const STRAIGHT: Self = Self {
        angle: 0.0,
        segment_length: 0.0,
        cross: 0.0,
    };
}

/// Measure the planar turn at sample `i`
pub fn turn_at(samples: &[PathSample], i: usize) -> TurnMeasure {
    let n = samples.len();
    let incoming = planar_delta(&samples[prev_index(i, n)], &samples[i]);
    let outgoing = planar_delta(&samples[i], &samples[next_index(i, n)]);
    let (len_in, len_out) = (incoming.norm(), outgoing.norm());

    if len_in < MIN_SEGMENT_LENGTH || len_out < MIN_SEGMENT_LENGTH {
        return TurnMeasure::STRAIGHT;
    }

    let d_in = incoming / len_in;
    let d_out = outgoing / len_out;

    TurnMeasure {
        angle: d_in.dot(&d_out).clamp(-1.0, 1.0).acos(),
        segment_length: (len_in + len_out) / 2.0,
        cross: d_in.perp(&d_out),
    }
}

/// Largest turn angle a segment of `segment_length` can take without the
/// inner edge of a `corridor_width` ribbon crossing itself.
///
/// The inner edge advances roughly `d - w * sin(theta / 2) * 2` per
/// segment, so turns must stay below `2 * asin(d / w)`; a 0.8 margin is
/// applied and long segments are capped at [`MAX_SAFE_TURN`].
pub fn safe_turn_angle(segment_length: f64, corridor_width: f64) -> f64 {
    if segment_length < MIN_SEGMENT_LENGTH {
        return DEGENERATE_SAFE_TURN;
    }
    let ratio = segment_length / corridor_width;
    if ratio >= 1.0 {
        MAX_SAFE_TURN
    } else {
        2.0 * (ratio * SAFETY_FACTOR).clamp(0.05, 0.99).asin()
    }
}

/// Amount by which sample `i` exceeds its safe turn angle (0 when safe)
#[inline]
pub fn excess_at(samples: &[PathSample], i: usize, corridor_width: f64) -> f64 {
    let turn = turn_at(samples, i);
    (turn.angle - safe_turn_angle(turn.segment_length, corridor_width)).max(0.0)
}

/// Worst excess turn angle over the whole loop, in radians
pub fn max_excess_angle(samples: &[PathSample], corridor_width: f64) -> f64 {
    (0..samples.len())
        .map(|i| excess_at(samples, i, corridor_width))
        .fold(0.0, f64::max)
}

/// Outcome of curvature limiting
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditioningReport {
    /// Worst remaining excess over the safe turn angle, in radians, measured
    /// on the returned path
    pub max_excess_angle: f64,
    /// Relaxation sweeps performed
    pub iterations: usize,
    /// Whether a sweep finished under tolerance before the iteration cap
    pub converged: bool,
}

impl ConditioningReport {
    /// Residual excess in degrees
    #[inline]
    pub fn max_excess_degrees(&self) -> f64 {
        self.max_excess_angle.to_degrees()
    }
}

/// Relax turns the corridor cannot follow.
///
/// Each sweep visits every sample in order; a sample whose turn angle
/// exceeds its safe angle is pulled toward the midpoint of its two
/// neighbours by `min(0.3, excess / PI)` of the distance (elevation
/// included). Later samples in the same sweep see the moved positions.
/// Sweeps stop once the worst excess seen in a sweep is below
/// [`DEFAULT_TOLERANCE`] or after `max_iterations`. Running out of
/// iterations is not an error: the best-effort path is returned and the
/// residual is reported.
pub fn limit_curvature(
    samples: Vec<PathSample>,
    corridor_width: f64,
    max_iterations: usize,
) -> Result<(Vec<PathSample>, ConditioningReport)> {
    limit_curvature_with_tolerance(samples, corridor_width, max_iterations, DEFAULT_TOLERANCE)
}

/// [`limit_curvature`] with an explicit convergence tolerance in radians
pub fn limit_curvature_with_tolerance(
    mut samples: Vec<PathSample>,
    corridor_width: f64,
    max_iterations: usize,
    tolerance: f64,
) -> Result<(Vec<PathSample>, ConditioningReport)> {
    Error::require_positive("corridor_width", corridor_width)?;
    Error::require_positive("tolerance", tolerance)?;

    let n = samples.len();
    if n < 4 {
        let residual = if n < 3 { 0.0 } else { max_excess_angle(&samples, corridor_width) };
        return Ok((
            samples,
            ConditioningReport {
                max_excess_angle: residual,
                iterations: 0,
                converged: residual < tolerance,
            },
        ));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        iterations += 1;
        let mut sweep_excess = 0.0f64;

        for i in 0..n {
            let excess = excess_at(&samples, i, corridor_width);
            if excess <= 0.0 {
                continue;
            }
            sweep_excess = sweep_excess.max(excess);

            let prev = samples[prev_index(i, n)];
            let next = samples[next_index(i, n)];
            let midpoint = Point3::from((prev.coords + next.coords) / 2.0);
            let pull = (excess / PI).min(MAX_PULL);
            let shift = (midpoint - samples[i]) * pull;
            samples[i] += shift;
        }

        if sweep_excess < tolerance {
            converged = true;
            break;
        }
    }

    let report = ConditioningReport {
        max_excess_angle: max_excess_angle(&samples, corridor_width),
        iterations,
        converged,
    };

    if converged {
        tracing::debug!(iterations, samples = n, "Curvature limiting converged");
    } else {
        tracing::warn!(
            iterations,
            residual_degrees = report.max_excess_degrees(),
            "Curvature limiting hit its iteration cap; using best-effort path"
        );
    }

    Ok((samples, report))
}

/// Left, right or straight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
    Straight,
}

impl TurnDirection {
    /// Classify a raw incoming/outgoing cross product
    #[inline]
    pub fn from_cross(cross: f64) -> Self {
        if cross > STRAIGHT_EPSILON {
            Self::Left
        } else if cross < -STRAIGHT_EPSILON {
            Self::Right
        } else {
            Self::Straight
        }
    }
}

/// Per-sample curvature estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureEstimate {
    /// Raw (unnormalized) cross product of the incoming and outgoing
    /// segments; its sign gives the turn direction
    pub turn: f64,
    /// Conservative local curvature radius, `f64::INFINITY` when straight
    pub radius: f64,
}

impl CurvatureEstimate {
    #[inline]
    pub fn direction(&self) -> TurnDirection {
        TurnDirection::from_cross(self.turn)
    }
}

/// Circumradius of the planar triangle `a, b, c` via `R = abc / (4 * Area)`
/// with Heron's area. Collinear or near-degenerate triples give infinity.
pub fn circumradius(a: &PathSample, b: &PathSample, c: &PathSample) -> f64 {
    let ab = planar_delta(a, b).norm();
    let bc = planar_delta(b, c).norm();
    let ca = planar_delta(c, a).norm();

    let s = (ab + bc + ca) / 2.0;
    let area_sq = s * (s - ab) * (s - bc) * (s - ca);
    if area_sq <= 0.0 {
        return f64::INFINITY;
    }

    let area = area_sq.sqrt();
    if area < MIN_TRIANGLE_AREA {
        return f64::INFINITY;
    }

    (ab * bc * ca) / (4.0 * area)
}

/// Raw circumradius at every sample, using its two circular neighbours
pub fn raw_curvature_radii(samples: &[PathSample]) -> Vec<f64> {
    let n = samples.len();
    (0..n)
        .map(|i| circumradius(&samples[prev_index(i, n)], &samples[i], &samples[next_index(i, n)]))
        .collect()
}

/// Curvature radius at every sample, smoothed by taking the minimum over
/// `window` neighbours on each side so a single tight sample is never
/// overridden by looser neighbours.
pub fn curvature_radii(samples: &[PathSample], window: usize) -> Vec<f64> {
    let raw = raw_curvature_radii(samples);
    let n = raw.len();
    let w = window as isize;
    (0..n)
        .map(|i| {
            (-w..=w)
                .map(|o| raw[wrap_index(i, o, n)])
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

/// Raw cross product of incoming and outgoing segments at every sample
pub fn turn_directions(samples: &[PathSample]) -> Vec<f64> {
    let n = samples.len();
    (0..n)
        .map(|i| {
            let incoming = planar_delta(&samples[prev_index(i, n)], &samples[i]);
            let outgoing = planar_delta(&samples[i], &samples[next_index(i, n)]);
            incoming.perp(&outgoing)
        })
        .collect()
}

/// Turn direction and smoothed curvature radius for every sample
pub fn estimate_curvature(samples: &[PathSample]) -> Vec<CurvatureEstimate> {
    let radii = curvature_radii(samples, RADIUS_SMOOTHING_WINDOW);
    turn_directions(samples)
        .into_iter()
        .zip(radii)
        .map(|(turn, radius)| CurvatureEstimate { turn, radius })
        .collect()
}
