// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-call track generation
//!
//! Runs the stages in order: path source, resampling, curvature limiting,
//! placement, frames, corridor offsets, then the roadway strip and the two
//! barrier ribbons.

use crate::corridor::{
    barrier_center_offsets, compute_offsets, uniform_offsets, BarrierSide, CorridorOffsets,
};
use crate::curvature::{limit_curvature_with_tolerance, ConditioningReport};
use crate::error::Result;
use crate::frame::{compute_frames, default_window, Frame};
use crate::mesh::Mesh;
use crate::params::{ConditioningOptions, TrackParams};
use crate::path::PathSample;
use crate::presets::PathSource;
use crate::resample::resample;
use crate::ribbon::{build_offset_ribbon, build_strip};
use nalgebra::Vector3;

/// Everything one pipeline run produces
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMeshes {
    /// Roadway slab
    pub surface: Mesh,
    /// Barrier on the left of the travel direction
    pub outer_barrier: Option<Mesh>,
    /// Barrier on the right of the travel direction
    pub inner_barrier: Option<Mesh>,
    /// Conditioned, placed centreline the meshes were swept along
    pub path: Vec<PathSample>,
    /// Curvature limiting diagnostics
    pub report: ConditioningReport,
}

impl TrackMeshes {
    /// Named meshes in output order, skipping absent barriers
    pub fn parts(&self) -> impl Iterator<Item = (&'static str, &Mesh)> {
        std::iter::once(("surface", &self.surface))
            .chain(self.outer_barrier.as_ref().map(|m| ("outer_barrier", m)))
            .chain(self.inner_barrier.as_ref().map(|m| ("inner_barrier", m)))
    }

    /// Total quads across all parts
    pub fn quad_count(&self) -> usize {
        self.parts().map(|(_, m)| m.quad_count()).sum()
    }

    /// All parts merged into a single mesh
    pub fn combined(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for (_, part) in self.parts() {
            mesh.merge(part);
        }
        mesh
    }
}

/// Generate a track with default conditioning options
pub fn generate_track(source: &PathSource, params: &TrackParams) -> Result<TrackMeshes> {
    generate_track_with_options(source, params, &ConditioningOptions::default())
}

/// Generate a track.
///
/// Parameters are validated before any path is computed. Curvature
/// limiting that runs out of iterations still produces meshes; check
/// [`TrackMeshes::report`] for the residual.
pub fn generate_track_with_options(
    source: &PathSource,
    params: &TrackParams,
    options: &ConditioningOptions,
) -> Result<TrackMeshes> {
    params.validate()?;
    options.validate()?;

    let raw = source.to_path(params)?;
    let (mut path, report) = condition_path(raw, params, options)?;

    let shift = Vector3::from(params.location);
    for p in path.iter_mut() {
        *p += shift;
    }

    let frames = compute_frames(&path, default_window(path.len()));
    let offsets = if params.adaptive_width {
        compute_offsets(&path, params.half_width())?
    } else {
        uniform_offsets(path.len(), params.half_width())?
    };

    let surface = build_strip(&path, &frames, &offsets, params.track_thickness)?;
    let (outer_barrier, inner_barrier) = if params.include_barriers {
        (
            Some(build_barrier(&path, &frames, &offsets, BarrierSide::Left, params)?),
            Some(build_barrier(&path, &frames, &offsets, BarrierSide::Right, params)?),
        )
    } else {
        (None, None)
    };

    tracing::debug!(
        source = source.kind(),
        samples = path.len(),
        quads = surface.quad_count(),
        barriers = params.include_barriers,
        "Generated track meshes"
    );

    Ok(TrackMeshes {
        surface,
        outer_barrier,
        inner_barrier,
        path,
        report,
    })
}

/// Resample (when enabled) and relax a raw path for a corridor of
/// `params.track_width`.
pub fn condition_path(
    raw: Vec<PathSample>,
    params: &TrackParams,
    options: &ConditioningOptions,
) -> Result<(Vec<PathSample>, ConditioningReport)> {
    let path = if params.resample {
        resample(
            &raw,
            Some(options.spacing_for(params.track_width)),
            options.min_points,
        )?
    } else {
        raw
    };

    limit_curvature_with_tolerance(
        path,
        params.track_width,
        options.max_iterations,
        options.tolerance,
    )
}

/// Barrier ribbon resting on the roadway top, flush with its adaptive edge
fn build_barrier(
    path: &[PathSample],
    frames: &[Frame],
    offsets: &[CorridorOffsets],
    side: BarrierSide,
    params: &TrackParams,
) -> Result<Mesh> {
    let centers = barrier_center_offsets(offsets, side, params.barrier_width);
    build_offset_ribbon(
        path,
        frames,
        &centers,
        params.barrier_width,
        params.barrier_height,
        params.track_thickness,
    )
}
