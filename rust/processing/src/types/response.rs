// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types.

use super::MeshData;
use raceway_geometry::ConditioningReport;
use serde::{Deserialize, Serialize};

/// Generated geometry for one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackOutput {
    /// Name from the request.
    pub name: String,
    /// Surface first, then any barriers.
    pub meshes: Vec<MeshData>,
    /// Conditioned centreline, `[x, y, z]` per sample.
    pub path: Vec<[f64; 3]>,
    /// Curvature limiting diagnostics.
    pub conditioning: ConditioningReport,
    /// Per-track statistics.
    pub stats: TrackStats,
}

/// Per-track statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackStats {
    /// Conditioned path samples.
    pub samples: usize,
    /// Vertices across all parts.
    pub vertices: usize,
    /// Faces across all parts, in the output primitive.
    pub faces: usize,
    /// Wall time for this track (ms).
    pub time_ms: u64,
}

/// A batch entry that could not be generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackFailure {
    /// Name from the request.
    pub name: String,
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub error: String,
}

/// Batch processing statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Tracks generated.
    pub total_tracks: usize,
    /// Tracks rejected.
    pub failed_tracks: usize,
    /// Total number of vertices.
    pub total_vertices: usize,
    /// Total number of faces.
    pub total_faces: usize,
    /// Tracks whose curvature limiting hit its iteration cap.
    pub unconverged_tracks: usize,
    /// Total processing time (ms).
    pub total_time_ms: u64,
}

/// Batch results in request order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResponse {
    pub tracks: Vec<TrackOutput>,
    pub failures: Vec<TrackFailure>,
    pub stats: ProcessingStats,
}
