// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Track processing service with parallel batch generation.

use crate::config::ProcessingConfig;
use crate::error::{Error, Result};
use crate::types::{
    BatchRequest, BatchResponse, MeshData, Primitive, ProcessingStats, TrackFailure, TrackOutput,
    TrackRequest, TrackStats,
};
use raceway_geometry::track::generate_track_with_options;
use raceway_geometry::ConditioningOptions;
use rayon::prelude::*;
use std::time::Instant;

/// Generate one track and flatten its meshes.
pub fn process_track(
    request: &TrackRequest,
    defaults: &ConditioningOptions,
    primitive: Primitive,
) -> Result<TrackOutput> {
    let _span = tracing::info_span!("track", name = %request.name).entered();
    let start = Instant::now();

    let options = request.conditioning.as_ref().unwrap_or(defaults);
    let track = generate_track_with_options(&request.source, &request.params, options)?;

    let meshes: Vec<MeshData> = track
        .parts()
        .map(|(part, mesh)| MeshData::from_mesh(&request.name, part, mesh, primitive))
        .collect();

    let stats = TrackStats {
        samples: track.path.len(),
        vertices: meshes.iter().map(MeshData::vertex_count).sum(),
        faces: meshes.iter().map(MeshData::face_count).sum(),
        time_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        source = request.source.kind(),
        samples = stats.samples,
        vertices = stats.vertices,
        faces = stats.faces,
        converged = track.report.converged,
        residual_degrees = track.report.max_excess_degrees(),
        time_ms = stats.time_ms,
        "Track generated"
    );

    Ok(TrackOutput {
        name: request.name.clone(),
        meshes,
        path: track.path.iter().map(|p| [p.x, p.y, p.z]).collect(),
        conditioning: track.report,
        stats,
    })
}

/// Runs track requests with a fixed configuration and worker pool.
pub struct TrackProcessor {
    config: ProcessingConfig,
    pool: rayon::ThreadPool,
}

impl TrackProcessor {
    /// Create a processor with its own pool of `config.worker_threads` threads
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("raceway-worker-{}", i))
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    fn primitive(&self) -> Primitive {
        if self.config.triangulate {
            Primitive::Triangles
        } else {
            Primitive::Quads
        }
    }

    /// Process a single request on the calling thread
    pub fn process(&self, request: &TrackRequest) -> Result<TrackOutput> {
        process_track(request, &self.config.conditioning(), self.primitive())
    }

    /// Process independent requests in parallel.
    ///
    /// A rejected request never aborts the batch; it is reported in
    /// [`BatchResponse::failures`]. Outputs keep request order.
    pub fn process_batch(&self, requests: &[TrackRequest]) -> BatchResponse {
        let start = Instant::now();
        let defaults = self.config.conditioning();
        let primitive = self.primitive();

        tracing::info!(
            tracks = requests.len(),
            threads = self.pool.current_num_threads(),
            "Starting batch"
        );

        let results: Vec<Result<TrackOutput>> = self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| process_track(request, &defaults, primitive))
                .collect()
        });

        let mut response = BatchResponse::default();
        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(output) => response.tracks.push(output),
                Err(err) => {
                    tracing::warn!(name = %request.name, error = %err, "Track rejected");
                    response.failures.push(TrackFailure {
                        name: request.name.clone(),
                        code: err.code().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }

        response.stats = ProcessingStats {
            total_tracks: response.tracks.len(),
            failed_tracks: response.failures.len(),
            total_vertices: response.tracks.iter().map(|t| t.stats.vertices).sum(),
            total_faces: response.tracks.iter().map(|t| t.stats.faces).sum(),
            unconverged_tracks: response
                .tracks
                .iter()
                .filter(|t| !t.conditioning.converged)
                .count(),
            total_time_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            tracks = response.stats.total_tracks,
            failed = response.stats.failed_tracks,
            unconverged = response.stats.unconverged_tracks,
            total_time_ms = response.stats.total_time_ms,
            "Batch complete"
        );

        response
    }

    /// Parse a [`TrackRequest`] and return its [`TrackOutput`] as JSON
    pub fn process_json(&self, json: &str) -> Result<String> {
        let request: TrackRequest = serde_json::from_str(json)?;
        let output = self.process(&request)?;
        Ok(serde_json::to_string(&output)?)
    }

    /// Parse a [`BatchRequest`] and return its [`BatchResponse`] as JSON
    pub fn process_batch_json(&self, json: &str) -> Result<String> {
        let batch: BatchRequest = serde_json::from_str(json)?;
        let response = self.process_batch(&batch.tracks);
        serde_json::to_string(&response).map_err(Error::from)
    }
}
