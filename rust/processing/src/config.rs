// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing configuration loaded from environment variables.

use raceway_geometry::ConditioningOptions;

/// Processing configuration.
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Number of worker threads for batch processing.
    pub worker_threads: usize,
    /// Minimum resampled point count per track.
    pub min_points: usize,
    /// Curvature limiting sweep cap.
    pub max_iterations: usize,
    /// Emit triangle indices instead of quad indices.
    pub triangulate: bool,
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ConditioningOptions::default();
        Self {
            worker_threads: var("RACEWAY_WORKER_THREADS")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            min_points: var("RACEWAY_MIN_POINTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_points),
            max_iterations: var("RACEWAY_MAX_ITERATIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_iterations),
            triangulate: var("RACEWAY_TRIANGULATE")
                .map(|v| {
                    matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    )
                })
                .unwrap_or(false),
        }
    }

    /// Conditioning options implied by this configuration
    pub fn conditioning(&self) -> ConditioningOptions {
        ConditioningOptions {
            min_points: self.min_points,
            max_iterations: self.max_iterations,
            ..ConditioningOptions::default()
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
