// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for track processing.

use thiserror::Error;

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Processing error types.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] raceway_geometry::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Stable machine-readable code for failure reports
    pub fn code(&self) -> &'static str {
        use raceway_geometry::Error as GeometryError;

        match self {
            Error::Geometry(GeometryError::TooFewControlPoints(_)) => "TOO_FEW_CONTROL_POINTS",
            Error::Geometry(GeometryError::MismatchedElevations { .. }) => "MISMATCHED_ELEVATIONS",
            Error::Geometry(GeometryError::InvalidParameter(_)) => "INVALID_PARAMETER",
            Error::Geometry(GeometryError::DegeneratePath(_)) => "DEGENERATE_PATH",
            Error::Geometry(GeometryError::MismatchedLengths(_)) => "INTERNAL_ERROR",
            Error::Json(_) => "INVALID_JSON",
            Error::ThreadPool(_) => "THREAD_POOL_ERROR",
        }
    }
}
