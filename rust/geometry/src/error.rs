use thiserror::Error;

/// Result type for track geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during track generation.
///
/// Only configuration problems are reported here. Numerical degeneracies
/// (zero-length segments, collinear triples) are absorbed by the stage that
/// meets them, and curvature relaxation that runs out of iterations is
/// reported through [`crate::ConditioningReport`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("A closed track needs at least 3 control points, got {0}")]
    TooFewControlPoints(usize),

    #[error("Elevation list has {elevations} entries but there are {points} control points")]
    MismatchedElevations { points: usize, elevations: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Degenerate path: {0}")]
    DegeneratePath(String),

    #[error("Mismatched stage lengths: {0}")]
    MismatchedLengths(String),
}

impl Error {
    /// Reject a dimension that must be a positive, finite number
    pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "{} must be positive and finite, got {}",
                name, value
            )))
        }
    }
}
