//! Error taxonomy shared by every colormap operation.

use thiserror::Error;

/// Result alias for colormap operations.
pub type ColorsResult<T> = Result<T, ColorsError>;

/// Errors raised while generating, reordering, reading, or writing colormaps.
///
/// None of these are recovered from internally: operations validate their
/// inputs up front and return no partial colormap.
#[derive(Debug, Error)]
pub enum ColorsError {
    /// More colors were requested than the candidate pool holds.
    #[error("cannot pick {requested} distinguishable colors from {available} candidates")]
    Capacity {
        /// Number of colors asked for.
        requested: usize,
        /// Size of the candidate pool.
        available: usize,
    },
    /// Two inputs disagree on the number of labels.
    #[error("{what} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        /// Which input carried the wrong length.
        what: &'static str,
        /// Length implied by the colormap.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// The label source file type is not recognized.
    #[error("unsupported label source: {0}")]
    UnsupportedFormat(String),
    /// Invalid configuration or malformed colormap/adjacency input.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ColorsError {
    /// Build a configuration error from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        ColorsError::Config(message.into())
    }

    /// Build a shape mismatch for `what` carrying `actual` entries instead of `expected`.
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        ColorsError::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}
