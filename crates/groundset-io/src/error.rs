//! Error types for groundset-io.

use groundset_core::GroundingError;
use thiserror::Error;

/// Errors produced while reading graphs and writing reports.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The file parsed but described an invalid graph.
    #[error(transparent)]
    Graph(#[from] GroundingError),

    /// The file parsed but its content is unusable.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl IoError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        IoError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for failures of the underlying file or JSON layer, as opposed to
    /// content that parsed but is wrong.
    pub fn is_io(&self) -> bool {
        matches!(self, IoError::Io(_) | IoError::Serialization(_))
    }
}
