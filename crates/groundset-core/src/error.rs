//! Error types for groundset-core.
//!
//! Uses `thiserror` for structured, matchable variants. Every failure in the
//! core is deterministic given its input: malformed graphs are rejected at
//! load time and selector misuse is reported as a contract violation. Nothing
//! here is retryable.

use thiserror::Error;

use crate::config::Strategy;
use crate::id::VertexId;

/// Errors produced by the grounding engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroundingError {
    /// The graph description itself is malformed (e.g. too many vertices to
    /// index with `u32`).
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },

    /// An edge endpoint lies outside `0..vertex_count`.
    #[error("invalid graph: edge {from} -> {to} references a vertex outside 0..{vertex_count}")]
    EdgeOutOfRange {
        from: usize,
        to: usize,
        vertex_count: usize,
    },

    /// A vertex handed to the engine (seed, verification candidate) does not
    /// exist in the graph.
    #[error("vertex {vertex} is outside 0..{vertex_count}")]
    VertexOutOfRange { vertex: VertexId, vertex_count: usize },

    /// A selector was asked for a candidate although every vertex is already
    /// known. The orchestrator checks convergence first, so this indicates a
    /// caller bug.
    #[error("{strategy} selector invoked with no unknown vertices remaining")]
    EmptyCandidateSet { strategy: Strategy },
}

impl GroundingError {
    /// Returns true for the load-time graph validation failures.
    pub fn is_invalid_graph(&self) -> bool {
        matches!(
            self,
            GroundingError::InvalidGraph { .. } | GroundingError::EdgeOutOfRange { .. }
        )
    }
}
