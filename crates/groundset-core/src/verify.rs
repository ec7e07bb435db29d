//! Checking a candidate grounding set.

use serde::{Deserialize, Serialize};

use crate::config::{ClosureRule, WorklistOrder};
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;
use crate::reachability::ReachabilityEngine;

/// Result of closing a candidate set over the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True when the closure covers every vertex.
    pub valid: bool,
    pub known_count: usize,
    pub vertex_count: usize,
    /// Vertices outside the closure, ascending.
    pub missing: Vec<VertexId>,
}

/// Closes `candidate` under `rule` with a fresh engine and reports which
/// vertices stay unknown. Duplicate candidates are ignored.
pub fn verify_grounding_set(
    graph: &GraphStore,
    candidate: &[VertexId],
    rule: ClosureRule,
) -> Result<VerificationReport, GroundingError> {
    for &v in candidate {
        graph.check_vertex(v)?;
    }

    let mut engine = ReachabilityEngine::with_options(graph, rule, WorklistOrder::Fifo);
    for &v in candidate {
        engine.insert(v)?;
    }

    Ok(VerificationReport {
        valid: engine.is_complete(),
        known_count: engine.known_count(),
        vertex_count: graph.vertex_count(),
        missing: engine.unknown_vertices().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_candidate_is_valid() {
        let graph = GraphStore::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let report =
            verify_grounding_set(&graph, &[VertexId(0)], ClosureRule::AnyPredecessor).unwrap();
        assert!(report.valid);
        assert_eq!(report.known_count, 3);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn incomplete_candidate_lists_missing_vertices() {
        let graph = GraphStore::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        let report = verify_grounding_set(
            &graph,
            &[VertexId(0), VertexId(0)],
            ClosureRule::AnyPredecessor,
        )
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.known_count, 2);
        assert_eq!(report.missing, vec![VertexId(2), VertexId(3)]);
    }

    #[test]
    fn rule_changes_the_verdict() {
        // 0 -> 2, 1 -> 2
        let graph = GraphStore::from_edges(3, &[(0, 2), (1, 2)]).unwrap();
        let candidate = [VertexId(0)];

        let any = verify_grounding_set(&graph, &candidate, ClosureRule::AnyPredecessor).unwrap();
        assert_eq!(any.missing, vec![VertexId(1)]);

        let all = verify_grounding_set(&graph, &candidate, ClosureRule::AllPredecessors).unwrap();
        assert_eq!(all.missing, vec![VertexId(1), VertexId(2)]);
    }

    #[test]
    fn out_of_range_candidate_is_an_error() {
        let graph = GraphStore::from_edges(2, &[]).unwrap();
        let err = verify_grounding_set(&graph, &[VertexId(0), VertexId(5)], ClosureRule::default())
            .unwrap_err();
        assert_eq!(
            err,
            GroundingError::VertexOutOfRange {
                vertex: VertexId(5),
                vertex_count: 2
            }
        );
    }
}
