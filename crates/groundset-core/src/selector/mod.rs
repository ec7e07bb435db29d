//! Seed-selection strategies.
//!
//! A [`SeedSelector`] proposes the next unknown vertex to add to the seed
//! set. The orchestrator reports every batch of newly-known vertices through
//! [`SeedSelector::observe`] so selectors with live state can update
//! incrementally instead of rescanning the graph.
//!
//! Each selector owns its mutable state (candidate pool, cursor, priority
//! heap). Nothing is shared between runs except the read-only graph, so
//! independent trials can run side by side.
//!
//! - [`RandomUnknown`]: uniform over the unknown vertices.
//! - [`StaticOutDegree`]: highest out-degree as loaded, lowest index on ties.
//! - [`DynamicUnknownSuccessor`]: highest live count of unknown successors,
//!   lowest index on ties.

pub mod dynamic;
pub mod random;
pub mod static_degree;

pub use dynamic::DynamicUnknownSuccessor;
pub use random::RandomUnknown;
pub use static_degree::StaticOutDegree;

use crate::config::Strategy;
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;
use crate::reachability::ReachabilityEngine;

/// Strategy interface used by the orchestrator.
pub trait SeedSelector {
    /// Which strategy this selector implements.
    fn strategy(&self) -> Strategy;

    /// Called after every insertion with the vertices that just became known.
    fn observe(&mut self, engine: &ReachabilityEngine<'_>, newly_known: &[VertexId]);

    /// Returns an unknown vertex to seed next without committing to it.
    ///
    /// Fails with `EmptyCandidateSet` when every vertex is already known.
    fn next(&mut self, engine: &ReachabilityEngine<'_>) -> Result<VertexId, GroundingError>;
}

/// Builds the selector for `strategy`.
///
/// `random_seed` and `stream` only matter for [`Strategy::Random`]; distinct
/// streams of the same seed give independent sequences.
pub fn build_selector(
    strategy: Strategy,
    graph: &GraphStore,
    random_seed: u64,
    stream: u64,
) -> Box<dyn SeedSelector> {
    match strategy {
        Strategy::Random => Box::new(RandomUnknown::with_stream(graph, random_seed, stream)),
        Strategy::StaticOutDegree => Box::new(StaticOutDegree::new(graph)),
        Strategy::DynamicUnknownSuccessor => Box::new(DynamicUnknownSuccessor::new(graph)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_selector_matches_strategy() {
        let graph = GraphStore::from_edges(3, &[(0, 1)]).unwrap();
        for strategy in [
            Strategy::Random,
            Strategy::StaticOutDegree,
            Strategy::DynamicUnknownSuccessor,
        ] {
            let selector = build_selector(strategy, &graph, 7, 0);
            assert_eq!(selector.strategy(), strategy);
        }
    }

    #[test]
    fn every_selector_fails_loudly_when_nothing_is_unknown() {
        let graph = GraphStore::from_edges(2, &[(0, 1)]).unwrap();
        for strategy in [
            Strategy::Random,
            Strategy::StaticOutDegree,
            Strategy::DynamicUnknownSuccessor,
        ] {
            let mut engine = ReachabilityEngine::new(&graph);
            let mut selector = build_selector(strategy, &graph, 7, 0);
            let newly = engine.insert(VertexId(0)).unwrap();
            selector.observe(&engine, &newly);
            assert!(engine.is_complete());

            assert_eq!(
                selector.next(&engine),
                Err(GroundingError::EmptyCandidateSet { strategy })
            );
        }
    }

    #[test]
    fn selectors_only_propose_unknown_vertices() {
        // 0 -> 1 -> 2, 3 -> 4
        let graph = GraphStore::from_edges(5, &[(0, 1), (1, 2), (3, 4)]).unwrap();
        for strategy in [
            Strategy::Random,
            Strategy::StaticOutDegree,
            Strategy::DynamicUnknownSuccessor,
        ] {
            let mut engine = ReachabilityEngine::new(&graph);
            let mut selector = build_selector(strategy, &graph, 11, 0);
            let newly = engine.insert(VertexId(0)).unwrap();
            selector.observe(&engine, &newly);

            let next = selector.next(&engine).unwrap();
            assert!(!engine.is_known(next), "{strategy} proposed known vertex {next}");
        }
    }
}
