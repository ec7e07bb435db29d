//! Highest out-degree first, with degrees frozen at load time.
//!
//! Vertices are ranked once by (out-degree descending, index ascending) and
//! a cursor walks the ranking, skipping vertices that have become known.
//! Known vertices never become unknown, so the cursor only moves forward and
//! the whole run costs one sort plus O(V) cursor steps.
//!
//! The ranking ignores which successors are already known: a hub whose
//! successors are all covered still outranks a smaller vertex with unknown
//! successors. The dynamic selector exists to fix exactly that.

use std::cmp::Reverse;

use crate::config::Strategy;
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;
use crate::reachability::ReachabilityEngine;

use super::SeedSelector;

#[derive(Debug, Clone)]
pub struct StaticOutDegree {
    ranking: Vec<VertexId>,
    cursor: usize,
}

impl StaticOutDegree {
    pub fn new(graph: &GraphStore) -> Self {
        let mut ranking: Vec<VertexId> = graph.vertices().collect();
        ranking.sort_by_key(|&v| (Reverse(graph.out_degree(v)), v));
        StaticOutDegree { ranking, cursor: 0 }
    }

    /// The full precomputed ranking.
    pub fn ranking(&self) -> &[VertexId] {
        &self.ranking
    }
}

impl SeedSelector for StaticOutDegree {
    fn strategy(&self) -> Strategy {
        Strategy::StaticOutDegree
    }

    fn observe(&mut self, _engine: &ReachabilityEngine<'_>, _newly_known: &[VertexId]) {}

    fn next(&mut self, engine: &ReachabilityEngine<'_>) -> Result<VertexId, GroundingError> {
        while let Some(&v) = self.ranking.get(self.cursor) {
            if !engine.is_known(v) {
                return Ok(v);
            }
            self.cursor += 1;
        }
        Err(GroundingError::EmptyCandidateSet {
            strategy: Strategy::StaticOutDegree,
        })
    }
}
