//! Highest live unknown-successor count first.
//!
//! Every vertex carries a count of out-edges whose target is still unknown,
//! initialised to its out-degree. When a vertex `v` becomes known, each
//! predecessor `p` (one per incoming edge of `v`) loses one unknown
//! successor. The candidates sit in a max-heap keyed by
//! `(count, Reverse(index))`; a decrement pushes a fresh entry instead of
//! fixing the old one in place, and entries whose vertex is known or whose
//! count no longer matches the live count are discarded when they reach the
//! top. Counts only decrease, so the live entry for a vertex is always the
//! one with the smallest count and each edge causes at most one push.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::config::Strategy;
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;
use crate::reachability::ReachabilityEngine;

use super::SeedSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    count: u32,
    vertex: VertexId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest count wins; among equal counts the lowest index wins.
        (self.count, Reverse(self.vertex)).cmp(&(other.count, Reverse(other.vertex)))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub struct DynamicUnknownSuccessor {
    unknown_successors: Vec<u32>,
    heap: BinaryHeap<Candidate>,
}

impl DynamicUnknownSuccessor {
    pub fn new(graph: &GraphStore) -> Self {
        let unknown_successors: Vec<u32> = graph
            .vertices()
            .map(|v| graph.out_degree(v) as u32)
            .collect();
        let heap = unknown_successors
            .iter()
            .enumerate()
            .map(|(i, &count)| Candidate {
                count,
                vertex: VertexId(i as u32),
            })
            .collect();

        DynamicUnknownSuccessor {
            unknown_successors,
            heap,
        }
    }

    /// Current number of unknown successors of `v`.
    pub fn unknown_successor_count(&self, v: VertexId) -> usize {
        self.unknown_successors[v.index()] as usize
    }

    /// Heap entries, live and stale.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }
}

impl SeedSelector for DynamicUnknownSuccessor {
    fn strategy(&self) -> Strategy {
        Strategy::DynamicUnknownSuccessor
    }

    fn observe(&mut self, engine: &ReachabilityEngine<'_>, newly_known: &[VertexId]) {
        let graph = engine.graph();
        for &v in newly_known {
            for p in graph.in_neighbors(v) {
                let count = &mut self.unknown_successors[p.index()];
                *count = count.saturating_sub(1);
                if !engine.is_known(p) {
                    self.heap.push(Candidate {
                        count: *count,
                        vertex: p,
                    });
                }
            }
        }
    }

    fn next(&mut self, engine: &ReachabilityEngine<'_>) -> Result<VertexId, GroundingError> {
        while let Some(&top) = self.heap.peek() {
            let live = self.unknown_successors[top.vertex.index()];
            if engine.is_known(top.vertex) || top.count != live {
                self.heap.pop();
                continue;
            }
            return Ok(top.vertex);
        }
        Err(GroundingError::EmptyCandidateSet {
            strategy: Strategy::DynamicUnknownSuccessor,
        })
    }
}
