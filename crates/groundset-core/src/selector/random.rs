//! Uniform random selection among unknown vertices.
//!
//! The unknown vertices live in a dense pool with a position table, so a
//! vertex that becomes known is swap-removed in O(1) and a draw is a single
//! `gen_range` over the pool. Reproducible through `ChaCha8Rng`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Strategy;
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;
use crate::reachability::ReachabilityEngine;

use super::SeedSelector;

const NOT_IN_POOL: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub struct RandomUnknown {
    rng: ChaCha8Rng,
    pool: Vec<VertexId>,
    position: Vec<u32>,
}

impl RandomUnknown {
    pub fn new(graph: &GraphStore, random_seed: u64) -> Self {
        Self::with_stream(graph, random_seed, 0)
    }

    /// Selector on stream `stream` of the ChaCha generator seeded with
    /// `random_seed`. Stream 0 is the generator's default stream.
    pub fn with_stream(graph: &GraphStore, random_seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(random_seed);
        rng.set_stream(stream);

        let pool: Vec<VertexId> = graph.vertices().collect();
        let position = (0..pool.len() as u32).collect();

        RandomUnknown {
            rng,
            pool,
            position,
        }
    }

    /// Unknown vertices still in the pool.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    fn remove(&mut self, v: VertexId) {
        let pos = self.position[v.index()];
        if pos == NOT_IN_POOL {
            return;
        }
        let pos = pos as usize;
        self.pool.swap_remove(pos);
        if let Some(&moved) = self.pool.get(pos) {
            self.position[moved.index()] = pos as u32;
        }
        self.position[v.index()] = NOT_IN_POOL;
    }
}

impl SeedSelector for RandomUnknown {
    fn strategy(&self) -> Strategy {
        Strategy::Random
    }

    fn observe(&mut self, _engine: &ReachabilityEngine<'_>, newly_known: &[VertexId]) {
        for &v in newly_known {
            self.remove(v);
        }
    }

    fn next(&mut self, engine: &ReachabilityEngine<'_>) -> Result<VertexId, GroundingError> {
        while !self.pool.is_empty() {
            let v = self.pool[self.rng.gen_range(0..self.pool.len())];
            if !engine.is_known(v) {
                return Ok(v);
            }
            // Known without being observed; drop it and draw again.
            self.remove(v);
        }
        Err(GroundingError::EmptyCandidateSet {
            strategy: Strategy::Random,
        })
    }
}
