//! The grounding loop.
//!
//! [`GroundingRun`] is the only owner and mutator of the seed set S. It
//! primes the [`ReachabilityEngine`] with the initial seeds, then alternates
//! between asking the selector for an unknown vertex and propagating it,
//! until every vertex is known.
//!
//! The run is an explicit state machine:
//! `Initializing -> (Selecting <-> Propagating)* -> Converged`.
//! [`GroundingRun::step`] performs exactly one transition, so a caller can
//! stop between any two steps and inspect the partial seed set.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ClosureRule, GroundingConfig, InitialGrounding, Strategy, WorklistOrder};
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;
use crate::mandatory::MandatorySet;
use crate::reachability::ReachabilityEngine;
use crate::selector::{build_selector, SeedSelector};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Seed set not yet primed.
    Initializing,
    /// Waiting for the selector to propose the next seed.
    Selecting,
    /// A seed was chosen and must be propagated.
    Propagating,
    /// K == V; the seed set is the grounding set.
    Converged,
}

/// Result of a run, reported at convergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingOutcome {
    pub vertex_count: usize,
    pub initial_grounding: InitialGrounding,
    pub strategy: Strategy,
    pub closure: ClosureRule,
    pub worklist: WorklistOrder,
    /// PRNG seed; only affects [`Strategy::Random`].
    pub random_seed: u64,
    /// |B|.
    pub mandatory_size: usize,
    /// |S|.
    pub grounding_set_size: usize,
    /// S in ascending order.
    pub grounding_set: Vec<VertexId>,
    /// S \ B in ascending order.
    pub extra_grounding_set: Vec<VertexId>,
    /// Seeds added by the selector (excludes the initial seeds).
    pub selection_steps: usize,
    /// Worklist pops across the run.
    pub drain_steps: u64,
    /// Edge traversals across the run; at most the edge count.
    pub edges_examined: u64,
}

/// One grounding run over a borrowed graph.
pub struct GroundingRun<'g> {
    mandatory: &'g MandatorySet,
    initial_grounding: InitialGrounding,
    random_seed: u64,
    engine: ReachabilityEngine<'g>,
    selector: Box<dyn SeedSelector + 'g>,
    seeds: Vec<VertexId>,
    pending: Option<VertexId>,
    state: RunState,
    selection_steps: usize,
}

impl<'g> GroundingRun<'g> {
    /// Creates a run in the `Initializing` state using the selector named by
    /// `config.strategy`.
    pub fn new(
        graph: &'g GraphStore,
        mandatory: &'g MandatorySet,
        config: &GroundingConfig,
    ) -> Self {
        Self::with_stream(graph, mandatory, config, 0)
    }

    /// Like [`new`](Self::new), drawing random choices from stream `stream`
    /// of `config.random_seed`.
    pub fn with_stream(
        graph: &'g GraphStore,
        mandatory: &'g MandatorySet,
        config: &GroundingConfig,
        stream: u64,
    ) -> Self {
        let selector = build_selector(config.strategy, graph, config.random_seed, stream);
        Self::with_selector(graph, mandatory, config, selector)
    }

    /// Creates a run driven by a caller-supplied selector.
    pub fn with_selector(
        graph: &'g GraphStore,
        mandatory: &'g MandatorySet,
        config: &GroundingConfig,
        selector: Box<dyn SeedSelector + 'g>,
    ) -> Self {
        GroundingRun {
            mandatory,
            initial_grounding: config.initial_grounding,
            random_seed: config.random_seed,
            engine: ReachabilityEngine::with_options(graph, config.closure, config.worklist),
            selector,
            seeds: Vec::new(),
            pending: None,
            state: RunState::Initializing,
            selection_steps: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Seeds in insertion order (initial seeds first).
    pub fn seeds(&self) -> &[VertexId] {
        &self.seeds
    }

    pub fn engine(&self) -> &ReachabilityEngine<'g> {
        &self.engine
    }

    pub fn selection_steps(&self) -> usize {
        self.selection_steps
    }

    /// Performs one state transition and returns the new state.
    /// Stepping a converged run does nothing.
    pub fn step(&mut self) -> Result<RunState, GroundingError> {
        self.state = match self.state {
            RunState::Initializing => self.prime()?,
            RunState::Selecting => {
                let v = self.selector.next(&self.engine)?;
                self.seeds.push(v);
                self.pending = Some(v);
                self.selection_steps += 1;
                RunState::Propagating
            }
            RunState::Propagating => {
                if let Some(v) = self.pending.take() {
                    self.propagate(v)?;
                }
                if self.selection_steps % 10_000 == 0 {
                    debug!(
                        steps = self.selection_steps,
                        known = self.engine.known_count(),
                        unknown = self.engine.unknown_count(),
                        "grounding progress"
                    );
                }
                self.settled_state()
            }
            RunState::Converged => RunState::Converged,
        };
        Ok(self.state)
    }

    /// Steps until convergence and returns the outcome.
    pub fn run(mut self) -> Result<GroundingOutcome, GroundingError> {
        while self.state != RunState::Converged {
            self.step()?;
        }
        let outcome = self.outcome();
        info!(
            strategy = %outcome.strategy,
            grounding_set_size = outcome.grounding_set_size,
            mandatory_size = outcome.mandatory_size,
            selection_steps = outcome.selection_steps,
            edges_examined = outcome.edges_examined,
            "grounding converged"
        );
        Ok(outcome)
    }

    /// Snapshot of the run so far. At `Converged` this is the final result.
    pub fn outcome(&self) -> GroundingOutcome {
        let mut grounding_set = self.seeds.clone();
        grounding_set.sort_unstable();
        let extra_grounding_set = grounding_set
            .iter()
            .copied()
            .filter(|&v| !self.mandatory.contains(v))
            .collect();

        GroundingOutcome {
            vertex_count: self.engine.graph().vertex_count(),
            initial_grounding: self.initial_grounding,
            strategy: self.selector.strategy(),
            closure: self.engine.rule(),
            worklist: self.engine.order(),
            random_seed: self.random_seed,
            mandatory_size: self.mandatory.len(),
            grounding_set_size: grounding_set.len(),
            grounding_set,
            extra_grounding_set,
            selection_steps: self.selection_steps,
            drain_steps: self.engine.drain_steps(),
            edges_examined: self.engine.edges_examined(),
        }
    }

    fn prime(&mut self) -> Result<RunState, GroundingError> {
        if self.initial_grounding == InitialGrounding::Mandatory {
            let mandatory = self.mandatory;
            for v in mandatory.vertices() {
                self.seeds.push(v);
                self.propagate(v)?;
            }
        }
        info!(
            initial_grounding = %self.initial_grounding,
            seeds = self.seeds.len(),
            known = self.engine.known_count(),
            vertices = self.engine.graph().vertex_count(),
            "grounding run primed"
        );
        Ok(self.settled_state())
    }

    fn propagate(&mut self, v: VertexId) -> Result<(), GroundingError> {
        let newly_known = self.engine.insert(v)?;
        self.selector.observe(&self.engine, &newly_known);
        Ok(())
    }

    fn settled_state(&self) -> RunState {
        if self.engine.is_complete() {
            RunState::Converged
        } else {
            RunState::Selecting
        }
    }
}

/// Computes B and runs one grounding run to convergence.
pub fn ground(
    graph: &GraphStore,
    config: &GroundingConfig,
) -> Result<GroundingOutcome, GroundingError> {
    let mandatory = MandatorySet::compute(graph);
    GroundingRun::new(graph, &mandatory, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<VertexId> {
        raw.iter().copied().map(VertexId).collect()
    }

    fn config(strategy: Strategy, initial_grounding: InitialGrounding) -> GroundingConfig {
        GroundingConfig {
            strategy,
            initial_grounding,
            ..GroundingConfig::default()
        }
    }

    /// 0 -> 1, 1 -> 2, 2 -> 2, 3 isolated.
    fn worked_example() -> GraphStore {
        GraphStore::from_edges(4, &[(0, 1), (1, 2), (2, 2)]).unwrap()
    }

    #[test]
    fn worked_example_converges_on_the_mandatory_set() {
        let graph = worked_example();
        let outcome = ground(
            &graph,
            &config(Strategy::DynamicUnknownSuccessor, InitialGrounding::Mandatory),
        )
        .unwrap();

        assert_eq!(outcome.mandatory_size, 3);
        assert_eq!(outcome.grounding_set, ids(&[0, 2, 3]));
        assert!(outcome.extra_grounding_set.is_empty());
        assert_eq!(outcome.selection_steps, 0);
        assert_eq!(outcome.drain_steps, 4);
    }

    #[test]
    fn worked_example_from_empty_seed_set() {
        // Counts: 0 -> 1, 1 -> 1, 2 -> 1, 3 -> 0. Vertex 0 wins the tie and
        // makes 1 and 2 known; 3 is picked last.
        let graph = worked_example();
        let mandatory = MandatorySet::compute(&graph);
        let mut run = GroundingRun::new(
            &graph,
            &mandatory,
            &config(Strategy::DynamicUnknownSuccessor, InitialGrounding::Empty),
        );

        assert_eq!(run.step().unwrap(), RunState::Selecting);
        assert!(run.seeds().is_empty());

        assert_eq!(run.step().unwrap(), RunState::Propagating);
        assert_eq!(run.seeds(), &ids(&[0])[..]);
        assert_eq!(run.step().unwrap(), RunState::Selecting);
        assert_eq!(run.engine().known_count(), 3);

        assert_eq!(run.step().unwrap(), RunState::Propagating);
        assert_eq!(run.step().unwrap(), RunState::Converged);
        assert_eq!(run.seeds(), &ids(&[0, 3])[..]);

        let outcome = run.outcome();
        assert_eq!(outcome.grounding_set, ids(&[0, 3]));
        assert_eq!(outcome.extra_grounding_set, Vec::<VertexId>::new());
        assert_eq!(outcome.selection_steps, 2);
    }

    #[test]
    fn run_can_be_abandoned_between_steps() {
        let graph = GraphStore::from_edges(5, &[]).unwrap();
        let mandatory = MandatorySet::compute(&graph);
        let mut run = GroundingRun::new(
            &graph,
            &mandatory,
            &config(Strategy::StaticOutDegree, InitialGrounding::Empty),
        );

        // Initializing -> Selecting -> Propagating -> Selecting
        for _ in 0..3 {
            run.step().unwrap();
        }
        assert_eq!(run.state(), RunState::Selecting);
        assert_eq!(run.seeds(), &ids(&[0])[..]);

        let partial = run.outcome();
        assert_eq!(partial.grounding_set_size, 1);
        assert_eq!(run.engine().known_count(), 1);
    }

    #[test]
    fn stepping_a_converged_run_is_stable() {
        let graph = GraphStore::from_edges(2, &[(0, 1)]).unwrap();
        let mandatory = MandatorySet::compute(&graph);
        let mut run = GroundingRun::new(&graph, &mandatory, &GroundingConfig::default());
        assert_eq!(run.step().unwrap(), RunState::Converged);
        assert_eq!(run.step().unwrap(), RunState::Converged);
        assert_eq!(run.seeds(), &ids(&[0])[..]);
    }

    #[test]
    fn empty_graph_converges_immediately() {
        let graph = GraphStore::from_edges(0, &[]).unwrap();
        let outcome = ground(&graph, &GroundingConfig::default()).unwrap();
        assert_eq!(outcome.grounding_set_size, 0);
        assert_eq!(outcome.vertex_count, 0);
    }

    #[test]
    fn pure_cycle_needs_exactly_one_selected_seed() {
        let graph = GraphStore::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        for strategy in [
            Strategy::Random,
            Strategy::StaticOutDegree,
            Strategy::DynamicUnknownSuccessor,
        ] {
            let outcome = ground(&graph, &config(strategy, InitialGrounding::Mandatory)).unwrap();
            assert_eq!(outcome.mandatory_size, 0);
            assert_eq!(outcome.grounding_set_size, 1, "{strategy}");
            assert_eq!(outcome.selection_steps, 1);
        }
    }

    #[test]
    fn dynamic_beats_static_when_a_hub_is_already_covered() {
        // Root 0 covers 1..=5. Hub 6 also points at 1..=5 but nothing known
        // reaches it; 7 <-> 8 is an unreached cycle and 7 -> 6.
        let edges = [
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (0, 5),
            (6, 1),
            (6, 2),
            (6, 3),
            (6, 4),
            (6, 5),
            (7, 6),
            (7, 8),
            (8, 7),
        ];
        let graph = GraphStore::from_edges(9, &edges).unwrap();
        let static_run =
            ground(&graph, &config(Strategy::StaticOutDegree, InitialGrounding::Mandatory))
                .unwrap();
        let dynamic_run = ground(
            &graph,
            &config(Strategy::DynamicUnknownSuccessor, InitialGrounding::Mandatory),
        )
        .unwrap();

        // Static spends a seed on hub 6 whose successors are all known.
        assert_eq!(static_run.grounding_set, ids(&[0, 6, 7]));
        assert_eq!(dynamic_run.grounding_set, ids(&[0, 7]));
        assert!(dynamic_run.grounding_set_size < static_run.grounding_set_size);
    }

    #[test]
    fn all_predecessors_rule_grounds_through_mandatory_roots() {
        // Under the definitional rule vertex 2 needs both 0 and 1.
        // 0 -> 2, 1 -> 2, 0 -> 3, 0 -> 4
        let graph = GraphStore::from_edges(5, &[(0, 2), (1, 2), (0, 3), (0, 4)]).unwrap();
        let cfg = GroundingConfig {
            closure: ClosureRule::AllPredecessors,
            ..config(Strategy::StaticOutDegree, InitialGrounding::Mandatory)
        };
        let outcome = ground(&graph, &cfg).unwrap();
        assert_eq!(outcome.grounding_set, ids(&[0, 1]));
        assert!(outcome.edges_examined <= graph.edge_count() as u64);
        assert_eq!(outcome.closure, ClosureRule::AllPredecessors);
    }

    #[test]
    fn outcome_records_the_run_configuration() {
        let graph = worked_example();
        let cfg = GroundingConfig {
            worklist: WorklistOrder::Lifo,
            random_seed: 9,
            ..config(Strategy::Random, InitialGrounding::Empty)
        };
        let outcome = ground(&graph, &cfg).unwrap();
        assert_eq!(outcome.strategy, Strategy::Random);
        assert_eq!(outcome.initial_grounding, InitialGrounding::Empty);
        assert_eq!(outcome.closure, ClosureRule::AnyPredecessor);
        assert_eq!(outcome.worklist, WorklistOrder::Lifo);
        assert_eq!(outcome.random_seed, 9);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["closure"], "any-predecessor");
        assert_eq!(json["worklist"], "lifo");
        assert_eq!(json["random_seed"], 9);
    }

    #[test]
    fn mandatory_members_are_always_seeded() {
        // 0 -> 1 -> 1: vertex 1 is mandatory (self-loop) even though 0
        // reaches it.
        let graph = GraphStore::from_edges(2, &[(0, 1), (1, 1)]).unwrap();
        let outcome = ground(&graph, &GroundingConfig::default()).unwrap();
        assert_eq!(outcome.grounding_set, ids(&[0, 1]));
        assert_eq!(outcome.mandatory_size, 2);
    }
}
