//! Incremental maintenance of the known set K.
//!
//! [`ReachabilityEngine`] keeps a known flag per vertex plus a worklist of
//! vertices whose flag just flipped and whose out-edges are not yet
//! propagated. Inserting a seed marks it known and drains the worklist; each
//! vertex enters the worklist at most once per run (only on its
//! unknown -> known transition), so across a whole run every edge is examined
//! at most once and the total propagation work is O(V + E), no matter how
//! many seeds are inserted.
//!
//! Two closure rules share the same drain loop:
//! - [`ClosureRule::AnyPredecessor`]: a successor of a known vertex is known.
//! - [`ClosureRule::AllPredecessors`]: a vertex is known once every one of
//!   its incoming edges comes from a known vertex. A per-vertex counter of
//!   unpropagated incoming edges replaces the predecessor subset test.

use std::collections::VecDeque;

use crate::config::{ClosureRule, WorklistOrder};
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::id::VertexId;

/// Known/unknown state of every vertex, updated one seed at a time.
#[derive(Debug, Clone)]
pub struct ReachabilityEngine<'g> {
    graph: &'g GraphStore,
    rule: ClosureRule,
    order: WorklistOrder,
    known: Vec<bool>,
    known_count: usize,
    /// Incoming edges whose source is not yet known. Only maintained under
    /// `AllPredecessors`.
    pending_in_edges: Vec<u32>,
    worklist: VecDeque<VertexId>,
    drain_steps: u64,
    edges_examined: u64,
}

impl<'g> ReachabilityEngine<'g> {
    /// Engine with forward-reachability closure and a FIFO worklist.
    pub fn new(graph: &'g GraphStore) -> Self {
        Self::with_options(graph, ClosureRule::default(), WorklistOrder::default())
    }

    pub fn with_options(graph: &'g GraphStore, rule: ClosureRule, order: WorklistOrder) -> Self {
        let pending_in_edges = match rule {
            ClosureRule::AnyPredecessor => Vec::new(),
            ClosureRule::AllPredecessors => graph
                .vertices()
                .map(|v| graph.in_degree(v) as u32)
                .collect(),
        };

        ReachabilityEngine {
            graph,
            rule,
            order,
            known: vec![false; graph.vertex_count()],
            known_count: 0,
            pending_in_edges,
            worklist: VecDeque::new(),
            drain_steps: 0,
            edges_examined: 0,
        }
    }

    /// The graph this engine propagates over.
    pub fn graph(&self) -> &'g GraphStore {
        self.graph
    }

    pub fn rule(&self) -> ClosureRule {
        self.rule
    }

    pub fn order(&self) -> WorklistOrder {
        self.order
    }

    /// Panics if `v` is out of range; see [`GraphStore::check_vertex`].
    pub fn is_known(&self, v: VertexId) -> bool {
        self.known[v.index()]
    }

    /// |K|.
    pub fn known_count(&self) -> usize {
        self.known_count
    }

    pub fn unknown_count(&self) -> usize {
        self.known.len() - self.known_count
    }

    /// True once K == V.
    pub fn is_complete(&self) -> bool {
        self.known_count == self.known.len()
    }

    /// Known vertices in ascending order.
    pub fn known_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.flagged(true)
    }

    /// Unknown vertices in ascending order.
    pub fn unknown_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.flagged(false)
    }

    fn flagged(&self, want: bool) -> impl Iterator<Item = VertexId> + '_ {
        self.known
            .iter()
            .enumerate()
            .filter(move |&(_, &known)| known == want)
            .map(|(i, _)| VertexId(i as u32))
    }

    /// Worklist pops performed so far.
    pub fn drain_steps(&self) -> u64 {
        self.drain_steps
    }

    /// Out-edges traversed so far. Never exceeds the graph's edge count.
    pub fn edges_examined(&self) -> u64 {
        self.edges_examined
    }

    /// Adds `v` to the seed set and propagates.
    ///
    /// Returns every vertex that became known because of this insertion, `v`
    /// first. Inserting an already-known vertex is a no-op and returns an
    /// empty list.
    pub fn insert(&mut self, v: VertexId) -> Result<Vec<VertexId>, GroundingError> {
        self.graph.check_vertex(v)?;
        if self.known[v.index()] {
            return Ok(Vec::new());
        }

        let mut newly_known = Vec::new();
        self.mark_known(v, &mut newly_known);
        self.drain(&mut newly_known);
        Ok(newly_known)
    }

    fn mark_known(&mut self, v: VertexId, newly_known: &mut Vec<VertexId>) {
        self.known[v.index()] = true;
        self.known_count += 1;
        self.worklist.push_back(v);
        newly_known.push(v);
    }

    fn pop(&mut self) -> Option<VertexId> {
        match self.order {
            WorklistOrder::Fifo => self.worklist.pop_front(),
            WorklistOrder::Lifo => self.worklist.pop_back(),
        }
    }

    fn drain(&mut self, newly_known: &mut Vec<VertexId>) {
        let graph = self.graph;
        while let Some(u) = self.pop() {
            self.drain_steps += 1;
            for w in graph.out_neighbors(u) {
                self.edges_examined += 1;
                if self.known[w.index()] {
                    continue;
                }
                let ready = match self.rule {
                    ClosureRule::AnyPredecessor => true,
                    ClosureRule::AllPredecessors => {
                        let pending = &mut self.pending_in_edges[w.index()];
                        *pending -= 1;
                        *pending == 0
                    }
                };
                if ready {
                    self.mark_known(w, newly_known);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<VertexId> {
        raw.iter().copied().map(VertexId).collect()
    }

    fn sorted(mut v: Vec<VertexId>) -> Vec<VertexId> {
        v.sort();
        v
    }

    #[test]
    fn insert_propagates_along_chain() {
        // 0 -> 1 -> 2 -> 3, 4 isolated
        let graph = GraphStore::from_edges(5, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut engine = ReachabilityEngine::new(&graph);

        let newly = engine.insert(VertexId(1)).unwrap();
        assert_eq!(newly, ids(&[1, 2, 3]));
        assert_eq!(engine.known_count(), 3);
        assert!(!engine.is_known(VertexId(0)));
        assert!(!engine.is_complete());

        let newly = engine.insert(VertexId(0)).unwrap();
        assert_eq!(newly, ids(&[0]));

        let newly = engine.insert(VertexId(4)).unwrap();
        assert_eq!(newly, ids(&[4]));
        assert!(engine.is_complete());
        assert_eq!(engine.unknown_count(), 0);
    }

    #[test]
    fn inserting_known_vertex_is_a_noop() {
        let graph = GraphStore::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let mut engine = ReachabilityEngine::new(&graph);
        engine.insert(VertexId(0)).unwrap();

        let steps = engine.drain_steps();
        let edges = engine.edges_examined();
        let count = engine.known_count();

        assert!(engine.insert(VertexId(2)).unwrap().is_empty());
        assert!(engine.insert(VertexId(0)).unwrap().is_empty());
        assert_eq!(engine.drain_steps(), steps);
        assert_eq!(engine.edges_examined(), edges);
        assert_eq!(engine.known_count(), count);
    }

    #[test]
    fn cycles_and_self_loops_terminate() {
        // 0 -> 1 -> 2 -> 0, 2 -> 2
        let graph = GraphStore::from_edges(3, &[(0, 1), (1, 2), (2, 0), (2, 2)]).unwrap();
        let mut engine = ReachabilityEngine::new(&graph);

        let newly = engine.insert(VertexId(1)).unwrap();
        assert_eq!(sorted(newly), ids(&[0, 1, 2]));
        assert!(engine.is_complete());
        assert_eq!(engine.drain_steps(), 3);
        assert_eq!(engine.edges_examined(), 4);
    }

    #[test]
    fn each_edge_is_examined_at_most_once_across_inserts() {
        // Two chains feeding a shared tail, plus duplicates.
        let edges = [(0, 2), (1, 2), (2, 3), (3, 4), (2, 3), (5, 4)];
        let graph = GraphStore::from_edges(6, &edges).unwrap();
        let mut engine = ReachabilityEngine::new(&graph);

        for v in [2, 0, 1, 5, 4, 3] {
            engine.insert(VertexId(v)).unwrap();
        }
        assert!(engine.is_complete());
        assert!(engine.edges_examined() <= graph.edge_count() as u64);
        assert_eq!(engine.drain_steps(), graph.vertex_count() as u64);
    }

    #[test]
    fn lifo_and_fifo_reach_the_same_set() {
        let edges = [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (5, 6)];
        let graph = GraphStore::from_edges(7, &edges).unwrap();

        let mut fifo =
            ReachabilityEngine::with_options(&graph, ClosureRule::AnyPredecessor, WorklistOrder::Fifo);
        let mut lifo =
            ReachabilityEngine::with_options(&graph, ClosureRule::AnyPredecessor, WorklistOrder::Lifo);

        let a = fifo.insert(VertexId(0)).unwrap();
        let b = lifo.insert(VertexId(0)).unwrap();
        assert_eq!(a[0], VertexId(0));
        assert_eq!(b[0], VertexId(0));
        assert_eq!(sorted(a), sorted(b));
        assert_eq!(
            fifo.known_vertices().collect::<Vec<_>>(),
            lifo.known_vertices().collect::<Vec<_>>()
        );
    }

    #[test]
    fn all_predecessors_rule_waits_for_every_definer() {
        // 0 -> 2, 1 -> 2, 2 -> 3
        let graph = GraphStore::from_edges(4, &[(0, 2), (1, 2), (2, 3)]).unwrap();
        let mut engine = ReachabilityEngine::with_options(
            &graph,
            ClosureRule::AllPredecessors,
            WorklistOrder::Fifo,
        );

        assert_eq!(engine.insert(VertexId(0)).unwrap(), ids(&[0]));
        assert!(!engine.is_known(VertexId(2)));

        assert_eq!(engine.insert(VertexId(1)).unwrap(), ids(&[1, 2, 3]));
        assert!(engine.is_complete());
    }

    #[test]
    fn all_predecessors_rule_counts_duplicate_edges() {
        // Two parallel edges 0 -> 1 both originate from the same vertex.
        let graph = GraphStore::from_edges(2, &[(0, 1), (0, 1)]).unwrap();
        let mut engine = ReachabilityEngine::with_options(
            &graph,
            ClosureRule::AllPredecessors,
            WorklistOrder::Fifo,
        );
        assert_eq!(engine.insert(VertexId(0)).unwrap(), ids(&[0, 1]));
    }

    #[test]
    fn all_predecessors_rule_never_frees_a_self_loop() {
        // 0 -> 1, 1 -> 1: vertex 1 depends on itself.
        let graph = GraphStore::from_edges(2, &[(0, 1), (1, 1)]).unwrap();
        let mut engine = ReachabilityEngine::with_options(
            &graph,
            ClosureRule::AllPredecessors,
            WorklistOrder::Fifo,
        );
        engine.insert(VertexId(0)).unwrap();
        assert!(!engine.is_known(VertexId(1)));

        // Under forward reachability the same seed covers everything.
        let mut forward = ReachabilityEngine::new(&graph);
        forward.insert(VertexId(0)).unwrap();
        assert!(forward.is_complete());
    }

    #[test]
    fn all_predecessors_rule_never_frees_a_root() {
        // 0 isolated, 1 -> 2. A vertex with no definers must be seeded.
        let graph = GraphStore::from_edges(3, &[(1, 2)]).unwrap();
        let mut engine = ReachabilityEngine::with_options(
            &graph,
            ClosureRule::AllPredecessors,
            WorklistOrder::Fifo,
        );
        assert_eq!(engine.insert(VertexId(1)).unwrap(), ids(&[1, 2]));
        assert!(!engine.is_known(VertexId(0)));
        assert_eq!(engine.unknown_vertices().collect::<Vec<_>>(), ids(&[0]));
    }

    #[test]
    fn out_of_range_insert_is_rejected() {
        let graph = GraphStore::from_edges(2, &[]).unwrap();
        let mut engine = ReachabilityEngine::new(&graph);
        assert!(matches!(
            engine.insert(VertexId(9)),
            Err(GroundingError::VertexOutOfRange { .. })
        ));
        assert_eq!(engine.known_count(), 0);
    }

    #[test]
    fn unknown_vertices_complements_known() {
        let graph = GraphStore::from_edges(4, &[(0, 1)]).unwrap();
        let mut engine = ReachabilityEngine::new(&graph);
        engine.insert(VertexId(0)).unwrap();
        assert_eq!(engine.known_vertices().collect::<Vec<_>>(), ids(&[0, 1]));
        assert_eq!(engine.unknown_vertices().collect::<Vec<_>>(), ids(&[2, 3]));
    }
}
