//! GraphStore: the immutable directed word graph.
//!
//! [`GraphStore`] owns the only copy of the vertex and edge storage. Every
//! other component borrows it and addresses vertices by [`VertexId`].
//!
//! The adjacency lives in a petgraph `Graph<(), (), Directed, u32>`, which
//! keeps both outgoing and incoming edge lists per vertex, so forward and
//! reverse neighbour walks cost O(degree). Degree and self-loop tables are
//! computed once during construction.
//!
//! Parallel edges are kept unless [`GraphOptions::dedup_edges`] is set; in
//! that case degrees count distinct targets only.

use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, Direction};

use crate::config::GraphOptions;
use crate::error::GroundingError;
use crate::id::VertexId;

/// Immutable directed graph with degree tables.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: Graph<(), (), Directed, u32>,
    out_degree: Vec<u32>,
    in_degree: Vec<u32>,
    self_loop: Vec<bool>,
}

impl GraphStore {
    /// Builds a graph from `(source, target)` index pairs, keeping parallel
    /// edges.
    pub fn from_edges(
        vertex_count: usize,
        edges: &[(usize, usize)],
    ) -> Result<Self, GroundingError> {
        Self::with_options(vertex_count, edges, GraphOptions::default())
    }

    /// Builds a graph from `(source, target)` index pairs.
    ///
    /// Runs in time linear in the edge count (plus a sort when deduplicating).
    /// Fails with an invalid-graph error if any endpoint is out of range; no
    /// partial graph is produced.
    pub fn with_options(
        vertex_count: usize,
        edges: &[(usize, usize)],
        options: GraphOptions,
    ) -> Result<Self, GroundingError> {
        // u32::MAX is petgraph's end-of-list sentinel for `u32` indices.
        if vertex_count >= u32::MAX as usize {
            return Err(GroundingError::InvalidGraph {
                reason: format!(
                    "vertex count {} exceeds the supported maximum of {}",
                    vertex_count,
                    u32::MAX - 1
                ),
            });
        }
        if edges.len() >= u32::MAX as usize {
            return Err(GroundingError::InvalidGraph {
                reason: format!("edge count {} exceeds the supported maximum", edges.len()),
            });
        }

        for &(from, to) in edges {
            if from >= vertex_count || to >= vertex_count {
                return Err(GroundingError::EdgeOutOfRange {
                    from,
                    to,
                    vertex_count,
                });
            }
        }

        let deduped;
        let edges = if options.dedup_edges {
            let mut distinct = edges.to_vec();
            distinct.sort_unstable();
            distinct.dedup();
            deduped = distinct;
            deduped.as_slice()
        } else {
            edges
        };

        let mut graph = Graph::<(), (), Directed, u32>::with_capacity(vertex_count, edges.len());
        for _ in 0..vertex_count {
            graph.add_node(());
        }

        let mut out_degree = vec![0u32; vertex_count];
        let mut in_degree = vec![0u32; vertex_count];
        let mut self_loop = vec![false; vertex_count];

        for &(from, to) in edges {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            out_degree[from] += 1;
            in_degree[to] += 1;
            if from == to {
                self_loop[from] = true;
            }
        }

        Ok(GraphStore {
            graph,
            out_degree,
            in_degree,
            self_loop,
        })
    }

    // -----------------------------------------------------------------------
    // Size
    // -----------------------------------------------------------------------

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, counting parallel edges individually.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.node_indices().map(VertexId::from)
    }

    /// Returns true if `v` is a vertex of this graph.
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertex_count()
    }

    /// Errors with `VertexOutOfRange` unless `v` is a vertex of this graph.
    pub fn check_vertex(&self, v: VertexId) -> Result<(), GroundingError> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(GroundingError::VertexOutOfRange {
                vertex: v,
                vertex_count: self.vertex_count(),
            })
        }
    }

    // -----------------------------------------------------------------------
    // Adjacency
    //
    // The per-vertex accessors below index directly and panic on an
    // out-of-range id, like slice indexing. Use `check_vertex` for ids that
    // come from outside the engine.
    // -----------------------------------------------------------------------

    /// Successors of `v`, one entry per outgoing edge (order unspecified).
    pub fn out_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.graph
            .neighbors_directed(v.into(), Direction::Outgoing)
            .map(VertexId::from)
    }

    /// Predecessors of `v`, one entry per incoming edge (order unspecified).
    pub fn in_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.graph
            .neighbors_directed(v.into(), Direction::Incoming)
            .map(VertexId::from)
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.out_degree[v.index()] as usize
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.in_degree[v.index()] as usize
    }

    pub fn has_self_loop(&self, v: VertexId) -> bool {
        self.self_loop[v.index()]
    }

    /// Read-only access to the underlying petgraph graph, for algorithms
    /// from `petgraph::algo`.
    pub fn petgraph(&self) -> &Graph<(), (), Directed, u32> {
        &self.graph
    }
}
