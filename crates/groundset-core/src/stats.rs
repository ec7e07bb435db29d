//! Structural summary of a word graph.
//!
//! Counts roots, leaves and self-loops from the degree tables and uses
//! `petgraph::algo` for the component structure. The strongly connected
//! components come from Tarjan's algorithm; weak components from a
//! union-find pass over the edges.

use std::cmp::Reverse;

use petgraph::algo::{connected_components, tarjan_scc};
use serde::{Deserialize, Serialize};

use crate::graph::GraphStore;
use crate::id::VertexId;

/// A vertex with one of its degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeEntry {
    pub vertex: VertexId,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Edges per vertex; average in-degree and out-degree are equal.
    pub average_degree: f64,
    /// Vertices with in-degree 0.
    pub root_count: usize,
    /// Vertices with out-degree 0.
    pub leaf_count: usize,
    pub self_loop_count: usize,
    pub weakly_connected_components: usize,
    pub strongly_connected_components: usize,
    pub largest_scc_size: usize,
    /// Highest out-degree first, lowest index on ties.
    pub top_out_degree: Vec<DegreeEntry>,
    /// Highest in-degree first, lowest index on ties.
    pub top_in_degree: Vec<DegreeEntry>,
}

impl GraphSummary {
    /// Summarises `graph`, listing the `top` highest-degree vertices in each
    /// direction.
    pub fn compute(graph: &GraphStore, top: usize) -> Self {
        let vertex_count = graph.vertex_count();
        let edge_count = graph.edge_count();

        let root_count = graph.vertices().filter(|&v| graph.in_degree(v) == 0).count();
        let leaf_count = graph.vertices().filter(|&v| graph.out_degree(v) == 0).count();
        let self_loop_count = graph.vertices().filter(|&v| graph.has_self_loop(v)).count();

        let sccs = tarjan_scc(graph.petgraph());
        let largest_scc_size = sccs.iter().map(Vec::len).max().unwrap_or(0);

        let average_degree = if vertex_count == 0 {
            0.0
        } else {
            edge_count as f64 / vertex_count as f64
        };

        GraphSummary {
            vertex_count,
            edge_count,
            average_degree,
            root_count,
            leaf_count,
            self_loop_count,
            weakly_connected_components: connected_components(graph.petgraph()),
            strongly_connected_components: sccs.len(),
            largest_scc_size,
            top_out_degree: top_by(graph, top, |v| graph.out_degree(v)),
            top_in_degree: top_by(graph, top, |v| graph.in_degree(v)),
        }
    }
}

fn top_by(graph: &GraphStore, top: usize, degree: impl Fn(VertexId) -> usize) -> Vec<DegreeEntry> {
    let mut entries: Vec<DegreeEntry> = graph
        .vertices()
        .map(|vertex| DegreeEntry {
            vertex,
            degree: degree(vertex),
        })
        .collect();
    entries.sort_by_key(|entry| (Reverse(entry.degree), entry.vertex));
    entries.truncate(top);
    entries
}
