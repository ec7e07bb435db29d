//! The mandatory set B.
//!
//! A vertex is mandatory when nothing else can make it known: it has no
//! predecessors at all, or it appears among its own predecessors (a word used
//! in its own definition). The set is computed once per graph in a single
//! pass over the degree tables and never changes afterwards.

use serde::{Deserialize, Serialize};

use crate::graph::GraphStore;
use crate::id::VertexId;

/// Why a vertex belongs to the mandatory set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandatoryReason {
    /// In-degree zero.
    NoPredecessors,
    /// The vertex has an edge to itself.
    SelfLoop,
}

/// A mandatory vertex together with the rule(s) that put it there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryEntry {
    pub vertex: VertexId,
    pub reasons: Vec<MandatoryReason>,
}

/// The mandatory set B of a graph.
#[derive(Debug, Clone)]
pub struct MandatorySet {
    entries: Vec<MandatoryEntry>,
    is_member: Vec<bool>,
}

impl MandatorySet {
    /// Computes B for `graph`. Deterministic and side-effect free.
    pub fn compute(graph: &GraphStore) -> Self {
        let mut entries = Vec::new();
        let mut is_member = vec![false; graph.vertex_count()];

        for v in graph.vertices() {
            let mut reasons = Vec::new();
            if graph.in_degree(v) == 0 {
                reasons.push(MandatoryReason::NoPredecessors);
            }
            if graph.has_self_loop(v) {
                reasons.push(MandatoryReason::SelfLoop);
            }
            if !reasons.is_empty() {
                is_member[v.index()] = true;
                entries.push(MandatoryEntry { vertex: v, reasons });
            }
        }

        MandatorySet { entries, is_member }
    }

    /// |B|.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.is_member.get(v.index()).copied().unwrap_or(false)
    }

    /// Members in ascending vertex order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.entries.iter().map(|entry| entry.vertex)
    }

    /// Members with their reasons, in ascending vertex order.
    pub fn entries(&self) -> &[MandatoryEntry] {
        &self.entries
    }

    /// Reasons for `v`, or `None` if `v` is not mandatory.
    pub fn reasons(&self, v: VertexId) -> Option<&[MandatoryReason]> {
        if !self.contains(v) {
            return None;
        }
        self.entries
            .binary_search_by_key(&v, |entry| entry.vertex)
            .ok()
            .map(|pos| self.entries[pos].reasons.as_slice())
    }

    /// Number of members with the given reason.
    pub fn count_with(&self, reason: MandatoryReason) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.reasons.contains(&reason))
            .count()
    }
}
