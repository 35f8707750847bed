//! Id-independent snapshots of a branch graph.
//!
//! Branch ids are reissued on every split and fuse, so two branch graphs that
//! describe the same structure rarely share ids. A [`BranchLayout`] names each
//! branch by linked ids only and sorts them, which makes it comparable across
//! instances (for example an incrementally maintained graph against a fresh
//! rebuild).

use serde::{Deserialize, Serialize};

use crate::errors::BranchGraphError;
use crate::linked::{EdgeId, LinkedGraph, VertexId};

use super::engine::BranchGraph;
use super::membership::Membership;

/// Counters describing the current decomposition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchGraphStats {
    pub branch_vertices: usize,
    pub branch_edges: usize,
    pub extremities: usize,
    pub interior_vertices: usize,
    pub tracked_edges: usize,
    pub loops: usize,
}

/// One branch edge spelled out as its linked head vertices and edge chain.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchPath {
    pub source: VertexId,
    pub target: VertexId,
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchLayout {
    /// Linked vertices that are branch vertices, sorted.
    pub extremities: Vec<VertexId>,
    /// Every branch edge, sorted.
    pub branches: Vec<BranchPath>,
}

impl BranchLayout {
    pub fn to_json(&self) -> Result<String, BranchGraphError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| BranchGraphError::serialization(err.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, BranchGraphError> {
        serde_json::from_str(json)
            .map_err(|err| BranchGraphError::serialization(err.to_string()))
    }

    /// Number of linked edges covered by all branches.
    pub fn edge_count(&self) -> usize {
        self.branches.iter().map(|branch| branch.edges.len()).sum()
    }
}

impl BranchGraph {
    pub fn stats(&self) -> BranchGraphStats {
        let mut stats = BranchGraphStats {
            branch_vertices: self.branch_vertex_count(),
            branch_edges: self.branch_edge_count(),
            tracked_edges: self.tables.tracked_edge_count(),
            loops: self.store.edges().filter(|(_, record)| record.is_loop()).count(),
            ..BranchGraphStats::default()
        };
        for (_, membership) in self.tables.vertex_entries() {
            match membership {
                Membership::Extremity(_) => stats.extremities += 1,
                Membership::Interior(_) => stats.interior_vertices += 1,
            }
        }
        stats
    }

    /// Snapshot of the decomposition keyed by linked ids.
    pub fn layout(&self, graph: &LinkedGraph) -> BranchLayout {
        let mut extremities: Vec<VertexId> = self
            .store
            .vertices()
            .map(|(_, record)| record.linked)
            .collect();
        extremities.sort();

        let mut branches = Vec::with_capacity(self.branch_edge_count());
        for branch_edge in self.branch_edges() {
            let Some((source, target)) = self.branch_edge_linked_endpoints(branch_edge) else {
                continue;
            };
            branches.push(BranchPath {
                source,
                target,
                edges: self.edge_branch_iter(graph, branch_edge).collect(),
            });
        }
        branches.sort();

        BranchLayout {
            extremities,
            branches,
        }
    }
}
