//! Linked-to-branch mapping tables.
//!
//! Every tracked linked vertex has exactly one [`Membership`]: it is either a
//! branch extremity (it owns a branch vertex) or buried inside a branch edge.
//! Holding both facts in one tagged entry makes the two states mutually
//! exclusive by construction. Every tracked linked edge maps to the branch
//! edge that covers it.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::linked::{EdgeId, VertexId};

use super::store::{BranchEdgeId, BranchVertexId};

/// Where a linked vertex sits in the branch graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Membership {
    /// The vertex is a branch point or endpoint, represented by this branch vertex.
    Extremity(BranchVertexId),
    /// The vertex is interior to this branch edge.
    Interior(BranchEdgeId),
}

#[derive(Default)]
pub(crate) struct MappingTables {
    vertices: AHashMap<VertexId, Membership>,
    edges: AHashMap<EdgeId, BranchEdgeId>,
}

impl MappingTables {
    pub(crate) fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: AHashMap::with_capacity(vertices),
            edges: AHashMap::with_capacity(edges),
        }
    }

    pub(crate) fn reserve(&mut self, vertices: usize, edges: usize) {
        self.vertices.reserve(vertices);
        self.edges.reserve(edges);
    }

    pub(crate) fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }

    pub(crate) fn membership(&self, vertex: VertexId) -> Option<Membership> {
        self.vertices.get(&vertex).copied()
    }

    pub(crate) fn extremity(&self, vertex: VertexId) -> Option<BranchVertexId> {
        match self.vertices.get(&vertex)? {
            Membership::Extremity(branch_vertex) => Some(*branch_vertex),
            Membership::Interior(_) => None,
        }
    }

    pub(crate) fn interior(&self, vertex: VertexId) -> Option<BranchEdgeId> {
        match self.vertices.get(&vertex)? {
            Membership::Interior(branch_edge) => Some(*branch_edge),
            Membership::Extremity(_) => None,
        }
    }

    pub(crate) fn set_extremity(&mut self, vertex: VertexId, branch_vertex: BranchVertexId) {
        self.vertices
            .insert(vertex, Membership::Extremity(branch_vertex));
    }

    pub(crate) fn set_interior(&mut self, vertex: VertexId, branch_edge: BranchEdgeId) {
        self.vertices.insert(vertex, Membership::Interior(branch_edge));
    }

    pub(crate) fn forget_vertex(&mut self, vertex: VertexId) -> Option<Membership> {
        self.vertices.remove(&vertex)
    }

    pub(crate) fn branch_edge_of(&self, edge: EdgeId) -> Option<BranchEdgeId> {
        self.edges.get(&edge).copied()
    }

    pub(crate) fn is_tracked(&self, edge: EdgeId) -> bool {
        self.edges.contains_key(&edge)
    }

    pub(crate) fn set_edge(&mut self, edge: EdgeId, branch_edge: BranchEdgeId) {
        self.edges.insert(edge, branch_edge);
    }

    pub(crate) fn forget_edge(&mut self, edge: EdgeId) -> Option<BranchEdgeId> {
        self.edges.remove(&edge)
    }

    pub(crate) fn vertex_entries(&self) -> impl Iterator<Item = (VertexId, Membership)> + '_ {
        self.vertices.iter().map(|(&vertex, &membership)| (vertex, membership))
    }

    pub(crate) fn edge_entries(&self) -> impl Iterator<Item = (EdgeId, BranchEdgeId)> + '_ {
        self.edges.iter().map(|(&edge, &branch_edge)| (edge, branch_edge))
    }

    pub(crate) fn tracked_vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn tracked_edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn interior_count(&self) -> usize {
        self.vertices
            .values()
            .filter(|membership| matches!(membership, Membership::Interior(_)))
            .count()
    }
}
