//! Vertex and edge storage of the branch graph.
//!
//! A branch vertex record carries its linked head vertex and a branch edge
//! record carries its representative linked edge, so the two reverse mappings
//! (branch vertex to linked vertex, branch edge to linked edge) live here
//! rather than in separate tables.

use crate::arena::{Arena, arena_id};
use crate::errors::BranchGraphError;
use crate::linked::{EdgeId, VertexId};

arena_id!(
    /// Identifier of a branch vertex. Not stable across splits and fuses.
    BranchVertexId,
    "bv"
);

arena_id!(
    /// Identifier of a branch edge. Not stable across splits and fuses.
    BranchEdgeId,
    "be"
);

#[derive(Debug, Clone)]
pub(crate) struct BranchVertexRecord {
    pub(crate) linked: VertexId,
    pub(crate) incoming: Vec<BranchEdgeId>,
    pub(crate) outgoing: Vec<BranchEdgeId>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BranchEdgeRecord {
    pub(crate) source: BranchVertexId,
    pub(crate) target: BranchVertexId,
    pub(crate) representative: EdgeId,
}

impl BranchEdgeRecord {
    pub(crate) fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Default)]
pub(crate) struct BranchStore {
    vertices: Arena<BranchVertexId, BranchVertexRecord>,
    edges: Arena<BranchEdgeId, BranchEdgeRecord>,
}

impl BranchStore {
    pub(crate) fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Arena::with_capacity(vertices),
            edges: Arena::with_capacity(edges),
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

    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn vertex(&self, vertex: BranchVertexId) -> Option<&BranchVertexRecord> {
        self.vertices.get(vertex)
    }

    pub(crate) fn edge(&self, edge: BranchEdgeId) -> Option<&BranchEdgeRecord> {
        self.edges.get(edge)
    }

    pub(crate) fn vertices(&self) -> impl Iterator<Item = (BranchVertexId, &BranchVertexRecord)> {
        self.vertices.iter()
    }

    pub(crate) fn edges(&self) -> impl Iterator<Item = (BranchEdgeId, &BranchEdgeRecord)> {
        self.edges.iter()
    }

    pub(crate) fn add_vertex(&mut self, linked: VertexId) -> BranchVertexId {
        self.vertices.insert(BranchVertexRecord {
            linked,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        })
    }

    /// Removes an isolated branch vertex.
    pub(crate) fn remove_vertex(
        &mut self,
        vertex: BranchVertexId,
    ) -> Result<BranchVertexRecord, BranchGraphError> {
        let record = self.vertices.get(vertex).ok_or_else(|| {
            BranchGraphError::contract(format!("branch vertex {vertex:?} does not exist"))
        })?;
        if !record.incoming.is_empty() || !record.outgoing.is_empty() {
            return Err(BranchGraphError::contract(format!(
                "branch vertex {vertex:?} still has incident branch edges"
            )));
        }
        self.vertices.remove(vertex).ok_or_else(|| {
            BranchGraphError::contract(format!("branch vertex {vertex:?} vanished"))
        })
    }

    pub(crate) fn add_edge(
        &mut self,
        source: BranchVertexId,
        target: BranchVertexId,
        representative: EdgeId,
    ) -> Result<BranchEdgeId, BranchGraphError> {
        if !self.vertices.contains(source) || !self.vertices.contains(target) {
            return Err(BranchGraphError::contract(format!(
                "branch edge endpoints {source:?} -> {target:?} must exist"
            )));
        }
        let edge = self.edges.insert(BranchEdgeRecord {
            source,
            target,
            representative,
        });
        if let Some(record) = self.vertices.get_mut(source) {
            record.outgoing.push(edge);
        }
        if let Some(record) = self.vertices.get_mut(target) {
            record.incoming.push(edge);
        }
        Ok(edge)
    }

    pub(crate) fn remove_edge(
        &mut self,
        edge: BranchEdgeId,
    ) -> Result<BranchEdgeRecord, BranchGraphError> {
        let record = self.edges.remove(edge).ok_or_else(|| {
            BranchGraphError::contract(format!("branch edge {edge:?} does not exist"))
        })?;
        if let Some(source) = self.vertices.get_mut(record.source) {
            source.outgoing.retain(|&e| e != edge);
        }
        if let Some(target) = self.vertices.get_mut(record.target) {
            target.incoming.retain(|&e| e != edge);
        }
        Ok(record)
    }
}
