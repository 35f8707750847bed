//! Arena-backed directed graph observed by the branch graph.

use crate::arena::{Arena, arena_id};
use crate::errors::BranchGraphError;
use crate::mutation::GraphMutation;

arena_id!(
    /// Identifier of a linked graph vertex.
    VertexId,
    "v"
);

arena_id!(
    /// Identifier of a linked graph edge.
    EdgeId,
    "e"
);

#[derive(Debug, Clone)]
struct VertexRecord {
    timestamp: i64,
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    source: VertexId,
    target: VertexId,
}

/// Simple directed graph with timestamped vertices.
///
/// At most one edge may connect a given ordered pair of vertices; self-loops
/// are permitted. Adjacency lists keep insertion order, and [`vertices`] and
/// [`edges`] iterate in slot order, which equals insertion order as long as
/// nothing has been removed.
///
/// Mutating a `LinkedGraph` directly raises no events. Wrap it in a
/// [`ListenableGraph`](crate::ListenableGraph) to keep a listener in sync.
///
/// [`vertices`]: LinkedGraph::vertices
/// [`edges`]: LinkedGraph::edges
#[derive(Default)]
pub struct LinkedGraph {
    vertices: Arena<VertexId, VertexRecord>,
    edges: Arena<EdgeId, EdgeRecord>,
}

impl LinkedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Arena::with_capacity(vertices),
            edges: Arena::with_capacity(edges),
        }
    }

    pub fn add_vertex(&mut self, timestamp: i64) -> VertexId {
        self.vertices.insert(VertexRecord {
            timestamp,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        })
    }

    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
    ) -> Result<EdgeId, BranchGraphError> {
        if !self.vertices.contains(source) {
            return Err(BranchGraphError::not_found(format!(
                "source vertex {source:?}"
            )));
        }
        if !self.vertices.contains(target) {
            return Err(BranchGraphError::not_found(format!(
                "target vertex {target:?}"
            )));
        }
        if let Some(existing) = self.find_edge(source, target) {
            return Err(BranchGraphError::invalid_input(format!(
                "edge {source:?} -> {target:?} already exists as {existing:?}"
            )));
        }

        let edge = self.edges.insert(EdgeRecord { source, target });
        if let Some(record) = self.vertices.get_mut(source) {
            record.outgoing.push(edge);
        }
        if let Some(record) = self.vertices.get_mut(target) {
            record.incoming.push(edge);
        }
        Ok(edge)
    }

    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(), BranchGraphError> {
        let record = self
            .edges
            .remove(edge)
            .ok_or_else(|| BranchGraphError::not_found(format!("edge {edge:?}")))?;
        if let Some(source) = self.vertices.get_mut(record.source) {
            source.outgoing.retain(|&e| e != edge);
        }
        if let Some(target) = self.vertices.get_mut(record.target) {
            target.incoming.retain(|&e| e != edge);
        }
        Ok(())
    }

    /// Removes an isolated vertex. Incident edges must be removed first.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), BranchGraphError> {
        let record = self
            .vertices
            .get(vertex)
            .ok_or_else(|| BranchGraphError::not_found(format!("vertex {vertex:?}")))?;
        if !record.incoming.is_empty() || !record.outgoing.is_empty() {
            return Err(BranchGraphError::invalid_input(format!(
                "vertex {vertex:?} still has {} incoming and {} outgoing edges",
                record.incoming.len(),
                record.outgoing.len()
            )));
        }
        self.vertices.remove(vertex);
        Ok(())
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(edge)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn timestamp(&self, vertex: VertexId) -> Option<i64> {
        self.vertices.get(vertex).map(|record| record.timestamp)
    }

    pub fn source(&self, edge: EdgeId) -> Option<VertexId> {
        self.edges.get(edge).map(|record| record.source)
    }

    pub fn target(&self, edge: EdgeId) -> Option<VertexId> {
        self.edges.get(edge).map(|record| record.target)
    }

    pub fn endpoints(&self, edge: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edges
            .get(edge)
            .map(|record| (record.source, record.target))
    }

    /// Incoming edges in insertion order; empty for an unknown vertex.
    pub fn incoming(&self, vertex: VertexId) -> &[EdgeId] {
        self.vertices
            .get(vertex)
            .map(|record| record.incoming.as_slice())
            .unwrap_or(&[])
    }

    /// Outgoing edges in insertion order; empty for an unknown vertex.
    pub fn outgoing(&self, vertex: VertexId) -> &[EdgeId] {
        self.vertices
            .get(vertex)
            .map(|record| record.outgoing.as_slice())
            .unwrap_or(&[])
    }

    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.incoming(vertex).len()
    }

    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.outgoing(vertex).len()
    }

    pub fn find_edge(&self, source: VertexId, target: VertexId) -> Option<EdgeId> {
        self.outgoing(source)
            .iter()
            .copied()
            .find(|&edge| self.target(edge) == Some(target))
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys()
    }
}

impl GraphMutation for LinkedGraph {
    type Vertex = VertexId;
    type Edge = EdgeId;

    fn add_vertex(&mut self, timestamp: i64) -> Result<VertexId, BranchGraphError> {
        Ok(LinkedGraph::add_vertex(self, timestamp))
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<EdgeId, BranchGraphError> {
        LinkedGraph::add_edge(self, source, target)
    }

    fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), BranchGraphError> {
        LinkedGraph::remove_vertex(self, vertex)
    }

    fn remove_edge(&mut self, edge: EdgeId) -> Result<(), BranchGraphError> {
        LinkedGraph::remove_edge(self, edge)
    }
}
