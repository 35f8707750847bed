//! Change notification interface of the linked graph.

use crate::errors::BranchGraphError;

use super::graph::{EdgeId, LinkedGraph, VertexId};

/// Receives structural events from a [`ListenableGraph`](super::ListenableGraph).
///
/// Callbacks run synchronously inside the mutating call, with the graph passed
/// in so the listener can read adjacency. Additions are reported after the
/// entity exists; removals are reported while the entity still exists, and
/// all edges incident to a vertex are reported removed before the vertex
/// itself.
///
/// Returning an error aborts the mutating call with that error.
pub trait GraphListener {
    /// The graph was replaced or resynchronised in bulk.
    fn graph_rebuilt(&mut self, graph: &LinkedGraph) -> Result<(), BranchGraphError>;
    fn vertex_added(&mut self, graph: &LinkedGraph, vertex: VertexId)
    -> Result<(), BranchGraphError>;
    fn vertex_removed(
        &mut self,
        graph: &LinkedGraph,
        vertex: VertexId,
    ) -> Result<(), BranchGraphError>;
    fn edge_added(&mut self, graph: &LinkedGraph, edge: EdgeId) -> Result<(), BranchGraphError>;
    fn edge_removed(&mut self, graph: &LinkedGraph, edge: EdgeId) -> Result<(), BranchGraphError>;
}

/// Receives the end-of-batch signal raised by
/// [`ListenableGraph::notify_graph_changed`](super::ListenableGraph::notify_graph_changed).
pub trait GraphChangeListener {
    fn graph_changed(&mut self);
}

/// No-op listener, for a `ListenableGraph` nobody observes.
impl GraphListener for () {
    fn graph_rebuilt(&mut self, _graph: &LinkedGraph) -> Result<(), BranchGraphError> {
        Ok(())
    }

    fn vertex_added(
        &mut self,
        _graph: &LinkedGraph,
        _vertex: VertexId,
    ) -> Result<(), BranchGraphError> {
        Ok(())
    }

    fn vertex_removed(
        &mut self,
        _graph: &LinkedGraph,
        _vertex: VertexId,
    ) -> Result<(), BranchGraphError> {
        Ok(())
    }

    fn edge_added(&mut self, _graph: &LinkedGraph, _edge: EdgeId) -> Result<(), BranchGraphError> {
        Ok(())
    }

    fn edge_removed(
        &mut self,
        _graph: &LinkedGraph,
        _edge: EdgeId,
    ) -> Result<(), BranchGraphError> {
        Ok(())
    }
}

impl GraphChangeListener for () {
    fn graph_changed(&mut self) {}
}
