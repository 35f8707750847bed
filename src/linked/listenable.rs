//! Linked graph wrapper that raises events into a listener.

use tracing::trace;

use crate::errors::BranchGraphError;
use crate::mutation::GraphMutation;

use super::graph::{EdgeId, LinkedGraph, VertexId};
use super::listener::{GraphChangeListener, GraphListener};

/// A [`LinkedGraph`] paired with the listener that mirrors it.
///
/// Every mutation is applied and reported in the same call, so once a method
/// returns `Ok` the listener has already processed the change. The listener
/// is only reachable through a shared reference; it cannot be mutated behind
/// the graph's back.
///
/// If the listener rejects an addition, the entity stays in the linked graph
/// and the error is returned. If it rejects a removal, the entity is kept.
pub struct ListenableGraph<L: GraphListener> {
    graph: LinkedGraph,
    listener: L,
    paused: bool,
}

impl<L: GraphListener + Default> Default for ListenableGraph<L> {
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<L: GraphListener> ListenableGraph<L> {
    /// Wraps an empty graph. The listener must not hold state from another graph.
    pub fn new(listener: L) -> Self {
        Self {
            graph: LinkedGraph::new(),
            listener,
            paused: false,
        }
    }

    /// Wraps an existing graph and brings the listener in sync with one rebuild.
    pub fn from_graph(graph: LinkedGraph, mut listener: L) -> Result<Self, BranchGraphError> {
        listener.graph_rebuilt(&graph)?;
        Ok(Self {
            graph,
            listener,
            paused: false,
        })
    }

    pub fn graph(&self) -> &LinkedGraph {
        &self.graph
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn into_parts(self) -> (LinkedGraph, L) {
        (self.graph, self.listener)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stops event delivery until [`resume_listeners`](Self::resume_listeners).
    ///
    /// Used for bulk loads: the listener is resynchronised once at the end
    /// instead of processing each edit.
    pub fn pause_listeners(&mut self) {
        self.paused = true;
    }

    /// Resumes event delivery and raises a single `graph_rebuilt`.
    pub fn resume_listeners(&mut self) -> Result<(), BranchGraphError> {
        if !self.paused {
            return Ok(());
        }
        self.paused = false;
        self.rebuild()
    }

    /// Raises `graph_rebuilt` unconditionally.
    pub fn rebuild(&mut self) -> Result<(), BranchGraphError> {
        trace!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            "raising graph_rebuilt"
        );
        self.listener.graph_rebuilt(&self.graph)
    }

    pub fn add_vertex(&mut self, timestamp: i64) -> Result<VertexId, BranchGraphError> {
        let vertex = self.graph.add_vertex(timestamp);
        if !self.paused {
            self.listener.vertex_added(&self.graph, vertex)?;
        }
        Ok(vertex)
    }

    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
    ) -> Result<EdgeId, BranchGraphError> {
        let edge = self.graph.add_edge(source, target)?;
        if !self.paused {
            self.listener.edge_added(&self.graph, edge)?;
        }
        Ok(edge)
    }

    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(), BranchGraphError> {
        if !self.graph.contains_edge(edge) {
            return Err(BranchGraphError::not_found(format!("edge {edge:?}")));
        }
        if !self.paused {
            self.listener.edge_removed(&self.graph, edge)?;
        }
        self.graph.remove_edge(edge)
    }

    /// Removes a vertex together with its incident edges.
    ///
    /// Incoming edges are removed first, then outgoing ones, each with its own
    /// `edge_removed` event; `vertex_removed` follows once the vertex is isolated.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), BranchGraphError> {
        if !self.graph.contains_vertex(vertex) {
            return Err(BranchGraphError::not_found(format!("vertex {vertex:?}")));
        }
        let mut incident: Vec<EdgeId> = self.graph.incoming(vertex).to_vec();
        for &edge in self.graph.outgoing(vertex) {
            if !incident.contains(&edge) {
                incident.push(edge);
            }
        }
        for edge in incident {
            self.remove_edge(edge)?;
        }
        if !self.paused {
            self.listener.vertex_removed(&self.graph, vertex)?;
        }
        self.graph.remove_vertex(vertex)
    }
}

impl<L: GraphListener + GraphChangeListener> ListenableGraph<L> {
    /// Marks the end of a batch of edits.
    pub fn notify_graph_changed(&mut self) {
        if !self.paused {
            self.listener.graph_changed();
        }
    }
}

impl<L: GraphListener> GraphMutation for ListenableGraph<L> {
    type Vertex = VertexId;
    type Edge = EdgeId;

    fn add_vertex(&mut self, timestamp: i64) -> Result<VertexId, BranchGraphError> {
        ListenableGraph::add_vertex(self, timestamp)
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<EdgeId, BranchGraphError> {
        ListenableGraph::add_edge(self, source, target)
    }

    fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), BranchGraphError> {
        ListenableGraph::remove_vertex(self, vertex)
    }

    fn remove_edge(&mut self, edge: EdgeId) -> Result<(), BranchGraphError> {
        ListenableGraph::remove_edge(self, edge)
    }
}
