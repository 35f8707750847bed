//! Standard graph mutation entry points.

use crate::errors::BranchGraphError;

/// Mutation surface shared by every graph in the crate.
///
/// [`LinkedGraph`](crate::LinkedGraph) and
/// [`ListenableGraph`](crate::ListenableGraph) apply the change.
/// [`BranchGraph`](crate::BranchGraph) is derived data: every method fails
/// with [`BranchGraphError::ReadOnly`].
pub trait GraphMutation {
    type Vertex: Copy;
    type Edge: Copy;

    fn add_vertex(&mut self, timestamp: i64) -> Result<Self::Vertex, BranchGraphError>;
    fn add_edge(
        &mut self,
        source: Self::Vertex,
        target: Self::Vertex,
    ) -> Result<Self::Edge, BranchGraphError>;
    fn remove_vertex(&mut self, vertex: Self::Vertex) -> Result<(), BranchGraphError>;
    fn remove_edge(&mut self, edge: Self::Edge) -> Result<(), BranchGraphError>;
}

impl<G> GraphMutation for &mut G
where
    G: GraphMutation + ?Sized,
{
    type Vertex = G::Vertex;
    type Edge = G::Edge;

    fn add_vertex(&mut self, timestamp: i64) -> Result<Self::Vertex, BranchGraphError> {
        (**self).add_vertex(timestamp)
    }

    fn add_edge(
        &mut self,
        source: Self::Vertex,
        target: Self::Vertex,
    ) -> Result<Self::Edge, BranchGraphError> {
        (**self).add_edge(source, target)
    }

    fn remove_vertex(&mut self, vertex: Self::Vertex) -> Result<(), BranchGraphError> {
        (**self).remove_vertex(vertex)
    }

    fn remove_edge(&mut self, edge: Self::Edge) -> Result<(), BranchGraphError> {
        (**self).remove_edge(edge)
    }
}
