//! Read API of the branch graph. Every lookup is a table or arena access.

use crate::errors::BranchGraphError;
use crate::linked::{EdgeId, LinkedGraph, VertexId};
use crate::mutation::GraphMutation;

use super::engine::BranchGraph;
use super::iter::{
    BranchEdgeIter, BranchElement, BranchIter, BranchVertexIter, PoolStats, PooledCursor,
};
use super::membership::Membership;
use super::store::{BranchEdgeId, BranchVertexId};

impl BranchGraph {
    /// Number of live branch vertices.
    pub fn branch_vertex_count(&self) -> usize {
        self.store.vertex_count()
    }

    /// Number of live branch edges.
    pub fn branch_edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Whether `vertex` still names a live branch vertex.
    pub fn contains_branch_vertex(&self, vertex: BranchVertexId) -> bool {
        self.store.vertex(vertex).is_some()
    }

    /// Whether `edge` still names a live branch edge.
    pub fn contains_branch_edge(&self, edge: BranchEdgeId) -> bool {
        self.store.edge(edge).is_some()
    }

    /// Branch vertices in slot order.
    pub fn branch_vertices(&self) -> impl Iterator<Item = BranchVertexId> + '_ {
        self.store.vertices().map(|(id, _)| id)
    }

    /// Branch edges in slot order.
    pub fn branch_edges(&self) -> impl Iterator<Item = BranchEdgeId> + '_ {
        self.store.edges().map(|(id, _)| id)
    }

    /// Where `vertex` sits, or `None` if the vertex is not tracked.
    pub fn membership(&self, vertex: VertexId) -> Option<Membership> {
        self.tables.membership(vertex)
    }

    /// The branch vertex standing for `vertex`, if it is an extremity.
    pub fn branch_vertex(&self, vertex: VertexId) -> Option<BranchVertexId> {
        self.tables.extremity(vertex)
    }

    /// The branch edge burying `vertex`, if it is interior to a branch.
    ///
    /// Returns `None` when the vertex is itself an extremity.
    pub fn interior_branch_edge(&self, vertex: VertexId) -> Option<BranchEdgeId> {
        self.tables.interior(vertex)
    }

    /// The branch edge covering the linked `edge`.
    pub fn branch_edge(&self, edge: EdgeId) -> Option<BranchEdgeId> {
        self.tables.branch_edge_of(edge)
    }

    /// The linked vertex a branch vertex stands for.
    pub fn linked_vertex(&self, vertex: BranchVertexId) -> Option<VertexId> {
        self.store.vertex(vertex).map(|record| record.linked)
    }

    /// The representative linked edge of a branch edge: the first edge of its chain.
    pub fn linked_edge(&self, edge: BranchEdgeId) -> Option<EdgeId> {
        self.store.edge(edge).map(|record| record.representative)
    }

    /// Branch vertex the edge leaves.
    pub fn branch_edge_source(&self, edge: BranchEdgeId) -> Option<BranchVertexId> {
        self.store.edge(edge).map(|record| record.source)
    }

    /// Branch vertex the edge enters.
    pub fn branch_edge_target(&self, edge: BranchEdgeId) -> Option<BranchVertexId> {
        self.store.edge(edge).map(|record| record.target)
    }

    /// Linked heads of both ends of a branch edge, source first.
    pub fn branch_edge_linked_endpoints(&self, edge: BranchEdgeId) -> Option<(VertexId, VertexId)> {
        let record = self.store.edge(edge)?;
        Some((
            self.linked_vertex(record.source)?,
            self.linked_vertex(record.target)?,
        ))
    }

    /// Whether the branch edge starts and ends at the same branch vertex.
    pub fn is_loop(&self, edge: BranchEdgeId) -> bool {
        self.store.edge(edge).is_some_and(|record| record.is_loop())
    }

    /// Incoming branch edges in creation order; empty for an unknown vertex.
    pub fn incoming_branch_edges(&self, vertex: BranchVertexId) -> &[BranchEdgeId] {
        self.store
            .vertex(vertex)
            .map(|record| record.incoming.as_slice())
            .unwrap_or(&[])
    }

    /// Outgoing branch edges in creation order; empty for an unknown vertex.
    pub fn outgoing_branch_edges(&self, vertex: BranchVertexId) -> &[BranchEdgeId] {
        self.store
            .vertex(vertex)
            .map(|record| record.outgoing.as_slice())
            .unwrap_or(&[])
    }

    /// Timestamp of the linked vertex a branch vertex stands for.
    pub fn timepoint(&self, graph: &LinkedGraph, vertex: BranchVertexId) -> Option<i64> {
        graph.timestamp(self.linked_vertex(vertex)?)
    }

    /// Walk over the linked vertices of a branch element.
    pub fn vertex_branch_iter<'a>(
        &'a self,
        graph: &'a LinkedGraph,
        element: impl Into<BranchElement>,
    ) -> BranchVertexIter<'a> {
        BranchIter::acquire(self, graph, element.into())
    }

    /// Walk over the linked edges of a branch element.
    pub fn edge_branch_iter<'a>(
        &'a self,
        graph: &'a LinkedGraph,
        element: impl Into<BranchElement>,
    ) -> BranchEdgeIter<'a> {
        BranchIter::acquire(self, graph, element.into())
    }

    /// Hands an iterator's cursor back to the pool.
    pub fn release_iterator<C: PooledCursor>(&self, iterator: BranchIter<'_, C>) {
        iterator.release();
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

impl GraphMutation for BranchGraph {
    type Vertex = BranchVertexId;
    type Edge = BranchEdgeId;

    fn add_vertex(&mut self, _timestamp: i64) -> Result<BranchVertexId, BranchGraphError> {
        Err(BranchGraphError::read_only(
            "branch vertices are derived from the linked graph; add a linked vertex instead",
        ))
    }

    fn add_edge(
        &mut self,
        _source: BranchVertexId,
        _target: BranchVertexId,
    ) -> Result<BranchEdgeId, BranchGraphError> {
        Err(BranchGraphError::read_only(
            "branch edges are derived from the linked graph; add a linked edge instead",
        ))
    }

    fn remove_vertex(&mut self, _vertex: BranchVertexId) -> Result<(), BranchGraphError> {
        Err(BranchGraphError::read_only(
            "branch vertices are derived from the linked graph; remove a linked vertex instead",
        ))
    }

    fn remove_edge(&mut self, _edge: BranchEdgeId) -> Result<(), BranchGraphError> {
        Err(BranchGraphError::read_only(
            "branch edges are derived from the linked graph; remove a linked edge instead",
        ))
    }
}
