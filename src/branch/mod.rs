//! Branch graph: the compressed view of a linked graph in which every maximal
//! chain of pass-through vertices is a single branch edge.

mod engine;
mod iter;
mod layout;
mod membership;
mod observer;
mod query;
mod store;
mod validation;

pub use engine::BranchGraph;
pub use iter::{
    BranchEdgeIter, BranchElement, BranchIter, BranchVertexIter, EdgeCursor, IteratorPool,
    PoolStats, PooledCursor, VertexCursor,
};
pub use layout::{BranchGraphStats, BranchLayout, BranchPath};
pub use membership::Membership;
pub use observer::BranchGraphObserver;
pub use store::{BranchEdgeId, BranchVertexId};

use crate::config::BranchGraphConfig;
use crate::linked::ListenableGraph;

/// A linked graph with a branch graph kept in sync.
pub type BranchTrackedGraph = ListenableGraph<BranchGraph>;

impl ListenableGraph<BranchGraph> {
    pub fn with_config(config: BranchGraphConfig) -> Self {
        Self::new(BranchGraph::new(config))
    }

    pub fn branches(&self) -> &BranchGraph {
        self.listener()
    }

    pub fn vertex_branch_iter(&self, element: impl Into<BranchElement>) -> BranchVertexIter<'_> {
        self.listener().vertex_branch_iter(self.graph(), element)
    }

    pub fn edge_branch_iter(&self, element: impl Into<BranchElement>) -> BranchEdgeIter<'_> {
        self.listener().edge_branch_iter(self.graph(), element)
    }

    /// Checks the branch graph against the wrapped linked graph.
    pub fn verify(&self) -> Result<(), crate::errors::BranchGraphError> {
        self.listener().verify(self.graph())
    }

    pub fn layout(&self) -> BranchLayout {
        self.listener().layout(self.graph())
    }
}
