//! Downstream notifications raised by the branch graph itself.

/// Observer of a [`BranchGraph`](crate::BranchGraph).
///
/// `graph_rebuilt` fires once per full rebuild. `graph_changed` fires once per
/// batch of incremental edits, when the batch is closed with
/// [`ListenableGraph::notify_graph_changed`](crate::ListenableGraph::notify_graph_changed)
/// and at least one edit reached the branch graph since the last signal.
pub trait BranchGraphObserver: Send + Sync {
    fn graph_rebuilt(&self) {}
    fn graph_changed(&self) {}
}
