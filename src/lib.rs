//! Incrementally maintained branch graph over a directed, time-stamped graph.
//!
//! branchgraph keeps a compressed view of a [`LinkedGraph`] in which every
//! maximal chain of pass-through vertices (one incoming and one outgoing edge)
//! collapses into a single branch edge. The view is updated in place on every
//! vertex or edge event instead of being recomputed.
//!
//! # Features
//!
//! - **Incremental maintenance**: each event is handled with local split and
//!   fuse operations, never a full rescan
//! - **O(1) queries**: linked-to-branch and branch-to-linked lookups are table hits
//! - **Pooled iteration**: walks over the linked elements of a branch reuse cursors
//! - **Bulk path**: pause the listener during a large load, then rebuild once
//! - **Diagnostics**: invariant checking, counters and a JSON layout export
//!
//! # Quick Start
//!
//! ```rust
//! use branchgraph::{BranchGraphConfig, BranchTrackedGraph};
//!
//! let mut graph = BranchTrackedGraph::with_config(BranchGraphConfig::checked());
//! let a = graph.add_vertex(0)?;
//! let b = graph.add_vertex(1)?;
//! let c = graph.add_vertex(2)?;
//! graph.add_edge(a, b)?;
//! graph.add_edge(b, c)?;
//!
//! // a -> b -> c is one branch; b is buried inside it
//! let branches = graph.branches();
//! assert_eq!(branches.branch_vertex_count(), 2);
//! assert_eq!(branches.branch_edge_count(), 1);
//! let branch = branches.interior_branch_edge(b).unwrap();
//! assert_eq!(graph.vertex_branch_iter(branch).collect::<Vec<_>>(), vec![b]);
//! # Ok::<(), branchgraph::BranchGraphError>(())
//! ```
//!
//! # Public API Organization
//!
//! ## Core Types
//! - [`BranchGraph`] - the derived graph and its maintenance engine
//! - [`LinkedGraph`] - the underlying vertex/edge storage
//! - [`ListenableGraph`] - a linked graph that reports every edit to a [`GraphListener`]
//! - [`BranchTrackedGraph`] - a linked graph with a branch graph attached
//!
//! ## Configuration
//! - [`BranchGraphConfig`] - capacity hints and opt-in checks
//!
//! ## Operations
//! - [`BranchGraph::branch_vertex()`], [`BranchGraph::interior_branch_edge()`],
//!   [`BranchGraph::branch_edge()`], [`BranchGraph::linked_vertex()`],
//!   [`BranchGraph::linked_edge()`] - lookups in both directions
//! - [`BranchGraph::vertex_branch_iter()`], [`BranchGraph::edge_branch_iter()`] - local walks
//! - [`BranchGraph::verify()`], [`BranchGraph::stats()`], [`BranchGraph::layout()`] - diagnostics
//!
//! ## Utilities
//! - [`BranchGraphError`] - error handling
//! - [`GraphMutation`] - the mutation entry points shared by every graph type

pub mod arena;
pub mod branch;
pub mod config;
pub mod errors;
pub mod linked;
pub mod mutation;

pub use crate::branch::{
    BranchEdgeId, BranchEdgeIter, BranchElement, BranchGraph, BranchGraphObserver,
    BranchGraphStats, BranchIter, BranchLayout, BranchPath, BranchTrackedGraph, BranchVertexId,
    BranchVertexIter, EdgeCursor, IteratorPool, Membership, PoolStats, PooledCursor, VertexCursor,
};
pub use crate::config::{BranchGraphConfig, DEFAULT_ITERATOR_POOL_LIMIT};
pub use crate::errors::BranchGraphError;
pub use crate::linked::{
    EdgeId, GraphChangeListener, GraphListener, LinkedGraph, ListenableGraph, VertexId,
};
pub use crate::mutation::GraphMutation;
