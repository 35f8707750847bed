//! Configuration for branch graph maintenance.
//!
//! Every option is either a capacity hint or opt-in behaviour; the defaults
//! maintain the branch graph with no extra checks.

/// Default number of idle cursors kept per iterator kind.
pub const DEFAULT_ITERATOR_POOL_LIMIT: usize = 16;

/// Options controlling how a [`BranchGraph`](crate::BranchGraph) maintains itself.
///
/// # Default Configuration
///
/// ```rust
/// use branchgraph::BranchGraphConfig;
/// let config = BranchGraphConfig::default();
/// assert!(config.reserve_vertices.is_none());
/// assert!(config.reserve_edges.is_none());
/// assert!(!config.verify_after_edit);
/// assert!(!config.fuse_on_edge_removal);
/// assert_eq!(config.iterator_pool_limit, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchGraphConfig {
    /// Expected number of linked vertices.
    ///
    /// **Default:** `None`
    ///
    /// Pre-sizes the vertex mapping table and the branch vertex arena. This is
    /// a hint, not a limit.
    pub reserve_vertices: Option<usize>,

    /// Expected number of linked edges.
    ///
    /// **Default:** `None`
    ///
    /// Pre-sizes the edge mapping table and the branch edge arena.
    pub reserve_edges: Option<usize>,

    /// Run the full invariant check after every incremental event.
    ///
    /// **Default:** `false`
    ///
    /// Each check walks every branch, so an edit costs `O(V + E)` instead of
    /// `O(branch length)`. A failing check rejects the event and poisons the
    /// branch graph until the next rebuild.
    pub verify_after_edit: bool,

    /// Try to fuse both endpoints after an edge removal.
    ///
    /// **Default:** `false`
    ///
    /// Removing an edge can leave a branch vertex with exactly one incoming and
    /// one outgoing branch edge. With the default the vertex stays a branch
    /// vertex, so the layout can differ from what a full rebuild of the same
    /// linked graph produces. Enabling this collapses such vertices immediately.
    pub fuse_on_edge_removal: bool,

    /// Maximum number of idle cursors retained per iterator kind.
    ///
    /// **Default:** [`DEFAULT_ITERATOR_POOL_LIMIT`]
    ///
    /// Cursors returned beyond this limit are dropped. `0` disables pooling.
    pub iterator_pool_limit: usize,
}

impl Default for BranchGraphConfig {
    fn default() -> Self {
        Self {
            reserve_vertices: None,
            reserve_edges: None,
            verify_after_edit: false,
            fuse_on_edge_removal: false,
            iterator_pool_limit: DEFAULT_ITERATOR_POOL_LIMIT,
        }
    }
}

impl BranchGraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for tests and debugging: verifies after each edit.
    pub fn checked() -> Self {
        Self {
            verify_after_edit: true,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, vertices: usize, edges: usize) -> Self {
        self.reserve_vertices = Some(vertices);
        self.reserve_edges = Some(edges);
        self
    }

    pub fn with_verify_after_edit(mut self, enabled: bool) -> Self {
        self.verify_after_edit = enabled;
        self
    }

    pub fn with_fuse_on_edge_removal(mut self, enabled: bool) -> Self {
        self.fuse_on_edge_removal = enabled;
        self
    }

    pub fn with_iterator_pool_limit(mut self, limit: usize) -> Self {
        self.iterator_pool_limit = limit;
        self
    }
}
