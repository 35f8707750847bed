//! Incremental maintenance of the branch graph.
//!
//! The branch graph collapses every maximal chain of linked vertices with one
//! incoming and one outgoing edge into a single branch edge. It is kept up to
//! date by reacting to the linked graph's events, one at a time, using two
//! local operations:
//!
//! - **split** promotes an interior linked vertex to a branch vertex, cutting
//!   its branch edge in two;
//! - **fuse** collapses a branch vertex left with exactly one incoming and one
//!   outgoing branch edge, joining the two into one. Loops are never fused, so
//!   a ring keeps one branch vertex and one self-loop branch edge.
//!
//! Walks along a chain only follow *tracked* edges, i.e. edges already present
//! in the edge table. An edge that is being added is untracked until it has
//! been given its own branch edge, and an edge being removed is untracked as
//! soon as its branch edge is gone, so neither disturbs a walk.

use tracing::{debug, info, trace, warn};

use crate::config::BranchGraphConfig;
use crate::errors::BranchGraphError;
use crate::linked::{EdgeId, GraphChangeListener, GraphListener, LinkedGraph, VertexId};

use super::iter::IteratorPool;
use super::membership::{MappingTables, Membership};
use super::observer::BranchGraphObserver;
use super::store::{BranchEdgeId, BranchStore, BranchVertexId};
use super::validation::Pending;

/// Derived graph of branches over a [`LinkedGraph`].
///
/// A `BranchGraph` is a [`GraphListener`]: feed it every event of the linked
/// graph, in order, usually by wrapping both in a
/// [`ListenableGraph`](crate::ListenableGraph). It cannot be mutated any other
/// way; the [`GraphMutation`](crate::GraphMutation) entry points all return
/// [`BranchGraphError::ReadOnly`].
///
/// Branch vertex and branch edge ids change whenever a split or fuse touches
/// them. Look them up again after every edit instead of keeping them.
pub struct BranchGraph {
    pub(crate) config: BranchGraphConfig,
    pub(crate) store: BranchStore,
    pub(crate) tables: MappingTables,
    pub(crate) pool: IteratorPool,
    observers: Vec<Box<dyn BranchGraphObserver>>,
    pending_change: bool,
    poisoned: Option<String>,
}

impl Default for BranchGraph {
    fn default() -> Self {
        Self::new(BranchGraphConfig::default())
    }
}

impl BranchGraph {
    pub fn new(config: BranchGraphConfig) -> Self {
        let vertices = config.reserve_vertices.unwrap_or(0);
        let edges = config.reserve_edges.unwrap_or(0);
        Self {
            store: BranchStore::with_capacity(vertices, edges),
            tables: MappingTables::with_capacity(vertices, edges),
            pool: IteratorPool::new(config.iterator_pool_limit),
            observers: Vec::new(),
            pending_change: false,
            poisoned: None,
            config,
        }
    }

    pub fn config(&self) -> &BranchGraphConfig {
        &self.config
    }

    pub fn add_observer(&mut self, observer: Box<dyn BranchGraphObserver>) {
        self.observers.push(observer);
    }

    /// Whether a fatal error has left this instance out of sync with its
    /// linked graph. Only a rebuild clears the flag.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Discards all state and replays the whole linked graph.
    ///
    /// Every vertex is added first, then every edge, both in the linked
    /// graph's iteration order. The result is the same as feeding those
    /// events one by one.
    pub fn rebuild(&mut self, graph: &LinkedGraph) -> Result<(), BranchGraphError> {
        self.store.clear();
        self.tables.clear();
        self.poisoned = None;
        self.pending_change = false;
        let vertices = self
            .config
            .reserve_vertices
            .unwrap_or(0)
            .max(graph.vertex_count());
        let edges = self.config.reserve_edges.unwrap_or(0).max(graph.edge_count());
        self.store.reserve(vertices, edges);
        self.tables.reserve(vertices, edges);

        let replay = graph
            .vertices()
            .try_for_each(|vertex| self.on_vertex_added(graph, vertex))
            .and_then(|()| {
                graph
                    .edges()
                    .try_for_each(|edge| self.on_edge_added(graph, edge))
            });
        if let Err(err) = replay {
            self.poison("graph_rebuilt", &err);
            return Err(err);
        }

        info!(
            linked_vertices = graph.vertex_count(),
            linked_edges = graph.edge_count(),
            branch_vertices = self.store.vertex_count(),
            branch_edges = self.store.edge_count(),
            "branch graph rebuilt"
        );
        for observer in &self.observers {
            observer.graph_rebuilt();
        }
        Ok(())
    }

    fn poison(&mut self, event: &str, err: &BranchGraphError) {
        warn!(event, error = %err, "branch graph poisoned");
        self.poisoned = Some(format!("{event}: {err}"));
    }

    /// Runs one incremental handler with the poisoning and verification policy.
    fn apply<F>(
        &mut self,
        event: &'static str,
        graph: &LinkedGraph,
        pending: Pending,
        handler: F,
    ) -> Result<(), BranchGraphError>
    where
        F: FnOnce(&mut Self, &LinkedGraph) -> Result<(), BranchGraphError>,
    {
        if let Some(reason) = &self.poisoned {
            return Err(BranchGraphError::poisoned(reason.clone()));
        }
        let mut result = handler(self, graph);
        if result.is_ok() && self.config.verify_after_edit {
            result = self.verify_with(graph, pending);
        }
        match result {
            Ok(()) => {
                self.pending_change = true;
                Ok(())
            }
            Err(err) => {
                if err.is_fatal() {
                    self.poison(event, &err);
                }
                Err(err)
            }
        }
    }

    fn on_vertex_added(
        &mut self,
        graph: &LinkedGraph,
        vertex: VertexId,
    ) -> Result<(), BranchGraphError> {
        if !graph.contains_vertex(vertex) {
            return Err(BranchGraphError::not_found(format!("vertex {vertex:?}")));
        }
        if let Some(existing) = self.tables.membership(vertex) {
            return Err(BranchGraphError::contract(format!(
                "vertex {vertex:?} is already tracked as {existing:?}"
            )));
        }
        let branch_vertex = self.store.add_vertex(vertex);
        self.tables.set_extremity(vertex, branch_vertex);
        Ok(())
    }

    fn on_vertex_removed(&mut self, vertex: VertexId) -> Result<(), BranchGraphError> {
        let branch_vertex = match self.tables.membership(vertex) {
            Some(Membership::Extremity(branch_vertex)) => branch_vertex,
            Some(Membership::Interior(branch_edge)) => {
                return Err(BranchGraphError::ordering(format!(
                    "vertex {vertex:?} removed while interior to {branch_edge:?}"
                )));
            }
            None => {
                return Err(BranchGraphError::ordering(format!(
                    "vertex {vertex:?} removed but never added"
                )));
            }
        };
        let record = self.store.vertex(branch_vertex).ok_or_else(|| {
            BranchGraphError::contract(format!(
                "vertex {vertex:?} maps to missing branch vertex {branch_vertex:?}"
            ))
        })?;
        if !record.incoming.is_empty() || !record.outgoing.is_empty() {
            return Err(BranchGraphError::ordering(format!(
                "vertex {vertex:?} removed with {} incoming and {} outgoing branch edges",
                record.incoming.len(),
                record.outgoing.len()
            )));
        }
        self.store.remove_vertex(branch_vertex)?;
        self.tables.forget_vertex(vertex);
        Ok(())
    }

    fn on_edge_added(&mut self, graph: &LinkedGraph, edge: EdgeId) -> Result<(), BranchGraphError> {
        let (source, target) = graph
            .endpoints(edge)
            .ok_or_else(|| BranchGraphError::not_found(format!("edge {edge:?}")))?;
        if let Some(existing) = self.tables.branch_edge_of(edge) {
            return Err(BranchGraphError::contract(format!(
                "edge {edge:?} is already tracked by {existing:?}"
            )));
        }

        let source_branch = self.extremity_or_split(graph, source)?;
        let target_branch = self.extremity_or_split(graph, target)?;
        let branch_edge = self.store.add_edge(source_branch, target_branch, edge)?;
        self.tables.set_edge(edge, branch_edge);

        // A split endpoint ends up with two edges on one side and never fuses;
        // an existing extremity may have just become a pass-through.
        self.check_fuse(graph, source_branch)?;
        self.check_fuse(graph, target_branch)?;
        Ok(())
    }

    fn on_edge_removed(
        &mut self,
        graph: &LinkedGraph,
        edge: EdgeId,
    ) -> Result<(), BranchGraphError> {
        let (source, target) = graph
            .endpoints(edge)
            .ok_or_else(|| BranchGraphError::not_found(format!("edge {edge:?}")))?;

        let source_branch = self.extremity_or_split(graph, source)?;
        let target_branch = self.extremity_or_split(graph, target)?;

        // With both endpoints promoted, the edge is a branch of its own.
        let branch_edge = self.tables.branch_edge_of(edge).ok_or_else(|| {
            BranchGraphError::contract(format!("edge {edge:?} is not tracked"))
        })?;
        let record = self.store.edge(branch_edge).ok_or_else(|| {
            BranchGraphError::contract(format!(
                "edge {edge:?} maps to missing branch edge {branch_edge:?}"
            ))
        })?;
        if record.source != source_branch
            || record.target != target_branch
            || record.representative != edge
        {
            return Err(BranchGraphError::malformed_chain(format!(
                "edge {edge:?} is not alone in {branch_edge:?} after splitting its endpoints"
            )));
        }
        self.store.remove_edge(branch_edge)?;
        self.tables.forget_edge(edge);

        if self.config.fuse_on_edge_removal {
            self.check_fuse(graph, source_branch)?;
            self.check_fuse(graph, target_branch)?;
        }
        Ok(())
    }

    fn extremity_or_split(
        &mut self,
        graph: &LinkedGraph,
        vertex: VertexId,
    ) -> Result<BranchVertexId, BranchGraphError> {
        match self.tables.membership(vertex) {
            Some(Membership::Extremity(branch_vertex)) => Ok(branch_vertex),
            Some(Membership::Interior(_)) => self.split(graph, vertex),
            None => Err(BranchGraphError::contract(format!(
                "vertex {vertex:?} is not tracked"
            ))),
        }
    }

    /// The single tracked outgoing edge of a vertex on a chain.
    pub(crate) fn tracked_successor(
        &self,
        graph: &LinkedGraph,
        vertex: VertexId,
    ) -> Result<EdgeId, BranchGraphError> {
        let mut tracked = graph
            .outgoing(vertex)
            .iter()
            .copied()
            .filter(|&edge| self.tables.is_tracked(edge));
        match (tracked.next(), tracked.next()) {
            (Some(edge), None) => Ok(edge),
            (None, _) => Err(BranchGraphError::malformed_chain(format!(
                "chain vertex {vertex:?} has no outgoing edge"
            ))),
            (Some(_), Some(_)) => Err(BranchGraphError::malformed_chain(format!(
                "chain vertex {vertex:?} has {} outgoing edges",
                graph.out_degree(vertex)
            ))),
        }
    }

    /// Promotes an interior vertex to a branch vertex.
    ///
    /// The branch edge `src -> dst` holding `vertex` is replaced by
    /// `src -> new` (same representative) and `new -> dst` (represented by the
    /// vertex's own outgoing edge).
    pub(crate) fn split(
        &mut self,
        graph: &LinkedGraph,
        vertex: VertexId,
    ) -> Result<BranchVertexId, BranchGraphError> {
        let branch_edge = match self.tables.membership(vertex) {
            Some(Membership::Interior(branch_edge)) => branch_edge,
            other => {
                return Err(BranchGraphError::contract(format!(
                    "cannot split {vertex:?}: not interior ({other:?})"
                )));
            }
        };
        let record = *self.store.edge(branch_edge).ok_or_else(|| {
            BranchGraphError::contract(format!(
                "{vertex:?} is interior to missing branch edge {branch_edge:?}"
            ))
        })?;
        let after_head = self.linked_target(graph, record.representative)?;
        let target_head = self.head(record.target)?;
        let successor = self.tracked_successor(graph, vertex)?;
        let after_vertex = self.linked_target(graph, successor)?;

        self.store.remove_edge(branch_edge)?;
        let promoted = self.store.add_vertex(vertex);
        self.tables.set_extremity(vertex, promoted);

        let upstream = self
            .store
            .add_edge(record.source, promoted, record.representative)?;
        self.tables.set_edge(record.representative, upstream);
        self.link_branch_edge(graph, after_head, vertex, upstream)?;

        let downstream = self.store.add_edge(promoted, record.target, successor)?;
        self.tables.set_edge(successor, downstream);
        self.link_branch_edge(graph, after_vertex, target_head, downstream)?;

        debug!(
            vertex = ?vertex,
            removed = ?branch_edge,
            branch_vertex = ?promoted,
            upstream = ?upstream,
            downstream = ?downstream,
            "split branch edge"
        );
        Ok(promoted)
    }

    /// Collapses `branch_vertex` into its neighbours if it is a pass-through.
    ///
    /// Returns whether a fuse happened. Vertices that are gone, have any other
    /// degree profile, or carry a self-loop are left untouched.
    pub(crate) fn check_fuse(
        &mut self,
        graph: &LinkedGraph,
        branch_vertex: BranchVertexId,
    ) -> Result<bool, BranchGraphError> {
        let Some(record) = self.store.vertex(branch_vertex) else {
            return Ok(false);
        };
        if record.incoming.len() != 1 || record.outgoing.len() != 1 {
            return Ok(false);
        }
        let (edge_in, edge_out) = (record.incoming[0], record.outgoing[0]);
        if edge_in == edge_out {
            return Ok(false);
        }
        let linked = record.linked;

        let incoming = *self.store.edge(edge_in).ok_or_else(|| {
            BranchGraphError::contract(format!("missing branch edge {edge_in:?}"))
        })?;
        let outgoing = *self.store.edge(edge_out).ok_or_else(|| {
            BranchGraphError::contract(format!("missing branch edge {edge_out:?}"))
        })?;
        let after_vertex = self.linked_target(graph, incoming.representative)?;
        let target_head = self.head(outgoing.target)?;

        self.store.remove_edge(edge_in)?;
        self.store.remove_edge(edge_out)?;
        self.store.remove_vertex(branch_vertex)?;

        let merged = self
            .store
            .add_edge(incoming.source, outgoing.target, incoming.representative)?;
        self.tables.set_edge(incoming.representative, merged);
        self.link_branch_edge(graph, after_vertex, target_head, merged)?;

        debug!(
            vertex = ?linked,
            branch_vertex = ?branch_vertex,
            merged = ?merged,
            "fused branch vertex"
        );
        Ok(true)
    }

    /// Assigns every linked vertex from `begin` up to, but excluding, `end`
    /// to `branch_edge`, together with the edge leaving it.
    fn link_branch_edge(
        &mut self,
        graph: &LinkedGraph,
        begin: VertexId,
        end: VertexId,
        branch_edge: BranchEdgeId,
    ) -> Result<(), BranchGraphError> {
        let limit = graph.vertex_count();
        let mut current = begin;
        let mut steps = 0;
        while current != end {
            if steps >= limit {
                return Err(BranchGraphError::malformed_chain(format!(
                    "walk from {begin:?} never reached {end:?}"
                )));
            }
            let edge = self.tracked_successor(graph, current)?;
            self.tables.set_interior(current, branch_edge);
            self.tables.set_edge(edge, branch_edge);
            current = self.linked_target(graph, edge)?;
            steps += 1;
        }
        Ok(())
    }

    fn linked_target(&self, graph: &LinkedGraph, edge: EdgeId) -> Result<VertexId, BranchGraphError> {
        graph.target(edge).ok_or_else(|| {
            BranchGraphError::contract(format!("linked edge {edge:?} no longer exists"))
        })
    }

    fn head(&self, branch_vertex: BranchVertexId) -> Result<VertexId, BranchGraphError> {
        self.store
            .vertex(branch_vertex)
            .map(|record| record.linked)
            .ok_or_else(|| {
                BranchGraphError::contract(format!("missing branch vertex {branch_vertex:?}"))
            })
    }
}

impl GraphListener for BranchGraph {
    fn graph_rebuilt(&mut self, graph: &LinkedGraph) -> Result<(), BranchGraphError> {
        self.rebuild(graph)
    }

    fn vertex_added(&mut self, graph: &LinkedGraph, vertex: VertexId) -> Result<(), BranchGraphError> {
        trace!(vertex = ?vertex, "vertex added");
        self.apply("vertex_added", graph, Pending::Nothing, |branch, graph| {
            branch.on_vertex_added(graph, vertex)
        })
    }

    fn vertex_removed(
        &mut self,
        graph: &LinkedGraph,
        vertex: VertexId,
    ) -> Result<(), BranchGraphError> {
        trace!(vertex = ?vertex, "vertex removed");
        self.apply(
            "vertex_removed",
            graph,
            Pending::Vertex(vertex),
            |branch, _| branch.on_vertex_removed(vertex),
        )
    }

    fn edge_added(&mut self, graph: &LinkedGraph, edge: EdgeId) -> Result<(), BranchGraphError> {
        trace!(edge = ?edge, "edge added");
        self.apply("edge_added", graph, Pending::Nothing, |branch, graph| {
            branch.on_edge_added(graph, edge)
        })
    }

    fn edge_removed(&mut self, graph: &LinkedGraph, edge: EdgeId) -> Result<(), BranchGraphError> {
        trace!(edge = ?edge, "edge removed");
        self.apply("edge_removed", graph, Pending::Edge(edge), |branch, graph| {
            branch.on_edge_removed(graph, edge)
        })
    }
}

impl GraphChangeListener for BranchGraph {
    fn graph_changed(&mut self) {
        if !self.pending_change {
            return;
        }
        self.pending_change = false;
        for observer in &self.observers {
            observer.graph_changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linked::ListenableGraph;

    fn chain(length: usize) -> (ListenableGraph<BranchGraph>, Vec<VertexId>) {
        let mut graph = ListenableGraph::new(BranchGraph::new(BranchGraphConfig::checked()));
        let vertices: Vec<_> = (0..length)
            .map(|t| graph.add_vertex(t as i64).unwrap())
            .collect();
        for pair in vertices.windows(2) {
            graph.add_edge(pair[0], pair[1]).unwrap();
        }
        (graph, vertices)
    }

    #[test]
    fn test_split_then_fuse_restores_footprint() {
        let (graph, vertices) = chain(6);
        let (linked, mut branch) = graph.into_parts();
        let before = branch.layout(&linked);

        let promoted = branch.split(&linked, vertices[3]).unwrap();
        assert_eq!(branch.branch_vertex_count(), 3);
        assert_eq!(branch.branch_edge_count(), 2);
        assert_eq!(branch.branch_vertex(vertices[3]), Some(promoted));
        branch.verify(&linked).unwrap();

        assert!(branch.check_fuse(&linked, promoted).unwrap());
        let head = branch.branch_vertex(vertices[0]).unwrap();
        let tail = branch.branch_vertex(vertices[5]).unwrap();
        assert!(!branch.check_fuse(&linked, head).unwrap());
        assert!(!branch.check_fuse(&linked, tail).unwrap());

        branch.verify(&linked).unwrap();
        assert_eq!(branch.layout(&linked), before);
    }

    #[test]
    fn test_split_rejects_extremity() {
        let (graph, vertices) = chain(3);
        let (linked, mut branch) = graph.into_parts();
        let err = branch.split(&linked, vertices[0]).unwrap_err();
        assert!(matches!(err, BranchGraphError::ContractViolation(_)));
    }

    #[test]
    fn test_split_next_to_head_leaves_empty_upstream() {
        let (graph, vertices) = chain(4);
        let (linked, mut branch) = graph.into_parts();
        let promoted = branch.split(&linked, vertices[1]).unwrap();
        let upstream = branch.incoming_branch_edges(promoted)[0];
        let downstream = branch.outgoing_branch_edges(promoted)[0];
        assert_eq!(
            branch.linked_edge(upstream),
            linked.find_edge(vertices[0], vertices[1])
        );
        assert_eq!(branch.interior_branch_edge(vertices[1]), None);
        assert_eq!(branch.interior_branch_edge(vertices[2]), Some(downstream));
        branch.verify(&linked).unwrap();
    }

    #[test]
    fn test_fuse_ignores_ring_loop() {
        let mut graph = ListenableGraph::new(BranchGraph::new(BranchGraphConfig::checked()));
        let a = graph.add_vertex(0).unwrap();
        let b = graph.add_vertex(1).unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, a).unwrap();
        let (linked, mut branch) = graph.into_parts();
        assert_eq!(branch.branch_vertex_count(), 1);
        let only = branch.branch_vertices().next().unwrap();
        assert!(!branch.check_fuse(&linked, only).unwrap());
        assert_eq!(branch.branch_edge_count(), 1);
    }

    #[test]
    fn test_poisoned_graph_rejects_events_until_rebuilt() {
        let (graph, vertices) = chain(3);
        let (mut linked, mut branch) = graph.into_parts();
        let err = branch.vertex_removed(&linked, vertices[1]).unwrap_err();
        assert!(matches!(err, BranchGraphError::OrderingViolation(_)));
        assert!(branch.is_poisoned());

        let extra = linked.add_vertex(9);
        let err = branch.vertex_added(&linked, extra).unwrap_err();
        assert!(matches!(err, BranchGraphError::Poisoned(_)));

        branch.rebuild(&linked).unwrap();
        assert!(!branch.is_poisoned());
        assert!(branch.branch_vertex(extra).is_some());
        branch.verify(&linked).unwrap();
    }

    #[test]
    fn test_split_fails_on_chain_cut_behind_its_back() {
        let (graph, vertices) = chain(5);
        let (mut linked, mut branch) = graph.into_parts();
        let cut = linked.find_edge(vertices[2], vertices[3]).unwrap();
        linked.remove_edge(cut).unwrap();

        let err = branch.split(&linked, vertices[1]).unwrap_err();
        assert!(matches!(err, BranchGraphError::MalformedChain(_)));
    }

    #[test]
    fn test_tracked_successor_rejects_fork_on_chain() {
        let (graph, vertices) = chain(4);
        let (mut linked, mut branch) = graph.into_parts();
        let extra = linked.add_edge(vertices[1], vertices[3]).unwrap();
        let be = branch.branch_edges().next().unwrap();
        branch.tables.set_edge(extra, be);

        let err = branch.tracked_successor(&linked, vertices[1]).unwrap_err();
        assert!(matches!(err, BranchGraphError::MalformedChain(_)));
    }

    #[test]
    fn test_link_walk_stops_at_vertex_count() {
        let mut graph = ListenableGraph::new(BranchGraph::new(BranchGraphConfig::checked()));
        let ring: Vec<_> = (0..3).map(|t| graph.add_vertex(t).unwrap()).collect();
        graph.add_edge(ring[0], ring[1]).unwrap();
        graph.add_edge(ring[1], ring[2]).unwrap();
        graph.add_edge(ring[2], ring[0]).unwrap();
        let outside = graph.add_vertex(3).unwrap();
        let (linked, mut branch) = graph.into_parts();
        let loop_edge = branch.branch_edges().next().unwrap();

        // The ring never reaches `outside`, so only the step limit ends the walk.
        let err = branch
            .link_branch_edge(&linked, ring[1], outside, loop_edge)
            .unwrap_err();
        assert!(matches!(err, BranchGraphError::MalformedChain(_)));
    }

    #[test]
    fn test_malformed_chain_in_event_poisons() {
        let (graph, vertices) = chain(5);
        let (mut linked, mut branch) = graph.into_parts();
        let cut = linked.find_edge(vertices[2], vertices[3]).unwrap();
        linked.remove_edge(cut).unwrap();
        let shortcut = linked.add_edge(vertices[1], vertices[4]).unwrap();

        let err = branch.edge_added(&linked, shortcut).unwrap_err();
        assert!(matches!(err, BranchGraphError::MalformedChain(_)));
        assert!(branch.is_poisoned());
        let err = branch.edge_removed(&linked, shortcut).unwrap_err();
        assert!(matches!(err, BranchGraphError::Poisoned(_)));

        branch.rebuild(&linked).unwrap();
        assert!(!branch.is_poisoned());
        branch.verify(&linked).unwrap();
    }
}
