//! Walks over the linked vertices and edges a branch element stands for.
//!
//! Cursors are recycled through an [`IteratorPool`] owned by the branch graph.
//! A [`BranchIter`] borrows a cursor from the pool and hands it back when it is
//! dropped or explicitly [released](BranchIter::release), so repeated
//! traversals do not allocate. The iterator borrows the branch graph, so the
//! graph cannot change underneath a traversal.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::linked::{EdgeId, LinkedGraph, VertexId};

use super::engine::BranchGraph;
use super::store::{BranchEdgeId, BranchVertexId};

/// A branch vertex or a branch edge; the starting point of a local walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchElement {
    Vertex(BranchVertexId),
    Edge(BranchEdgeId),
}

impl From<BranchVertexId> for BranchElement {
    fn from(vertex: BranchVertexId) -> Self {
        BranchElement::Vertex(vertex)
    }
}

impl From<BranchEdgeId> for BranchElement {
    fn from(edge: BranchEdgeId) -> Self {
        BranchElement::Edge(edge)
    }
}

/// Cursor allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub created: u64,
    pub reused: u64,
    pub idle_vertex_cursors: usize,
    pub idle_edge_cursors: usize,
}

/// Idle cursors, one shelf per iterator kind.
pub struct IteratorPool {
    vertex: Mutex<Vec<VertexCursor>>,
    edge: Mutex<Vec<EdgeCursor>>,
    created: AtomicU64,
    reused: AtomicU64,
    limit: usize,
}

impl IteratorPool {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            vertex: Mutex::new(Vec::new()),
            edge: Mutex::new(Vec::new()),
            created: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            limit,
        }
    }

    fn take<C: PooledCursor>(&self) -> C {
        let recycled = C::shelf(self).lock().pop();
        match recycled {
            Some(cursor) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                cursor
            }
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                C::default()
            }
        }
    }

    fn give_back<C: PooledCursor>(&self, cursor: C) {
        let mut shelf = C::shelf(self).lock();
        if shelf.len() < self.limit {
            shelf.push(cursor);
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            idle_vertex_cursors: self.vertex.lock().len(),
            idle_edge_cursors: self.edge.lock().len(),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::VertexCursor {}
    impl Sealed for super::EdgeCursor {}
}

/// A resettable walk position that can live in an [`IteratorPool`].
pub trait PooledCursor: sealed::Sealed + Default + Send {
    type Item;

    #[doc(hidden)]
    fn shelf(pool: &IteratorPool) -> &Mutex<Vec<Self>>;
    #[doc(hidden)]
    fn seek(&mut self, branch: &BranchGraph, graph: &LinkedGraph, element: BranchElement);
    #[doc(hidden)]
    fn rewind(&mut self);
    #[doc(hidden)]
    fn advance(&mut self, branch: &BranchGraph, graph: &LinkedGraph) -> Option<Self::Item>;
}

/// Position in a walk over linked vertices.
///
/// Over a branch edge it yields the interior vertices from the source side to
/// the target side; over a branch vertex it yields the vertex's linked head.
#[derive(Clone, Debug, Default)]
pub struct VertexCursor {
    origin: Option<VertexId>,
    next: Option<VertexId>,
    end: Option<VertexId>,
    single: bool,
    steps: usize,
}

impl PooledCursor for VertexCursor {
    type Item = VertexId;

    fn shelf(pool: &IteratorPool) -> &Mutex<Vec<Self>> {
        &pool.vertex
    }

    fn seek(&mut self, branch: &BranchGraph, graph: &LinkedGraph, element: BranchElement) {
        *self = Self::default();
        match element {
            BranchElement::Vertex(vertex) => {
                self.origin = branch.linked_vertex(vertex);
                self.single = true;
            }
            BranchElement::Edge(edge) => {
                let Some(record) = branch.store.edge(edge) else {
                    return;
                };
                let first = graph.target(record.representative);
                let end = branch.linked_vertex(record.target);
                if first != end {
                    self.origin = first;
                }
                self.end = end;
            }
        }
        self.next = self.origin;
    }

    fn rewind(&mut self) {
        self.next = self.origin;
        self.steps = 0;
    }

    fn advance(&mut self, branch: &BranchGraph, graph: &LinkedGraph) -> Option<VertexId> {
        let current = self.next?;
        self.steps += 1;
        if self.single || self.steps >= graph.vertex_count() {
            self.next = None;
            return Some(current);
        }
        self.next = branch
            .tracked_successor(graph, current)
            .ok()
            .and_then(|edge| graph.target(edge))
            .filter(|&vertex| Some(vertex) != self.end);
        Some(current)
    }
}

/// Position in a walk over linked edges.
///
/// Over a branch edge it yields every linked edge of the branch, starting with
/// the representative; over a branch vertex it yields nothing.
#[derive(Clone, Debug, Default)]
pub struct EdgeCursor {
    origin: Option<EdgeId>,
    next: Option<EdgeId>,
    end: Option<VertexId>,
    steps: usize,
}

impl PooledCursor for EdgeCursor {
    type Item = EdgeId;

    fn shelf(pool: &IteratorPool) -> &Mutex<Vec<Self>> {
        &pool.edge
    }

    fn seek(&mut self, branch: &BranchGraph, _graph: &LinkedGraph, element: BranchElement) {
        *self = Self::default();
        if let BranchElement::Edge(edge) = element {
            if let Some(record) = branch.store.edge(edge) {
                self.origin = Some(record.representative);
                self.end = branch.linked_vertex(record.target);
            }
        }
        self.next = self.origin;
    }

    fn rewind(&mut self) {
        self.next = self.origin;
        self.steps = 0;
    }

    fn advance(&mut self, branch: &BranchGraph, graph: &LinkedGraph) -> Option<EdgeId> {
        let current = self.next?;
        self.steps += 1;
        self.next = match graph.target(current) {
            Some(vertex) if Some(vertex) != self.end && self.steps <= graph.vertex_count() => {
                branch.tracked_successor(graph, vertex).ok()
            }
            _ => None,
        };
        Some(current)
    }
}

/// Lazy, restartable walk backed by a pooled cursor.
pub struct BranchIter<'a, C: PooledCursor> {
    cursor: Option<C>,
    branch: &'a BranchGraph,
    graph: &'a LinkedGraph,
}

/// Walk over the linked vertices of a branch element.
pub type BranchVertexIter<'a> = BranchIter<'a, VertexCursor>;

/// Walk over the linked edges of a branch element.
pub type BranchEdgeIter<'a> = BranchIter<'a, EdgeCursor>;

impl<'a, C: PooledCursor> BranchIter<'a, C> {
    pub(crate) fn acquire(
        branch: &'a BranchGraph,
        graph: &'a LinkedGraph,
        element: BranchElement,
    ) -> Self {
        let mut cursor = branch.pool.take::<C>();
        cursor.seek(branch, graph, element);
        Self {
            cursor: Some(cursor),
            branch,
            graph,
        }
    }

    /// Points the iterator at another branch element, reusing its cursor.
    pub fn reset(&mut self, element: BranchElement) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.seek(self.branch, self.graph, element);
        }
    }

    /// Starts the current walk over from its first item.
    pub fn restart(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.rewind();
        }
    }

    /// Returns the cursor to the pool. Dropping the iterator does the same.
    pub fn release(self) {}
}

impl<C: PooledCursor> Iterator for BranchIter<'_, C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let (branch, graph) = (self.branch, self.graph);
        self.cursor.as_mut()?.advance(branch, graph)
    }
}

impl<C: PooledCursor> Drop for BranchIter<'_, C> {
    fn drop(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            self.branch.pool.give_back(cursor);
        }
    }
}
