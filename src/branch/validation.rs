//! Consistency checks between a branch graph and its linked graph.

use crate::errors::BranchGraphError;
use crate::linked::{EdgeId, LinkedGraph, VertexId};

use super::engine::BranchGraph;
use super::membership::Membership;
use super::store::BranchVertexId;

/// Entity the linked graph still holds but the branch graph already dropped,
/// because its removal event has been handled and the removal itself is next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pending {
    Nothing,
    Vertex(VertexId),
    Edge(EdgeId),
}

impl BranchGraph {
    /// Checks every structural invariant against `graph`.
    ///
    /// - each linked vertex is either an extremity or interior, never both;
    /// - each extremity's branch degrees equal its linked degrees;
    /// - each interior vertex has exactly one incoming and one outgoing edge;
    /// - each linked edge belongs to exactly one branch edge, and walking a
    ///   branch edge from its representative visits exactly the edges and
    ///   interior vertices mapped to it before reaching the target head.
    pub fn verify(&self, graph: &LinkedGraph) -> Result<(), BranchGraphError> {
        self.verify_with(graph, Pending::Nothing)
    }

    /// Branch vertices that have one incoming and one outgoing branch edge and
    /// are not on a loop.
    ///
    /// Edge removals leave such vertices behind unless `fuse_on_edge_removal`
    /// is set. So does a ring that gains a branch point: its former head stays
    /// a branch vertex.
    pub fn fusable_vertices(&self) -> Vec<BranchVertexId> {
        self.store
            .vertices()
            .filter(|(_, record)| {
                record.incoming.len() == 1
                    && record.outgoing.len() == 1
                    && record.incoming[0] != record.outgoing[0]
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether no branch vertex is a plain pass-through.
    pub fn is_canonical(&self) -> bool {
        self.fusable_vertices().is_empty()
    }

    pub(crate) fn verify_with(
        &self,
        graph: &LinkedGraph,
        pending: Pending,
    ) -> Result<(), BranchGraphError> {
        let live_vertices = graph.vertex_count() - usize::from(matches!(pending, Pending::Vertex(_)));
        let live_edges = graph.edge_count() - usize::from(matches!(pending, Pending::Edge(_)));

        if self.tables.tracked_vertex_count() != live_vertices {
            return Err(BranchGraphError::contract(format!(
                "{} vertices tracked, linked graph has {live_vertices}",
                self.tables.tracked_vertex_count()
            )));
        }
        if self.tables.tracked_edge_count() != live_edges {
            return Err(BranchGraphError::contract(format!(
                "{} edges tracked, linked graph has {live_edges}",
                self.tables.tracked_edge_count()
            )));
        }

        for vertex in graph.vertices() {
            if pending == Pending::Vertex(vertex) {
                continue;
            }
            self.verify_vertex(graph, vertex)?;
        }

        for (branch_vertex, record) in self.store.vertices() {
            if self.tables.extremity(record.linked) != Some(branch_vertex) {
                return Err(BranchGraphError::contract(format!(
                    "branch vertex {branch_vertex:?} stands for {:?}, which does not map back",
                    record.linked
                )));
            }
            for &edge in &record.outgoing {
                if self.store.edge(edge).map(|e| e.source) != Some(branch_vertex) {
                    return Err(BranchGraphError::contract(format!(
                        "{edge:?} listed as outgoing of {branch_vertex:?} but starts elsewhere"
                    )));
                }
            }
            for &edge in &record.incoming {
                if self.store.edge(edge).map(|e| e.target) != Some(branch_vertex) {
                    return Err(BranchGraphError::contract(format!(
                        "{edge:?} listed as incoming of {branch_vertex:?} but ends elsewhere"
                    )));
                }
            }
        }

        for (edge, branch_edge) in self.tables.edge_entries() {
            if !graph.contains_edge(edge) || pending == Pending::Edge(edge) {
                return Err(BranchGraphError::contract(format!(
                    "{edge:?} is tracked but not part of the linked graph"
                )));
            }
            if !self.contains_branch_edge(branch_edge) {
                return Err(BranchGraphError::contract(format!(
                    "{edge:?} maps to missing branch edge {branch_edge:?}"
                )));
            }
        }

        let (covered_edges, covered_interior) = self.verify_chains(graph)?;
        if covered_edges != self.tables.tracked_edge_count() {
            return Err(BranchGraphError::malformed_chain(format!(
                "branch walks cover {covered_edges} edges, {} are tracked",
                self.tables.tracked_edge_count()
            )));
        }
        if covered_interior != self.tables.interior_count() {
            return Err(BranchGraphError::malformed_chain(format!(
                "branch walks cover {covered_interior} interior vertices, {} are mapped",
                self.tables.interior_count()
            )));
        }
        Ok(())
    }

    fn verify_vertex(&self, graph: &LinkedGraph, vertex: VertexId) -> Result<(), BranchGraphError> {
        let tracked_in = self.tracked_count(graph.incoming(vertex));
        let tracked_out = self.tracked_count(graph.outgoing(vertex));
        match self.tables.membership(vertex) {
            None => Err(BranchGraphError::contract(format!(
                "vertex {vertex:?} is not tracked"
            ))),
            Some(Membership::Extremity(branch_vertex)) => {
                let record = self.store.vertex(branch_vertex).ok_or_else(|| {
                    BranchGraphError::contract(format!(
                        "vertex {vertex:?} maps to missing branch vertex {branch_vertex:?}"
                    ))
                })?;
                if record.linked != vertex {
                    return Err(BranchGraphError::contract(format!(
                        "vertex {vertex:?} maps to {branch_vertex:?}, which stands for {:?}",
                        record.linked
                    )));
                }
                if record.incoming.len() != tracked_in || record.outgoing.len() != tracked_out {
                    return Err(BranchGraphError::contract(format!(
                        "extremity {vertex:?} has linked degree ({tracked_in}, {tracked_out}) \
                         but branch degree ({}, {})",
                        record.incoming.len(),
                        record.outgoing.len()
                    )));
                }
                Ok(())
            }
            Some(Membership::Interior(branch_edge)) => {
                if !self.contains_branch_edge(branch_edge) {
                    return Err(BranchGraphError::contract(format!(
                        "vertex {vertex:?} is interior to missing branch edge {branch_edge:?}"
                    )));
                }
                if tracked_in != 1 || tracked_out != 1 {
                    return Err(BranchGraphError::malformed_chain(format!(
                        "interior vertex {vertex:?} has degree ({tracked_in}, {tracked_out})"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Walks every branch edge; returns how many edges and interior vertices
    /// the walks visited.
    fn verify_chains(&self, graph: &LinkedGraph) -> Result<(usize, usize), BranchGraphError> {
        let limit = graph.vertex_count();
        let mut covered_edges = 0;
        let mut covered_interior = 0;
        for (branch_edge, record) in self.store.edges() {
            let (source_head, target_head) = self
                .branch_edge_linked_endpoints(branch_edge)
                .ok_or_else(|| {
                    BranchGraphError::contract(format!(
                        "branch edge {branch_edge:?} has a missing endpoint"
                    ))
                })?;
            if graph.source(record.representative) != Some(source_head) {
                return Err(BranchGraphError::malformed_chain(format!(
                    "representative {:?} of {branch_edge:?} does not start at {source_head:?}",
                    record.representative
                )));
            }

            let mut edge = record.representative;
            let mut steps = 0;
            loop {
                if self.tables.branch_edge_of(edge) != Some(branch_edge) {
                    return Err(BranchGraphError::malformed_chain(format!(
                        "{edge:?} lies on {branch_edge:?} but maps to {:?}",
                        self.tables.branch_edge_of(edge)
                    )));
                }
                covered_edges += 1;
                let next = graph.target(edge).ok_or_else(|| {
                    BranchGraphError::contract(format!("linked edge {edge:?} no longer exists"))
                })?;
                if next == target_head {
                    break;
                }
                if self.tables.interior(next) != Some(branch_edge) {
                    return Err(BranchGraphError::malformed_chain(format!(
                        "{next:?} lies inside {branch_edge:?} but maps to {:?}",
                        self.tables.membership(next)
                    )));
                }
                covered_interior += 1;
                steps += 1;
                if steps > limit {
                    return Err(BranchGraphError::malformed_chain(format!(
                        "walk along {branch_edge:?} never reaches {target_head:?}"
                    )));
                }
                edge = self.tracked_successor(graph, next)?;
            }
        }
        Ok((covered_edges, covered_interior))
    }

    fn tracked_count(&self, edges: &[EdgeId]) -> usize {
        edges
            .iter()
            .filter(|&&edge| self.tables.is_tracked(edge))
            .count()
    }
}
