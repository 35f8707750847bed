use branchgraph::{BranchGraphConfig, BranchTrackedGraph, Membership};


use fuzz_common::{add_path, add_vertices, assert_mapping_invariants, checked_graph};

#[test]
fn test_straight_chain_is_one_branch() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 5);
    let edges = add_path(&mut graph, &v);

    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 2);
    assert_eq!(branches.branch_edge_count(), 1);
    assert!(branches.branch_vertex(v[0]).is_some());
    assert!(branches.branch_vertex(v[4]).is_some());

    let branch = branches.branch_edges().next().unwrap();
    for &interior in &v[1..4] {
        assert_eq!(branches.branch_vertex(interior), None);
        assert_eq!(branches.interior_branch_edge(interior), Some(branch));
    }
    assert_eq!(branches.linked_edge(branch), Some(edges[0]));
    assert_eq!(
        branches.branch_edge_linked_endpoints(branch),
        Some((v[0], v[4]))
    );
    assert_mapping_invariants(branches, graph.graph());
}

#[test]
fn test_fork_keeps_every_leaf() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 3);
    let e01 = graph.add_edge(v[0], v[1]).unwrap();
    let e02 = graph.add_edge(v[0], v[2]).unwrap();

    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 3);
    assert_eq!(branches.branch_edge_count(), 2);
    let root = branches.branch_vertex(v[0]).unwrap();
    assert_eq!(branches.outgoing_branch_edges(root).len(), 2);

    let to_one = branches.branch_edge(e01).unwrap();
    let to_two = branches.branch_edge(e02).unwrap();
    assert_ne!(to_one, to_two);
    assert_eq!(branches.branch_edge_target(to_one), branches.branch_vertex(v[1]));
    assert_eq!(branches.branch_edge_target(to_two), branches.branch_vertex(v[2]));
    assert_mapping_invariants(branches, graph.graph());
}

#[test]
fn test_branch_point_inside_chain_splits_it() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 5);
    add_path(&mut graph, &v[..4]);
    assert_eq!(graph.branches().branch_edge_count(), 1);

    graph.add_edge(v[1], v[4]).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 4);
    assert_eq!(branches.branch_edge_count(), 3);
    assert!(branches.branch_vertex(v[1]).is_some());
    assert!(branches.interior_branch_edge(v[2]).is_some());
    graph.verify().unwrap();
}

#[test]
fn test_middle_vertex_removal_splits_chain_in_two() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 6);
    add_path(&mut graph, &v);

    graph.remove_vertex(v[2]).unwrap();

    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 4);
    assert_eq!(branches.branch_edge_count(), 2);
    for &head in &[v[0], v[1], v[3], v[5]] {
        assert!(branches.branch_vertex(head).is_some(), "{head:?} should be extremity");
    }
    let second = branches.interior_branch_edge(v[4]).unwrap();
    assert_eq!(
        branches.branch_edge_linked_endpoints(second),
        Some((v[3], v[5]))
    );
    assert_eq!(branches.membership(v[2]), None);
    assert_mapping_invariants(branches, graph.graph());
}

#[test]
fn test_diamond_yields_parallel_branch_edges() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    graph.add_edge(v[0], v[1]).unwrap();
    graph.add_edge(v[1], v[3]).unwrap();
    graph.add_edge(v[0], v[2]).unwrap();
    graph.add_edge(v[2], v[3]).unwrap();

    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 2);
    assert_eq!(branches.branch_edge_count(), 2);
    let top = branches.branch_vertex(v[0]).unwrap();
    let bottom = branches.branch_vertex(v[3]).unwrap();
    for &edge in branches.outgoing_branch_edges(top) {
        assert_eq!(branches.branch_edge_target(edge), Some(bottom));
    }
    assert_ne!(
        branches.interior_branch_edge(v[1]),
        branches.interior_branch_edge(v[2])
    );
    assert_mapping_invariants(branches, graph.graph());
}

#[test]
fn test_ring_collapses_to_single_loop() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    add_path(&mut graph, &v);
    graph.add_edge(v[3], v[0]).unwrap();

    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 1);
    assert_eq!(branches.branch_edge_count(), 1);
    let head = branches.branch_vertices().next().unwrap();
    assert_eq!(branches.linked_vertex(head), Some(v[0]));
    let ring = branches.branch_edges().next().unwrap();
    assert!(branches.is_loop(ring));
    for &interior in &v[1..] {
        assert_eq!(branches.branch_vertex(interior), None);
    }
    assert!(branches.is_canonical());
    assert_mapping_invariants(branches, graph.graph());
}

#[test]
fn test_ring_built_in_bulk_matches_incremental() {
    let mut incremental = checked_graph();
    let v = add_vertices(&mut incremental, 4);
    add_path(&mut incremental, &v);
    incremental.add_edge(v[3], v[0]).unwrap();

    let mut bulk = checked_graph();
    bulk.pause_listeners();
    let w = add_vertices(&mut bulk, 4);
    add_path(&mut bulk, &w);
    bulk.add_edge(w[3], w[0]).unwrap();
    bulk.resume_listeners().unwrap();

    assert_eq!(bulk.layout(), incremental.layout());
    assert_eq!(bulk.branches().branch_vertex_count(), 1);
}

#[test]
fn test_ring_gaining_exit_keeps_former_head() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 5);
    add_path(&mut graph, &v[..4]);
    graph.add_edge(v[3], v[0]).unwrap();

    graph.add_edge(v[2], v[4]).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 3);
    assert_eq!(branches.branch_edge_count(), 3);
    let former_head = branches.branch_vertex(v[0]).unwrap();
    assert_eq!(branches.fusable_vertices(), vec![former_head]);
    graph.verify().unwrap();
}

#[test]
fn test_self_loop_on_isolated_vertex() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 1);
    let edge = graph.add_edge(v[0], v[0]).unwrap();

    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 1);
    let loop_edge = branches.branch_edge(edge).unwrap();
    assert!(branches.is_loop(loop_edge));
    assert_eq!(graph.vertex_branch_iter(loop_edge).count(), 0);
    assert_eq!(graph.edge_branch_iter(loop_edge).collect::<Vec<_>>(), vec![edge]);
}

#[test]
fn test_self_loop_on_interior_vertex_promotes_it() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 3);
    add_path(&mut graph, &v);
    let loop_edge = graph.add_edge(v[1], v[1]).unwrap();

    let branches = graph.branches();
    let middle = branches.branch_vertex(v[1]).unwrap();
    assert_eq!(branches.branch_vertex_count(), 3);
    assert_eq!(branches.branch_edge_count(), 3);
    assert_eq!(branches.incoming_branch_edges(middle).len(), 2);
    assert_eq!(branches.outgoing_branch_edges(middle).len(), 2);

    graph.remove_edge(loop_edge).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_edge_count(), 2);
    assert_eq!(branches.fusable_vertices(), vec![branches.branch_vertex(v[1]).unwrap()]);
    graph.verify().unwrap();
}

#[test]
fn test_direct_edge_parallel_to_longer_branch() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 3);
    add_path(&mut graph, &v);
    let direct = graph.add_edge(v[0], v[2]).unwrap();
    assert_eq!(graph.branches().branch_edge_count(), 2);

    // Removing the direct edge must leave the longer branch untouched.
    graph.remove_edge(direct).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_edge_count(), 1);
    assert_eq!(
        branches.membership(v[1]),
        branches.branch_edges().next().map(Membership::Interior)
    );
    graph.verify().unwrap();
}

#[test]
fn test_removing_chain_edge_next_to_parallel_direct_edge() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 3);
    let path = add_path(&mut graph, &v);
    graph.add_edge(v[0], v[2]).unwrap();

    graph.remove_edge(path[0]).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_vertex_count(), 3);
    assert_eq!(branches.branch_edge_count(), 2);
    let target = branches.branch_vertex(v[2]).unwrap();
    assert_eq!(branches.incoming_branch_edges(target).len(), 2);
    assert!(branches.is_canonical());
    graph.verify().unwrap();
}

#[test]
fn test_fuse_on_edge_removal_restores_chain() {
    let mut graph =
        BranchTrackedGraph::with_config(BranchGraphConfig::checked().with_fuse_on_edge_removal(true));
    let v = add_vertices(&mut graph, 4);
    add_path(&mut graph, &v[..3]);
    let side = graph.add_edge(v[1], v[3]).unwrap();
    assert_eq!(graph.branches().branch_edge_count(), 3);

    graph.remove_edge(side).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_edge_count(), 1);
    assert_eq!(branches.branch_vertex_count(), 3);
    assert!(branches.interior_branch_edge(v[1]).is_some());
    assert!(branches.is_canonical());
    graph.verify().unwrap();
}

#[test]
fn test_without_fuse_on_edge_removal_pass_through_stays() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    add_path(&mut graph, &v[..3]);
    let side = graph.add_edge(v[1], v[3]).unwrap();

    graph.remove_edge(side).unwrap();
    let branches = graph.branches();
    assert_eq!(branches.branch_edge_count(), 2);
    assert!(branches.branch_vertex(v[1]).is_some());
    assert!(!branches.is_canonical());
}

#[test]
fn test_remove_every_vertex_empties_branch_graph() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 5);
    add_path(&mut graph, &v);
    graph.add_edge(v[4], v[0]).unwrap();
    graph.add_edge(v[2], v[2]).unwrap();

    for vertex in [v[3], v[0], v[2], v[4], v[1]] {
        graph.remove_vertex(vertex).unwrap();
        graph.verify().unwrap();
    }
    assert_eq!(graph.branches().branch_vertex_count(), 0);
    assert_eq!(graph.branches().branch_edge_count(), 0);
}
