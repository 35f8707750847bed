use branchgraph::{BranchElement, BranchGraphConfig, BranchTrackedGraph, PoolStats};


use fuzz_common::{add_path, add_vertices, checked_graph};

#[test]
fn test_branch_edge_walks_interior_in_chain_order() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 5);
    let edges = add_path(&mut graph, &v);
    let branch = graph.branches().branch_edges().next().unwrap();

    let interior: Vec<_> = graph.vertex_branch_iter(branch).collect();
    assert_eq!(interior, v[1..4].to_vec());
    let chain: Vec<_> = graph.edge_branch_iter(branch).collect();
    assert_eq!(chain, edges);
}

#[test]
fn test_branch_vertex_walks_its_head_only() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 3);
    add_path(&mut graph, &v);
    let head = graph.branches().branch_vertex(v[0]).unwrap();

    assert_eq!(graph.vertex_branch_iter(head).collect::<Vec<_>>(), vec![v[0]]);
    assert_eq!(graph.edge_branch_iter(head).count(), 0);
}

#[test]
fn test_ring_walk_stops_at_head() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    let mut edges = add_path(&mut graph, &v);
    edges.push(graph.add_edge(v[3], v[0]).unwrap());
    let ring = graph.branches().branch_edges().next().unwrap();

    assert_eq!(
        graph.vertex_branch_iter(ring).collect::<Vec<_>>(),
        v[1..].to_vec()
    );
    assert_eq!(graph.edge_branch_iter(ring).collect::<Vec<_>>(), edges);
}

#[test]
fn test_branch_without_interior_yields_no_vertices() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 2);
    let edge = graph.add_edge(v[0], v[1]).unwrap();
    let branch = graph.branches().branch_edge(edge).unwrap();

    assert_eq!(graph.vertex_branch_iter(branch).count(), 0);
    assert_eq!(graph.edge_branch_iter(branch).collect::<Vec<_>>(), vec![edge]);
}

#[test]
fn test_stale_branch_edge_yields_nothing() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    add_path(&mut graph, &v[..3]);
    let stale = graph.branches().branch_edges().next().unwrap();

    graph.add_edge(v[1], v[3]).unwrap();
    assert!(!graph.branches().contains_branch_edge(stale));
    assert_eq!(graph.vertex_branch_iter(stale).count(), 0);
    assert_eq!(graph.edge_branch_iter(stale).count(), 0);
}

#[test]
fn test_restart_replays_from_first_item() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 6);
    add_path(&mut graph, &v);
    let branch = graph.branches().branch_edges().next().unwrap();

    let mut iter = graph.vertex_branch_iter(branch);
    assert_eq!(iter.next(), Some(v[1]));
    assert_eq!(iter.next(), Some(v[2]));
    iter.restart();
    assert_eq!(iter.collect::<Vec<_>>(), v[1..5].to_vec());
}

#[test]
fn test_reset_moves_cursor_to_another_element() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    add_path(&mut graph, &v[..3]);
    let side = graph.add_edge(v[1], v[3]).unwrap();
    let branches = graph.branches();
    let side_branch = branches.branch_edge(side).unwrap();
    let middle = branches.branch_vertex(v[1]).unwrap();

    let mut iter = graph.edge_branch_iter(side_branch);
    assert_eq!(iter.next(), Some(side));
    assert_eq!(iter.next(), None);

    iter.reset(BranchElement::Vertex(middle));
    assert_eq!(iter.next(), None);

    let upstream = branches.incoming_branch_edges(middle)[0];
    iter.reset(upstream.into());
    assert_eq!(iter.next(), graph.graph().find_edge(v[0], v[1]));
    assert_eq!(iter.next(), None);
}

#[test]
fn test_pool_recycles_released_cursors() {
    let mut graph = checked_graph();
    let v = add_vertices(&mut graph, 4);
    add_path(&mut graph, &v);
    let branch = graph.branches().branch_edges().next().unwrap();
    assert_eq!(graph.branches().pool_stats(), PoolStats::default());

    let first = graph.vertex_branch_iter(branch);
    let second = graph.vertex_branch_iter(branch);
    let stats = graph.branches().pool_stats();
    assert_eq!(stats.created, 2);
    assert_eq!(stats.idle_vertex_cursors, 0);

    drop(first);
    graph.branches().release_iterator(second);
    let stats = graph.branches().pool_stats();
    assert_eq!(stats.idle_vertex_cursors, 2);
    assert_eq!(stats.idle_edge_cursors, 0);

    for _ in 0..5 {
        assert_eq!(graph.vertex_branch_iter(branch).count(), 2);
    }
    let edges = graph.edge_branch_iter(branch);
    drop(edges);

    let stats = graph.branches().pool_stats();
    assert_eq!(stats.created, 3);
    assert_eq!(stats.reused, 5);
    assert_eq!(stats.idle_vertex_cursors, 2);
    assert_eq!(stats.idle_edge_cursors, 1);
}

#[test]
fn test_pool_limit_zero_disables_recycling() {
    let mut graph =
        BranchTrackedGraph::with_config(BranchGraphConfig::checked().with_iterator_pool_limit(0));
    let v = add_vertices(&mut graph, 3);
    add_path(&mut graph, &v);
    let branch = graph.branches().branch_edges().next().unwrap();

    for _ in 0..3 {
        assert_eq!(graph.edge_branch_iter(branch).count(), 2);
    }
    let stats = graph.branches().pool_stats();
    assert_eq!(stats.created, 3);
    assert_eq!(stats.reused, 0);
    assert_eq!(stats.idle_edge_cursors, 0);
}
