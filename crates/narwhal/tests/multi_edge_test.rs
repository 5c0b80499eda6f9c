use narwhal::geometry::edge_path;
use narwhal::{BundleDescriptor, Edge, Id, MultiEdgeBundler, MultiEdgeOptions, Point};

fn descriptor(b: &MultiEdgeBundler, id: &str) -> BundleDescriptor {
    *b.descriptor(&Id::from(id)).expect("descriptor")
}

#[test]
fn three_parallel_edges_fan_out_around_a_straight_one() {
    let edges = vec![
        Edge::directed("e1", "A", "B"),
        Edge::directed("e2", "A", "B"),
        Edge::directed("e3", "A", "B"),
    ];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions::default());
    b.compute(&edges);

    let e1 = descriptor(&b, "e1");
    let e2 = descriptor(&b, "e2");
    let e3 = descriptor(&b, "e3");
    assert_eq!((e1.curvature, e1.parallel_offset), (-0.2, -25.0));
    assert_eq!((e2.curvature, e2.parallel_offset), (0.0, 0.0));
    assert_eq!((e3.curvature, e3.parallel_offset), (0.2, 25.0));
    assert_eq!((e1.bundle_index, e3.bundle_index, e3.bundle_size), (0, 2, 3));
}

#[test]
fn two_parallel_edges_are_mirrored() {
    let edges = vec![Edge::directed("x", "A", "B"), Edge::directed("y", "A", "B")];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions::default());
    b.compute(&edges);
    assert_eq!(descriptor(&b, "x").curvature, -0.2);
    assert_eq!(descriptor(&b, "x").parallel_offset, -12.5);
    assert_eq!(descriptor(&b, "y").curvature, 0.2);
    assert_eq!(descriptor(&b, "y").parallel_offset, 12.5);
}

#[test]
fn lone_reverse_edge_joins_a_multi_edge_bundle() {
    let edges = vec![
        Edge::directed("ab", "A", "B"),
        Edge::directed("ba1", "B", "A"),
        Edge::directed("ba2", "B", "A"),
    ];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions::default());
    b.compute(&edges);
    assert_ne!(descriptor(&b, "ab").curvature, 0.0);
    assert_eq!(descriptor(&b, "ab").bundle_size, 3);
    assert_eq!(
        b.bundle_of(&Id::from("ab")).expect("bundle"),
        &[Id::from("ab"), Id::from("ba1"), Id::from("ba2")]
    );
}

#[test]
fn single_reciprocal_pair_stays_straight_when_directed() {
    let edges = vec![Edge::directed("ab", "A", "B"), Edge::directed("ba", "B", "A")];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions::default());
    b.compute(&edges);
    assert_eq!(descriptor(&b, "ab"), BundleDescriptor::STRAIGHT);
    assert!(!b.is_multi_edge(&Id::from("ba")));
}

#[test]
fn undirected_mode_groups_both_directions() {
    let edges = vec![Edge::directed("ab", "A", "B"), Edge::triple("ba", "B", "A")];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions {
        directed: false,
        ..Default::default()
    });
    b.compute(&edges);
    assert!(b.is_multi_edge(&Id::from("ab")));
    assert_eq!(descriptor(&b, "ba").bundle_size, 2);
}

#[test]
fn self_loops_get_their_own_bundle() {
    let edges = vec![Edge::directed("loop", "A", "A"), Edge::directed("ab", "A", "B")];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions::default());
    b.compute(&edges);
    assert_eq!(descriptor(&b, "loop"), BundleDescriptor::STRAIGHT);
    assert_eq!(b.stats().bundle_count, 2);
}

#[test]
fn stats_summarize_bundles() {
    let edges = vec![
        Edge::directed("1", "a", "b"),
        Edge::directed("2", "a", "b"),
        Edge::directed("3", "a", "b"),
        Edge::directed("4", "c", "d"),
        Edge::directed("5", "c", "d"),
        Edge::directed("6", "e", "f"),
    ];
    let mut b = MultiEdgeBundler::new(MultiEdgeOptions::default());
    b.compute(&edges);
    let stats = b.stats();
    assert_eq!(stats.bundle_count, 3);
    assert_eq!(stats.max_bundle_size, 3);
    assert_eq!(stats.mean_multi_edge_bundle_size, 2.5);

    b.compute(&[]);
    assert_eq!(b.stats(), Default::default());
}

#[test]
fn edge_path_bends_curved_edges_to_the_left() {
    let (s, t) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    assert_eq!(edge_path(s, t, &BundleDescriptor::STRAIGHT, 8), vec![s, t]);

    let curved = BundleDescriptor {
        curvature: 0.2,
        parallel_offset: 0.0,
        bundle_index: 1,
        bundle_size: 2,
    };
    let path = edge_path(s, t, &curved, 8);
    assert_eq!(path.len(), 9);
    assert_eq!(path[0], s);
    assert_eq!(path[8], t);
    assert!((path[4].y - 10.0).abs() < 1e-9);
}
