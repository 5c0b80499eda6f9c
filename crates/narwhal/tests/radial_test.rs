use narwhal::algo::radial::{self, AngularSubdivision};
use narwhal::{Edge, Graph, Id, Node, Point, RadialOptions};
use std::f64::consts::{PI, TAU};

fn tree(edges: &[(&str, &str)]) -> Graph {
    let mut ids: Vec<&str> = Vec::new();
    for &(s, t) in edges {
        for id in [s, t] {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Graph::new(
        ids.iter().map(|id| Node::new(*id)).collect(),
        edges
            .iter()
            .map(|&(s, t)| Edge::directed(format!("{s}-{t}"), s, t))
            .collect(),
    )
}

fn sample() -> Graph {
    tree(&[
        ("r", "a"),
        ("r", "b"),
        ("a", "a1"),
        ("a", "a2"),
        ("a", "a3"),
        ("b", "b1"),
    ])
}

#[test]
fn radial_children_stay_inside_their_parent_wedge() {
    let placed = radial::placements(&sample(), &RadialOptions::default());
    for p in &placed {
        let Some(parent) = &p.parent else {
            continue;
        };
        let parent = placed.iter().find(|q| &q.id == parent).expect("parent placed");
        assert!(p.start_angle >= parent.start_angle - 1e-12);
        assert!(p.end_angle <= parent.end_angle + 1e-12);
        assert!(p.angle >= parent.start_angle && p.angle <= parent.end_angle);
    }
}

#[test]
fn radial_radius_grows_with_depth() {
    let opts = RadialOptions {
        min_radius: 30.0,
        radius_increment: 50.0,
        ..Default::default()
    };
    for p in radial::placements(&sample(), &opts) {
        assert_eq!(p.radius, 30.0 + p.depth as f64 * 50.0);
        assert!((p.position.distance(opts.center) - p.radius).abs() < 1e-9);
    }
}

#[test]
fn radial_root_sits_at_the_center_by_default() {
    let out = radial::layout(&sample(), &RadialOptions::default());
    assert_eq!(out.positions[&Id::from("r")], Point::ORIGIN);
    assert_eq!(out.positions.len(), 7);
}

#[test]
fn radial_equal_subdivision_splits_wedges_evenly() {
    let placed = radial::placements(&sample(), &RadialOptions::default());
    let a = placed.iter().find(|p| p.id == Id::from("a")).expect("a");
    let b = placed.iter().find(|p| p.id == Id::from("b")).expect("b");
    assert!((a.end_angle - a.start_angle - PI).abs() < 1e-12);
    assert!((b.end_angle - b.start_angle - PI).abs() < 1e-12);
}

#[test]
fn radial_proportional_subdivision_follows_leaf_counts() {
    let placed = radial::placements(
        &sample(),
        &RadialOptions {
            subdivision: AngularSubdivision::Proportional,
            ..Default::default()
        },
    );
    let a = placed.iter().find(|p| p.id == Id::from("a")).expect("a");
    assert!((a.end_angle - a.start_angle - TAU * 3.0 / 4.0).abs() < 1e-12);
}

#[test]
fn radial_partial_sweep_is_respected() {
    let opts = RadialOptions {
        start_angle: PI / 2.0,
        sweep_angle: PI,
        ..Default::default()
    };
    for p in radial::placements(&sample(), &opts) {
        assert!(p.angle >= PI / 2.0 && p.angle <= 1.5 * PI);
    }
}
