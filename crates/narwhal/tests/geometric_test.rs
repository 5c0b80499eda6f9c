use narwhal::algo::geometric::{self, GeometricVariant, HexOrientation, grid_dimensions};
use narwhal::{GeometricOptions, Graph, Id, Node, Point, SortKey};

fn nodes(n: usize) -> Graph {
    Graph::new(
        (0..n).map(|i| Node::new(format!("n{i}"))).collect(),
        Vec::new(),
    )
}

fn at(out: &narwhal::LayoutResult, id: &str) -> Point {
    out.positions[&Id::from(id)]
}

#[test]
fn geometric_grid_fills_rows_left_to_right() {
    let out = geometric::layout(&nodes(4), &GeometricOptions::default());
    assert_eq!(at(&out, "n0"), Point::new(0.0, 0.0));
    assert_eq!(at(&out, "n1"), Point::new(100.0, 0.0));
    assert_eq!(at(&out, "n2"), Point::new(0.0, 100.0));
    assert_eq!(at(&out, "n3"), Point::new(100.0, 100.0));
}

#[test]
fn geometric_grid_dimensions_follow_columns_or_rows() {
    let o = GeometricOptions {
        columns: Some(3),
        ..Default::default()
    };
    assert_eq!(grid_dimensions(7, &o), (3, 3));
    let o = GeometricOptions {
        rows: Some(2),
        ..Default::default()
    };
    assert_eq!(grid_dimensions(7, &o), (4, 2));
    assert_eq!(grid_dimensions(0, &GeometricOptions::default()), (0, 0));
}

#[test]
fn geometric_brick_shifts_odd_rows() {
    let out = geometric::layout(
        &nodes(4),
        &GeometricOptions {
            variant: GeometricVariant::Brick,
            columns: Some(2),
            ..Default::default()
        },
    );
    assert_eq!(at(&out, "n1"), Point::new(100.0, 0.0));
    assert_eq!(at(&out, "n2"), Point::new(50.0, 100.0));
}

#[test]
fn geometric_hexagonal_cells_are_equidistant() {
    let out = geometric::layout(
        &nodes(4),
        &GeometricOptions {
            variant: GeometricVariant::Hexagonal,
            hex_orientation: HexOrientation::Pointy,
            columns: Some(2),
            ..Default::default()
        },
    );
    let d01 = at(&out, "n0").distance(at(&out, "n1"));
    let d02 = at(&out, "n0").distance(at(&out, "n2"));
    let d12 = at(&out, "n1").distance(at(&out, "n2"));
    assert!((d01 - d02).abs() < 1e-9);
    assert!((d01 - d12).abs() < 1e-9);
}

#[test]
fn geometric_concentric_puts_first_node_at_origin() {
    let out = geometric::layout(
        &nodes(6),
        &GeometricOptions {
            variant: GeometricVariant::Concentric,
            ..Default::default()
        },
    );
    assert_eq!(at(&out, "n0"), Point::ORIGIN);
    for i in 1..6 {
        let r = at(&out, &format!("n{i}")).distance(Point::ORIGIN);
        assert!((r - 100.0).abs() < 1e-9);
    }
}

#[test]
fn geometric_concentric_last_ring_absorbs_overflow() {
    let out = geometric::layout(
        &nodes(30),
        &GeometricOptions {
            variant: GeometricVariant::Concentric,
            max_rings: Some(2),
            ..Default::default()
        },
    );
    let outer = out
        .positions
        .values()
        .filter(|p| (p.distance(Point::ORIGIN) - 100.0).abs() < 1e-9)
        .count();
    assert_eq!(outer, 29);
}

#[test]
fn geometric_sort_by_id_orders_slots() {
    let g = Graph::new(vec![Node::new("b"), Node::new("a")], Vec::new());
    let out = geometric::layout(
        &g,
        &GeometricOptions {
            columns: Some(2),
            sort_by: Some(SortKey::Id),
            ..Default::default()
        },
    );
    assert_eq!(at(&out, "a"), Point::new(0.0, 0.0));
    assert_eq!(at(&out, "b"), Point::new(100.0, 0.0));
}
