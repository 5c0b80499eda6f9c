//! Deterministic tilings: grid, brick, hexagonal and concentric rings.

use crate::algo::{SortKey, sort_nodes};
use crate::graph::{Graph, LayoutResult, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometricVariant {
    #[default]
    Grid,
    Brick,
    Hexagonal,
    Concentric,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HexOrientation {
    /// Rows of hexagons, odd rows offset half a cell.
    #[default]
    Pointy,
    /// Columns of hexagons, odd columns offset half a cell.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometricOptions {
    pub variant: GeometricVariant,
    /// Top-left cell for tilings, center for concentric rings.
    pub origin: Point,
    pub columns: Option<usize>,
    pub rows: Option<usize>,
    /// Target columns / rows ratio when neither is given.
    pub aspect_ratio: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
    /// Brick: odd-row shift as a fraction of `column_spacing`.
    pub brick_offset: f64,
    pub hex_orientation: HexOrientation,
    /// Hexagonal: center-to-corner cell radius.
    pub hex_size: f64,
    /// Concentric: arc length reserved per node on a ring.
    pub node_spacing: f64,
    pub ring_spacing: f64,
    /// Concentric: radius of ring 0.
    pub inner_radius: f64,
    /// Concentric: ring cap; the last ring takes every remaining node.
    pub max_rings: Option<usize>,
    pub sort_by: Option<SortKey>,
}

impl Default for GeometricOptions {
    fn default() -> Self {
        Self {
            variant: GeometricVariant::Grid,
            origin: Point::ORIGIN,
            columns: None,
            rows: None,
            aspect_ratio: 1.0,
            column_spacing: 100.0,
            row_spacing: 100.0,
            brick_offset: 0.5,
            hex_orientation: HexOrientation::Pointy,
            hex_size: 50.0,
            node_spacing: 80.0,
            ring_spacing: 100.0,
            inner_radius: 0.0,
            max_rings: None,
            sort_by: None,
        }
    }
}

/// `(columns, rows)` for `n` cells.
pub fn grid_dimensions(n: usize, options: &GeometricOptions) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let columns = match (options.columns, options.rows) {
        (Some(c), _) if c > 0 => c,
        (_, Some(r)) if r > 0 => n.div_ceil(r),
        _ => {
            let aspect = if options.aspect_ratio.is_finite() && options.aspect_ratio > 0.0 {
                options.aspect_ratio
            } else {
                1.0
            };
            ((n as f64 * aspect).sqrt().ceil() as usize).clamp(1, n)
        }
    };
    (columns, n.div_ceil(columns))
}

pub fn layout(graph: &Graph, options: &GeometricOptions) -> LayoutResult {
    let start = std::time::Instant::now();
    let idx = graph.index();
    let mut order: Vec<usize> = (0..idx.len()).collect();
    sort_nodes(&idx, &mut order, options.sort_by);

    let slots = match options.variant {
        GeometricVariant::Concentric => concentric_slots(order.len(), options),
        variant => tiling_slots(order.len(), variant, options),
    };
    let mut points = vec![Point::ORIGIN; idx.len()];
    for (&node, slot) in order.iter().zip(slots) {
        points[node] = slot;
    }

    tracing::debug!(
        nodes = idx.len(),
        variant = ?options.variant,
        elapsed = ?start.elapsed(),
        "geometric layout"
    );
    LayoutResult {
        positions: idx.collect_positions(&points),
    }
}

fn tiling_slots(n: usize, variant: GeometricVariant, o: &GeometricOptions) -> Vec<Point> {
    let (columns, _) = grid_dimensions(n, o);
    let sqrt3 = 3f64.sqrt();
    (0..n)
        .map(|i| {
            let c = (i % columns) as f64;
            let r = (i / columns) as f64;
            let odd_row = (i / columns) % 2 == 1;
            let odd_col = (i % columns) % 2 == 1;
            let local = match variant {
                GeometricVariant::Brick => {
                    let shift = if odd_row {
                        o.brick_offset * o.column_spacing
                    } else {
                        0.0
                    };
                    Point::new(c * o.column_spacing + shift, r * o.row_spacing)
                }
                GeometricVariant::Hexagonal => match o.hex_orientation {
                    HexOrientation::Pointy => {
                        let w = sqrt3 * o.hex_size;
                        let shift = if odd_row { w / 2.0 } else { 0.0 };
                        Point::new(c * w + shift, r * 1.5 * o.hex_size)
                    }
                    HexOrientation::Flat => {
                        let h = sqrt3 * o.hex_size;
                        let shift = if odd_col { h / 2.0 } else { 0.0 };
                        Point::new(c * 1.5 * o.hex_size, r * h + shift)
                    }
                },
                GeometricVariant::Grid | GeometricVariant::Concentric => {
                    Point::new(c * o.column_spacing, r * o.row_spacing)
                }
            };
            o.origin + local
        })
        .collect()
}

/// How many nodes fit on a ring of `radius` at `node_spacing` arc length each.
fn ring_capacity(radius: f64, node_spacing: f64) -> usize {
    if radius <= 0.0 || node_spacing <= 0.0 {
        return 1;
    }
    ((TAU * radius / node_spacing).floor() as usize).max(1)
}

fn concentric_slots(n: usize, o: &GeometricOptions) -> Vec<Point> {
    let mut out = Vec::with_capacity(n);
    let mut ring = 0usize;
    while out.len() < n {
        let radius = o.inner_radius + ring as f64 * o.ring_spacing;
        let remaining = n - out.len();
        let last_ring = o.max_rings.is_some_and(|m| ring + 1 >= m.max(1));
        let count = if last_ring {
            remaining
        } else {
            ring_capacity(radius, o.node_spacing).min(remaining)
        };
        if radius <= 0.0 && count == 1 {
            out.push(o.origin);
        } else {
            for k in 0..count {
                let angle = TAU * k as f64 / count as f64;
                out.push(o.origin.polar_offset(radius, angle));
            }
        }
        ring += 1;
    }
    out
}
