//! Radial tree layout: depth becomes radius, subtrees own angular wedges.

use crate::algo::tree::forest::Forest;
use crate::graph::{Graph, Id, LayoutResult, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AngularSubdivision {
    /// Every child gets the same share of its parent's wedge.
    #[default]
    Equal,
    /// Shares follow the number of leaves under each child.
    Proportional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialOptions {
    pub center: Point,
    /// Radius of depth 0.
    pub min_radius: f64,
    pub radius_increment: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub subdivision: AngularSubdivision,
    pub root: Option<Id>,
}

impl Default for RadialOptions {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            min_radius: 0.0,
            radius_increment: 100.0,
            start_angle: 0.0,
            sweep_angle: TAU,
            subdivision: AngularSubdivision::Equal,
            root: None,
        }
    }
}

/// Polar placement of one node. The wedge is `[start_angle, end_angle)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialPlacement {
    pub id: Id,
    pub parent: Option<Id>,
    pub depth: usize,
    pub radius: f64,
    pub angle: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub position: Point,
}

pub fn placements(graph: &Graph, options: &RadialOptions) -> Vec<RadialPlacement> {
    let idx = graph.index();
    let forest = Forest::build(&idx, options.root.as_ref());
    if forest.len() == 0 {
        return Vec::new();
    }

    let leaf_counts = match options.subdivision {
        AngularSubdivision::Proportional => forest.leaf_counts(),
        AngularSubdivision::Equal => Vec::new(),
    };

    let mut wedge = vec![(0.0_f64, 0.0_f64); forest.len()];
    let root_share = options.sweep_angle / forest.roots.len() as f64;
    for (i, &r) in forest.roots.iter().enumerate() {
        let a = options.start_angle + i as f64 * root_share;
        wedge[r] = (a, a + root_share);
    }

    let mut out = Vec::with_capacity(forest.len());
    for &r in &forest.roots {
        for t in forest.preorder(r) {
            let node = &forest.nodes[t];
            let (a, b) = wedge[t];
            split_wedge(
                a,
                b,
                &node.children,
                &leaf_counts,
                options.subdivision,
                &mut wedge,
            );

            let radius = options.min_radius + node.depth as f64 * options.radius_increment;
            let angle = (a + b) / 2.0;
            out.push(RadialPlacement {
                id: idx.id(node.node).clone(),
                parent: node.parent.map(|p| idx.id(forest.nodes[p].node).clone()),
                depth: node.depth,
                radius,
                angle,
                start_angle: a,
                end_angle: b,
                position: options.center.polar_offset(radius, angle),
            });
        }
    }
    out
}

fn split_wedge(
    start: f64,
    end: f64,
    children: &[usize],
    leaf_counts: &[usize],
    subdivision: AngularSubdivision,
    wedge: &mut [(f64, f64)],
) {
    if children.is_empty() {
        return;
    }
    let span = end - start;
    match subdivision {
        AngularSubdivision::Equal => {
            let share = span / children.len() as f64;
            for (i, &c) in children.iter().enumerate() {
                let a = start + i as f64 * share;
                wedge[c] = (a, a + share);
            }
        }
        AngularSubdivision::Proportional => {
            let total: usize = children.iter().map(|&c| leaf_counts[c]).sum();
            let total = total.max(1) as f64;
            let mut a = start;
            for &c in children {
                let share = span * leaf_counts[c] as f64 / total;
                wedge[c] = (a, a + share);
                a += share;
            }
        }
    }
}

pub fn layout(graph: &Graph, options: &RadialOptions) -> LayoutResult {
    let start = std::time::Instant::now();
    let placed = placements(graph, options);
    tracing::debug!(nodes = placed.len(), elapsed = ?start.elapsed(), "radial tree layout");
    LayoutResult {
        positions: placed.into_iter().map(|p| (p.id, p.position)).collect(),
    }
}
