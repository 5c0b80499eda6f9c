//! Incremental placement that keeps existing nodes close to where they were.
//!
//! New nodes start next to the centroid of their already-placed neighbors (or near the global
//! centroid when isolated), then a short force simulation settles everything. Existing nodes
//! move at `existing_node_mobility` of the displacement new nodes get.

use crate::algo::force::{ForceParams, ForceSimulation};
use crate::geometry::centroid;
use crate::graph::{Graph, Id, LayoutResult, Point, PositionMap};
use crate::rng::XorShift64Star;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdaptiveOptions {
    /// Distance between a new node and the centroid it is placed around.
    pub new_node_spacing: f64,
    pub settle_iterations: usize,
    /// Displacement scale for nodes that already had a position.
    pub existing_node_mobility: f64,
    pub node_spacing: f64,
    pub repulsion_strength: f64,
    pub attraction_strength: f64,
    pub damping: f64,
    pub random_seed: u64,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            new_node_spacing: 80.0,
            settle_iterations: 50,
            existing_node_mobility: 0.2,
            node_spacing: 100.0,
            repulsion_strength: 5000.0,
            attraction_strength: 0.01,
            damping: 0.9,
            random_seed: 1,
        }
    }
}

impl AdaptiveOptions {
    fn force_params(&self) -> ForceParams {
        ForceParams {
            node_spacing: self.node_spacing,
            repulsion_strength: self.repulsion_strength,
            attraction_strength: self.attraction_strength,
            damping: self.damping,
        }
    }
}

/// Updates `existing` for the current `graph`, where `new_nodes` were just added.
///
/// Graph nodes missing from `existing` are treated as new even when not listed. Entries of
/// `existing` that are no longer in the graph are dropped.
pub fn layout(
    existing: &PositionMap,
    graph: &Graph,
    new_nodes: &[Id],
    options: &AdaptiveOptions,
) -> LayoutResult {
    let start = std::time::Instant::now();
    let idx = graph.index();
    let n = idx.len();
    let adjacency = idx.undirected_adjacency();
    let mut rng = XorShift64Star::new(options.random_seed);

    let listed: FxHashSet<&Id> = new_nodes.iter().collect();
    let mut points: Vec<Option<Point>> = idx
        .nodes
        .iter()
        .map(|node| {
            if listed.contains(&node.id) {
                None
            } else {
                existing.get(&node.id).copied().filter(|p| p.is_finite())
            }
        })
        .collect();
    let is_new: Vec<bool> = points.iter().map(Option::is_none).collect();

    // Listed nodes first, in the caller's order, then any other unplaced node.
    let mut placement_order: Vec<usize> = new_nodes
        .iter()
        .filter_map(|id| idx.id_to_idx.get(id).copied())
        .collect();
    placement_order.extend((0..n).filter(|&i| is_new[i] && !listed.contains(idx.id(i))));

    for i in placement_order {
        if points[i].is_some() {
            continue;
        }
        let neighbors: Vec<Point> = adjacency[i].iter().filter_map(|&j| points[j]).collect();
        let placed = match centroid(&neighbors) {
            Some(c) => c.polar_offset(options.new_node_spacing, rng.next_angle()),
            None => {
                let global = centroid(points.iter().flatten()).unwrap_or(Point::ORIGIN);
                global.polar_offset(2.0 * options.new_node_spacing, rng.next_angle())
            }
        };
        points[i] = Some(placed);
    }

    let ids = idx.nodes.iter().map(|node| node.id.clone()).collect();
    let seeded = points.into_iter().map(|p| p.unwrap_or(Point::ORIGIN)).collect();
    let edges = idx
        .edges
        .iter()
        .filter(|e| e.a != e.b)
        .map(|e| (e.a, e.b))
        .collect();
    let mut sim = ForceSimulation::from_parts(ids, seeded, edges, options.force_params());
    sim.set_mobility(
        is_new
            .iter()
            .map(|&new| if new { 1.0 } else { options.existing_node_mobility })
            .collect(),
    );
    sim.run(options.settle_iterations);

    tracing::debug!(
        nodes = n,
        new_nodes = is_new.iter().filter(|&&b| b).count(),
        iterations = options.settle_iterations,
        elapsed = ?start.elapsed(),
        "adaptive layout"
    );
    LayoutResult {
        positions: sim.positions(),
    }
}
