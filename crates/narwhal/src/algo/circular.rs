//! Circular arrangements: one ring, concentric BFS levels, or two bipartite arcs.

use crate::algo::{SortKey, sort_nodes};
use crate::graph::{Graph, GraphIndex, Id, LayoutResult, Point};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CircularVariant {
    #[default]
    Simple,
    Hierarchical,
    Bipartite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Partitions {
    pub first: Vec<Id>,
    pub second: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircularOptions {
    pub variant: CircularVariant,
    pub center: Point,
    pub start_angle: f64,
    /// Ring radius for the simple and bipartite variants.
    pub radius: f64,
    pub sort_by: Option<SortKey>,
    /// Hierarchical: radius of level 0.
    pub base_radius: f64,
    /// Hierarchical: radius added per level.
    pub level_radius: f64,
    /// Bipartite: explicit partitions. Nodes listed in neither go to the second one.
    pub partitions: Option<Partitions>,
    /// Bipartite: fraction of the circle given to the first partition.
    pub partition_ratio: f64,
}

impl Default for CircularOptions {
    fn default() -> Self {
        Self {
            variant: CircularVariant::Simple,
            center: Point::ORIGIN,
            start_angle: 0.0,
            radius: 200.0,
            sort_by: None,
            base_radius: 100.0,
            level_radius: 100.0,
            partitions: None,
            partition_ratio: 0.5,
        }
    }
}

pub fn layout(graph: &Graph, options: &CircularOptions) -> LayoutResult {
    let start = std::time::Instant::now();
    let idx = graph.index();
    let mut points = vec![Point::ORIGIN; idx.len()];
    match options.variant {
        CircularVariant::Simple => simple(&idx, options, &mut points),
        CircularVariant::Hierarchical => hierarchical(&idx, options, &mut points),
        CircularVariant::Bipartite => bipartite(&idx, options, &mut points),
    }
    tracing::debug!(
        nodes = idx.len(),
        variant = ?options.variant,
        elapsed = ?start.elapsed(),
        "circular layout"
    );
    LayoutResult {
        positions: idx.collect_positions(&points),
    }
}

/// Spreads `members` evenly over `[start, start + sweep)`. With `centered`, each node sits in
/// the middle of its slot instead of at its start.
fn place_on_arc(
    members: &[usize],
    center: Point,
    radius: f64,
    start: f64,
    sweep: f64,
    centered: bool,
    points: &mut [Point],
) {
    let n = members.len() as f64;
    let bias = if centered { 0.5 } else { 0.0 };
    for (i, &m) in members.iter().enumerate() {
        let angle = start + sweep * (i as f64 + bias) / n;
        points[m] = center.polar_offset(radius, angle);
    }
}

fn simple(idx: &GraphIndex<'_>, options: &CircularOptions, points: &mut [Point]) {
    let mut order: Vec<usize> = (0..idx.len()).collect();
    sort_nodes(idx, &mut order, options.sort_by);
    place_on_arc(
        &order,
        options.center,
        options.radius,
        options.start_angle,
        TAU,
        false,
        points,
    );
}

fn hierarchical(idx: &GraphIndex<'_>, options: &CircularOptions, points: &mut [Point]) {
    for (level, mut members) in bfs_levels(idx).into_iter().enumerate() {
        sort_nodes(idx, &mut members, options.sort_by);
        let radius = options.base_radius + level as f64 * options.level_radius;
        place_on_arc(
            &members,
            options.center,
            radius,
            options.start_angle,
            TAU,
            false,
            points,
        );
    }
}

/// BFS levels along edge direction, seeded from nodes without incoming edges (or the first
/// node). Nodes no seed reaches start another BFS at level 0.
pub(crate) fn bfs_levels(idx: &GraphIndex<'_>) -> Vec<Vec<usize>> {
    let n = idx.len();
    let adjacency = idx.out_adjacency();
    let in_degrees = idx.in_degrees();
    let mut level = vec![usize::MAX; n];
    let mut levels: Vec<Vec<usize>> = Vec::new();

    let mut seeds: Vec<usize> = (0..n).filter(|&i| in_degrees[i] == 0).collect();
    if seeds.is_empty() && n > 0 {
        seeds.push(0);
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut next_unvisited = 0usize;
    loop {
        for s in seeds.drain(..) {
            if level[s] == usize::MAX {
                level[s] = 0;
                queue.push_back(s);
            }
        }
        while let Some(v) = queue.pop_front() {
            let l = level[v];
            if levels.len() <= l {
                levels.resize_with(l + 1, Vec::new);
            }
            levels[l].push(v);
            for &w in &adjacency[v] {
                if level[w] == usize::MAX {
                    level[w] = l + 1;
                    queue.push_back(w);
                }
            }
        }
        while next_unvisited < n && level[next_unvisited] != usize::MAX {
            next_unvisited += 1;
        }
        if next_unvisited == n {
            break;
        }
        seeds.push(next_unvisited);
    }
    levels
}

fn bipartite(idx: &GraphIndex<'_>, options: &CircularOptions, points: &mut [Point]) {
    let in_first = match &options.partitions {
        Some(p) => {
            let mut in_first = vec![false; idx.len()];
            for id in &p.first {
                if let Some(&i) = idx.id_to_idx.get(id) {
                    in_first[i] = true;
                }
            }
            in_first
        }
        None => two_coloring(idx),
    };

    let mut first: Vec<usize> = (0..idx.len()).filter(|&i| in_first[i]).collect();
    let mut second: Vec<usize> = (0..idx.len()).filter(|&i| !in_first[i]).collect();
    sort_nodes(idx, &mut first, options.sort_by);
    sort_nodes(idx, &mut second, options.sort_by);

    let ratio = options.partition_ratio.clamp(0.0, 1.0);
    let first_sweep = TAU * ratio;
    place_on_arc(
        &first,
        options.center,
        options.radius,
        options.start_angle,
        first_sweep,
        true,
        points,
    );
    place_on_arc(
        &second,
        options.center,
        options.radius,
        options.start_angle + first_sweep,
        TAU - first_sweep,
        true,
        points,
    );
}

/// BFS 2-coloring ignoring direction; `true` marks the first partition. On odd cycles the
/// result is only approximate.
pub(crate) fn two_coloring(idx: &GraphIndex<'_>) -> Vec<bool> {
    let n = idx.len();
    let adjacency = idx.undirected_adjacency();
    let mut color: Vec<Option<bool>> = vec![None; n];
    let mut conflicts = 0usize;
    let mut queue: VecDeque<usize> = VecDeque::new();
    for s in 0..n {
        if color[s].is_some() {
            continue;
        }
        color[s] = Some(true);
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            let c = color[v].unwrap_or(true);
            for &w in &adjacency[v] {
                match color[w] {
                    None => {
                        color[w] = Some(!c);
                        queue.push_back(w);
                    }
                    Some(cw) if cw == c => conflicts += 1,
                    Some(_) => {}
                }
            }
        }
    }
    if conflicts > 0 {
        tracing::debug!(conflicts, "graph is not bipartite; partitions are approximate");
    }
    color.into_iter().map(|c| c.unwrap_or(true)).collect()
}

#[cfg(test)]
mod tests {
    use super::{bfs_levels, two_coloring};
    use crate::graph::{Edge, Graph, Node};

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph::new(
            nodes.iter().map(|n| Node::new(*n)).collect(),
            edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| Edge::directed(format!("e{i}"), *s, *t))
                .collect(),
        )
    }

    #[test]
    fn bfs_levels_follow_edge_direction() {
        let g = graph(&["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("c", "d")]);
        let idx = g.index();
        assert_eq!(bfs_levels(&idx), vec![vec![0], vec![1, 2], vec![3]]);
    }

    #[test]
    fn bfs_levels_cover_rootless_cycles() {
        let g = graph(&["x", "a", "b"], &[("a", "b"), ("b", "a")]);
        let idx = g.index();
        let levels = bfs_levels(&idx);
        assert_eq!(levels.iter().map(Vec::len).sum::<usize>(), 3);
        assert_eq!(levels[0], vec![0, 1]);
    }

    #[test]
    fn two_coloring_splits_a_path() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let idx = g.index();
        assert_eq!(two_coloring(&idx), vec![true, false, true]);
    }
}
