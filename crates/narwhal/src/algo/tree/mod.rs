//! Tidy tree layout (Reingold-Tilford with Buchheim's linear-time contour threads).
//!
//! Pass 1 walks each tree bottom-up, assigning a preliminary coordinate relative to the left
//! sibling and sliding subtrees apart via `shift`/`change` so no two subtrees come closer than
//! `sibling_spacing` at any depth. Pass 2 walks top-down, summing ancestor modifiers into the
//! final coordinate. The depth axis is `depth * level_spacing`; the orientation is applied last.

use crate::graph::{Graph, Id, LayoutResult, Point};
use serde::{Deserialize, Serialize};

pub(crate) mod forest;

use forest::Forest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl Orientation {
    /// Maps `(breadth, depth)` to screen coordinates.
    pub fn apply(self, breadth: f64, depth: f64) -> Point {
        match self {
            Orientation::TB => Point::new(breadth, depth),
            Orientation::BT => Point::new(breadth, -depth),
            Orientation::LR => Point::new(depth, breadth),
            Orientation::RL => Point::new(-depth, breadth),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForestMode {
    /// Trees side by side, `subtree_spacing` apart.
    #[default]
    Separate,
    /// Every tree keeps its own native coordinates.
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeOptions {
    pub sibling_spacing: f64,
    pub level_spacing: f64,
    pub subtree_spacing: f64,
    pub orientation: Orientation,
    pub root: Option<Id>,
    pub forest_mode: ForestMode,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            sibling_spacing: 80.0,
            level_spacing: 100.0,
            subtree_spacing: 120.0,
            orientation: Orientation::TB,
            root: None,
            forest_mode: ForestMode::Separate,
        }
    }
}

pub fn layout(graph: &Graph, options: &TreeOptions) -> LayoutResult {
    let start = std::time::Instant::now();
    let idx = graph.index();
    let forest = Forest::build(&idx, options.root.as_ref());
    let breadth = tidy_breadth(&forest, options.sibling_spacing);

    let mut points = vec![Point::ORIGIN; idx.len()];
    let mut cursor: Option<f64> = None;
    for &root in &forest.roots {
        let members = forest.preorder(root);
        let offset = match options.forest_mode {
            ForestMode::Combined => 0.0,
            ForestMode::Separate => {
                let min = members.iter().map(|&t| breadth[t]).fold(f64::INFINITY, f64::min);
                let max = members
                    .iter()
                    .map(|&t| breadth[t])
                    .fold(f64::NEG_INFINITY, f64::max);
                let offset = cursor.map_or(0.0, |c| c - min);
                cursor = Some(offset + max + options.subtree_spacing);
                offset
            }
        };
        for t in members {
            let node = &forest.nodes[t];
            let depth = node.depth as f64 * options.level_spacing;
            points[node.node] = options.orientation.apply(breadth[t] + offset, depth);
        }
    }

    tracing::debug!(
        nodes = idx.len(),
        trees = forest.roots.len(),
        elapsed = ?start.elapsed(),
        "tree layout"
    );
    LayoutResult {
        positions: idx.collect_positions(&points),
    }
}

/// Final breadth coordinate per tree node, each tree in its own native frame.
pub(crate) fn tidy_breadth(forest: &Forest, distance: f64) -> Vec<f64> {
    let mut tidy = Tidy::new(forest, distance);
    for &root in &forest.roots {
        tidy.first_walk(root);
    }
    let mut out = vec![0.0; forest.len()];
    for &root in &forest.roots {
        tidy.second_walk(root, &mut out);
    }
    out
}

struct Tidy<'f> {
    forest: &'f Forest,
    distance: f64,
    prelim: Vec<f64>,
    modifier: Vec<f64>,
    shift: Vec<f64>,
    change: Vec<f64>,
    thread: Vec<Option<usize>>,
    ancestor: Vec<usize>,
    /// Index among siblings.
    number: Vec<usize>,
    /// Midpoint of the outermost children, for internal nodes.
    midpoint: Vec<f64>,
}

impl<'f> Tidy<'f> {
    fn new(forest: &'f Forest, distance: f64) -> Self {
        let n = forest.len();
        let mut number = vec![0usize; n];
        for node in &forest.nodes {
            for (k, &c) in node.children.iter().enumerate() {
                number[c] = k;
            }
        }
        Self {
            forest,
            distance,
            prelim: vec![0.0; n],
            modifier: vec![0.0; n],
            shift: vec![0.0; n],
            change: vec![0.0; n],
            thread: vec![None; n],
            ancestor: (0..n).collect(),
            number,
            midpoint: vec![0.0; n],
        }
    }

    fn children(&self, v: usize) -> &'f [usize] {
        &self.forest.nodes[v].children
    }

    fn parent(&self, v: usize) -> Option<usize> {
        self.forest.nodes[v].parent
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let p = self.parent(v)?;
        let k = self.number[v];
        (k > 0).then(|| self.children(p)[k - 1])
    }

    fn leftmost_sibling(&self, v: usize) -> usize {
        self.parent(v).map_or(v, |p| self.children(p)[0])
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children(v).first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children(v).last().copied().or(self.thread[v])
    }

    fn first_walk(&mut self, root: usize) {
        for v in self.forest.postorder(root) {
            let children = self.children(v);
            if !children.is_empty() {
                let mut default_ancestor = children[0];
                for &w in children {
                    self.place(w);
                    default_ancestor = self.apportion(w, default_ancestor);
                }
                self.execute_shifts(v);
                let first = children[0];
                let last = children[children.len() - 1];
                self.midpoint[v] = (self.prelim[first] + self.prelim[last]) / 2.0;
            }
        }
        self.place(root);
    }

    /// Sets `v`'s preliminary coordinate once its own subtree is laid out.
    fn place(&mut self, v: usize) {
        let is_leaf = self.children(v).is_empty();
        match self.left_sibling(v) {
            Some(l) => {
                self.prelim[v] = self.prelim[l] + self.distance;
                if !is_leaf {
                    self.modifier[v] = self.prelim[v] - self.midpoint[v];
                }
            }
            None => {
                self.prelim[v] = if is_leaf { 0.0 } else { self.midpoint[v] };
            }
        }
    }

    fn apportion(&mut self, v: usize, default_ancestor: usize) -> usize {
        let Some(w) = self.left_sibling(v) else {
            return default_ancestor;
        };
        let mut default_ancestor = default_ancestor;

        // i/o: inner/outer contour; p: subtree of `v`; m: siblings left of `v`
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.leftmost_sibling(vip);
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        loop {
            let (Some(nr), Some(nl)) = (self.next_right(vim), self.next_left(vip)) else {
                break;
            };
            vim = nr;
            vip = nl;
            // Contours of equal depth: the outer ones exist whenever the inner ones do.
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vom = om;
            vop = op;
            self.ancestor[vop] = v;
            let shift = (self.prelim[vim] + sim) - (self.prelim[vip] + sip) + self.distance;
            if shift > 0.0 {
                let a = self.pick_ancestor(vim, v, default_ancestor);
                self.move_subtree(a, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];
        }

        if let Some(nr) = self.next_right(vim) {
            if self.next_right(vop).is_none() {
                self.thread[vop] = Some(nr);
                self.modifier[vop] += sim - sop;
            }
        }
        if let Some(nl) = self.next_left(vip) {
            if self.next_left(vom).is_none() {
                self.thread[vom] = Some(nl);
                self.modifier[vom] += sip - som;
                default_ancestor = v;
            }
        }
        default_ancestor
    }

    fn pick_ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let a = self.ancestor[vim];
        if self.parent(a).is_some() && self.parent(a) == self.parent(v) {
            a
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.number[wp].saturating_sub(self.number[wm]).max(1) as f64;
        self.change[wp] -= shift / subtrees;
        self.shift[wp] += shift;
        self.change[wm] += shift / subtrees;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in self.children(v).iter().rev() {
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    fn second_walk(&self, root: usize, out: &mut [f64]) {
        let mut stack: Vec<(usize, f64)> = vec![(root, 0.0)];
        while let Some((v, m)) = stack.pop() {
            out[v] = self.prelim[v] + m;
            let child_m = m + self.modifier[v];
            stack.extend(self.children(v).iter().map(|&c| (c, child_m)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Orientation, tidy_breadth};
    use crate::algo::tree::forest::Forest;
    use crate::graph::{Edge, Graph, Node};

    fn chain_graph(edges: &[(&str, &str)]) -> Graph {
        let mut ids: Vec<&str> = Vec::new();
        for (s, t) in edges {
            for id in [s, t] {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        Graph::new(
            ids.into_iter().map(Node::new).collect(),
            edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| Edge::directed(format!("e{i}"), *s, *t))
                .collect(),
        )
    }

    #[test]
    fn orientation_swaps_axes() {
        assert_eq!(Orientation::TB.apply(1.0, 2.0).x, 1.0);
        assert_eq!(Orientation::BT.apply(1.0, 2.0).y, -2.0);
        assert_eq!(Orientation::LR.apply(1.0, 2.0).x, 2.0);
        assert_eq!(Orientation::RL.apply(1.0, 2.0).x, -2.0);
    }

    #[test]
    fn subtrees_never_overlap_at_any_depth() {
        // Two wide subtrees under one root, plus a small middle one.
        let g = chain_graph(&[
            ("r", "a"),
            ("r", "m"),
            ("r", "b"),
            ("a", "a1"),
            ("a", "a2"),
            ("a", "a3"),
            ("b", "b1"),
            ("b", "b2"),
            ("b", "b3"),
            ("a3", "x"),
            ("b1", "y"),
        ]);
        let idx = g.index();
        let f = Forest::build(&idx, None);
        let x = tidy_breadth(&f, 10.0);
        let max_depth = f.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        for d in 0..=max_depth {
            let mut row: Vec<f64> = f
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.depth == d)
                .map(|(t, _)| x[t])
                .collect();
            row.sort_by(f64::total_cmp);
            for pair in row.windows(2) {
                assert!(pair[1] - pair[0] >= 10.0 - 1e-9, "depth {d}: {row:?}");
            }
        }
    }

    #[test]
    fn parent_is_centered_over_children() {
        let g = chain_graph(&[("r", "a"), ("r", "b"), ("r", "c"), ("b", "b1"), ("b", "b2")]);
        let idx = g.index();
        let f = Forest::build(&idx, None);
        let x = tidy_breadth(&f, 20.0);
        for (t, n) in f.nodes.iter().enumerate() {
            if let (Some(first), Some(last)) = (n.children.first(), n.children.last()) {
                assert!(((x[*first] + x[*last]) / 2.0 - x[t]).abs() < 1e-9);
            }
        }
    }
}
