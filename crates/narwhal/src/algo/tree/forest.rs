//! Rooted forest built from the edge list, stored as an index arena.

use crate::graph::{GraphIndex, Id};

#[derive(Debug, Clone)]
pub(crate) struct TreeNode {
    /// Index into the `GraphIndex` node list.
    pub node: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Forest {
    pub nodes: Vec<TreeNode>,
    pub roots: Vec<usize>,
}

impl Forest {
    /// Builds parent -> child trees by DFS over edge direction.
    ///
    /// Roots are tried in order: the requested root, every node without incoming edges, then any
    /// node still unvisited (components that are pure cycles). An edge into an already visited
    /// node is dropped, so every node appears exactly once.
    pub(crate) fn build(idx: &GraphIndex<'_>, root: Option<&Id>) -> Self {
        let n = idx.len();
        let adjacency = idx.out_adjacency();
        let in_degrees = idx.in_degrees();

        let mut candidates: Vec<usize> = Vec::new();
        if let Some(id) = root {
            match idx.id_to_idx.get(id) {
                Some(&r) => candidates.push(r),
                None => tracing::debug!(root = %id, "configured root not in graph; ignoring"),
            }
        }
        candidates.extend((0..n).filter(|&i| in_degrees[i] == 0));

        let mut forest = Forest {
            nodes: Vec::with_capacity(n),
            roots: Vec::new(),
        };
        let mut visited = vec![false; n];
        let mut dropped = 0usize;
        for c in candidates {
            if !visited[c] {
                dropped += forest.grow(c, &adjacency, &mut visited);
            }
        }
        for i in 0..n {
            if !visited[i] {
                tracing::trace!(node = %idx.id(i), "no root reaches node; using it as a root");
                dropped += forest.grow(i, &adjacency, &mut visited);
            }
        }
        if dropped > 0 {
            tracing::trace!(dropped, "non-tree edges dropped");
        }
        forest
    }

    fn push(&mut self, node: usize, parent: Option<usize>, depth: usize) -> usize {
        let t = self.nodes.len();
        self.nodes.push(TreeNode {
            node,
            parent,
            children: Vec::new(),
            depth,
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(t);
        }
        t
    }

    /// Returns the number of edges dropped because their target was already visited.
    fn grow(&mut self, root: usize, adjacency: &[Vec<usize>], visited: &mut [bool]) -> usize {
        let mut dropped = 0usize;
        visited[root] = true;
        let r = self.push(root, None, 0);
        self.roots.push(r);

        // (tree index, next adjacency slot)
        let mut stack: Vec<(usize, usize)> = vec![(r, 0)];
        while let Some(&(t, slot)) = stack.last() {
            let g = self.nodes[t].node;
            let Some(&child) = adjacency[g].get(slot) else {
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if visited[child] {
                dropped += 1;
                continue;
            }
            visited[child] = true;
            let depth = self.nodes[t].depth + 1;
            let c = self.push(child, Some(t), depth);
            stack.push((c, 0));
        }
        dropped
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Children before parents, siblings left to right.
    pub(crate) fn postorder(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(&(t, slot)) = stack.last() {
            if let Some(&c) = self.nodes[t].children.get(slot) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                stack.push((c, 0));
            } else {
                out.push(t);
                stack.pop();
            }
        }
        out
    }

    /// Parents before children.
    pub(crate) fn preorder(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(t) = stack.pop() {
            out.push(t);
            stack.extend(self.nodes[t].children.iter().rev().copied());
        }
        out
    }

    /// Number of leaves under each node (a leaf counts itself).
    pub(crate) fn leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for &r in &self.roots {
            for t in self.postorder(r) {
                let children = &self.nodes[t].children;
                counts[t] = if children.is_empty() {
                    1
                } else {
                    children.iter().map(|&c| counts[c]).sum()
                };
            }
        }
        counts
    }
}
