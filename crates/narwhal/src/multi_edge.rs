//! Curvature and offset assignment for parallel edges.
//!
//! Edges sharing an endpoint pair form a bundle; each gets a deterministic curvature and
//! sideways offset so a renderer can draw them apart without any simulation. In directed mode a
//! reciprocal pair `A -> B` / `B -> A` shares one bundle as soon as either direction holds more
//! than one edge, so a lone reverse edge is curved away from the forward ones.

use crate::graph::{Edge, Id};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultiEdgeOptions {
    /// Directed graphs key bundles by ordered pair, undirected ones by unordered pair.
    pub directed: bool,
    pub base_curvature: f64,
    pub max_curvature: f64,
    /// Offset between neighboring edges of a bundle.
    pub edge_spacing: f64,
}

impl Default for MultiEdgeOptions {
    fn default() -> Self {
        Self {
            directed: true,
            base_curvature: 0.2,
            max_curvature: 0.5,
            edge_spacing: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDescriptor {
    pub curvature: f64,
    pub parallel_offset: f64,
    /// 0-based rank within the bundle.
    pub bundle_index: usize,
    pub bundle_size: usize,
}

impl BundleDescriptor {
    pub const STRAIGHT: BundleDescriptor = BundleDescriptor {
        curvature: 0.0,
        parallel_offset: 0.0,
        bundle_index: 0,
        bundle_size: 1,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    pub bundle_count: usize,
    pub max_bundle_size: usize,
    /// Mean size over bundles with more than one edge; `0.0` when there are none.
    pub mean_multi_edge_bundle_size: f64,
}

/// `(curvature, offset)` for each rank of a bundle of size `k`.
pub fn distribute(k: usize, options: &MultiEdgeOptions) -> Vec<(f64, f64)> {
    let base = options.base_curvature;
    let spacing = options.edge_spacing;
    match k {
        0 => Vec::new(),
        1 => vec![(0.0, 0.0)],
        2 => vec![(-base, -spacing / 2.0), (base, spacing / 2.0)],
        _ => {
            let center = (k - 1) as f64 / 2.0;
            let cap = options.max_curvature.abs();
            (0..k)
                .map(|i| {
                    let d = i as f64 - center;
                    if d == 0.0 {
                        return (0.0, 0.0);
                    }
                    let magnitude = (base * d.abs() / center).min(cap);
                    (magnitude.copysign(d), d * spacing)
                })
                .collect()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MultiEdgeBundler {
    options: MultiEdgeOptions,
    descriptors: FxHashMap<Id, BundleDescriptor>,
    edge_bundle: FxHashMap<Id, usize>,
    bundles: Vec<Vec<Id>>,
}

impl MultiEdgeBundler {
    pub fn new(options: MultiEdgeOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &MultiEdgeOptions {
        &self.options
    }

    /// Recomputes every bundle from scratch. Edges without resolvable endpoints are ignored.
    pub fn compute(&mut self, edges: &[Edge]) {
        self.descriptors.clear();
        self.edge_bundle.clear();
        self.bundles.clear();

        let mut groups: IndexMap<(&Id, &Id), Vec<&Id>> = IndexMap::new();
        let mut loops: Vec<&Id> = Vec::new();
        for e in edges {
            let Some((a, b)) = e.endpoints() else {
                continue;
            };
            if a == b {
                loops.push(&e.id);
                continue;
            }
            let key = if self.options.directed || a <= b {
                (a, b)
            } else {
                (b, a)
            };
            groups.entry(key).or_default().push(&e.id);
        }

        let mut consumed = vec![false; groups.len()];
        for g in 0..groups.len() {
            if consumed[g] {
                continue;
            }
            consumed[g] = true;
            let Some((&(a, b), forward)) = groups.get_index(g) else {
                continue;
            };
            let mut members: Vec<&Id> = forward.clone();
            if self.options.directed {
                if let Some((r, _, reverse)) = groups.get_full(&(b, a)) {
                    if !consumed[r] && (forward.len() > 1 || reverse.len() > 1) {
                        consumed[r] = true;
                        members.extend(reverse.iter().copied());
                    }
                }
            }
            self.push_bundle(&members);
        }

        for id in loops {
            self.push_bundle(&[id]);
        }

        tracing::debug!(
            edges = edges.len(),
            bundles = self.bundles.len(),
            "multi-edge bundles computed"
        );
    }

    fn push_bundle(&mut self, members: &[&Id]) {
        let slot = self.bundles.len();
        let k = members.len();
        for (i, (&id, (curvature, offset))) in members
            .iter()
            .zip(distribute(k, &self.options))
            .enumerate()
        {
            self.descriptors.insert(
                id.clone(),
                BundleDescriptor {
                    curvature,
                    parallel_offset: offset,
                    bundle_index: i,
                    bundle_size: k,
                },
            );
            self.edge_bundle.insert(id.clone(), slot);
        }
        self.bundles
            .push(members.iter().map(|&id| id.clone()).collect());
    }

    pub fn descriptor(&self, edge: &Id) -> Option<&BundleDescriptor> {
        self.descriptors.get(edge)
    }

    pub fn descriptors(&self) -> &FxHashMap<Id, BundleDescriptor> {
        &self.descriptors
    }

    /// Every edge in the same bundle as `edge`, itself included, in rank order.
    pub fn bundle_of(&self, edge: &Id) -> Option<&[Id]> {
        let &slot = self.edge_bundle.get(edge)?;
        self.bundles.get(slot).map(Vec::as_slice)
    }

    pub fn is_multi_edge(&self, edge: &Id) -> bool {
        self.descriptor(edge).is_some_and(|d| d.bundle_size > 1)
    }

    pub fn stats(&self) -> BundleStats {
        let multi: Vec<usize> = self
            .bundles
            .iter()
            .map(Vec::len)
            .filter(|&k| k > 1)
            .collect();
        BundleStats {
            bundle_count: self.bundles.len(),
            max_bundle_size: self.bundles.iter().map(Vec::len).max().unwrap_or(0),
            mean_multi_edge_bundle_size: if multi.is_empty() {
                0.0
            } else {
                multi.iter().sum::<usize>() as f64 / multi.len() as f64
            },
        }
    }
}
