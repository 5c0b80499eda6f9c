//! Edge bundling: routes edges through shared paths to reduce clutter.
//!
//! Both algorithms read node positions and emit one ordered point list per edge. Edges whose
//! endpoints have no position are left out of the result.

use crate::graph::{Edge, EdgeGeometryMap, Id, Point, PositionMap};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod fdeb;
pub mod hierarchical;

/// Child -> parent links used by hierarchical bundling.
pub type AncestorMap = FxHashMap<Id, Id>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BundlingAlgorithm {
    Hierarchical,
    #[default]
    ForceDirected,
    /// Declared for configuration compatibility; runs the force-directed algorithm.
    KernelDensity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeBundlingOptions {
    pub algorithm: BundlingAlgorithm,
    /// `0` keeps edges straight, `1` applies the full bundling pull.
    pub strength: f64,
    /// Segments per edge.
    pub subdivisions: usize,
    /// Force-directed: relaxation rounds.
    pub iterations: usize,
    /// Force-directed: pairs scoring below this never interact.
    pub compatibility_threshold: f64,
    /// Force-directed: step size of the first round; decays linearly to zero.
    pub step_size: f64,
}

impl Default for EdgeBundlingOptions {
    fn default() -> Self {
        Self {
            algorithm: BundlingAlgorithm::ForceDirected,
            strength: 0.85,
            subdivisions: 10,
            iterations: 60,
            compatibility_threshold: 0.6,
            step_size: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdgeBundler {
    options: EdgeBundlingOptions,
    ancestors: Option<AncestorMap>,
}

impl EdgeBundler {
    pub fn new(options: EdgeBundlingOptions) -> Self {
        Self {
            options,
            ancestors: None,
        }
    }

    pub fn with_ancestors(mut self, ancestors: AncestorMap) -> Self {
        self.ancestors = Some(ancestors);
        self
    }

    pub fn options(&self) -> &EdgeBundlingOptions {
        &self.options
    }

    pub fn bundle(&self, edges: &[Edge], positions: &PositionMap) -> EdgeGeometryMap {
        let start = std::time::Instant::now();
        let resolved = resolve(edges, positions);
        let out = match self.options.algorithm {
            BundlingAlgorithm::Hierarchical => {
                hierarchical::bundle(&resolved, positions, self.ancestors.as_ref(), &self.options)
            }
            BundlingAlgorithm::ForceDirected => fdeb::bundle(&resolved, &self.options),
            BundlingAlgorithm::KernelDensity => {
                tracing::debug!("kernel-density bundling runs the force-directed algorithm");
                fdeb::bundle(&resolved, &self.options)
            }
        };
        tracing::debug!(
            edges = edges.len(),
            routed = out.len(),
            algorithm = ?self.options.algorithm,
            elapsed = ?start.elapsed(),
            "edge bundling"
        );
        out
    }
}

/// An edge whose endpoints both have positions.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedEdge<'a> {
    pub id: &'a Id,
    pub source: &'a Id,
    pub target: &'a Id,
    pub from: Point,
    pub to: Point,
}

pub(crate) fn resolve<'a>(edges: &'a [Edge], positions: &PositionMap) -> Vec<ResolvedEdge<'a>> {
    edges
        .iter()
        .filter_map(|e| {
            let (source, target) = e.endpoints()?;
            let (Some(&from), Some(&to)) = (positions.get(source), positions.get(target)) else {
                tracing::trace!(edge = %e.id, "edge endpoint has no position; skipped");
                return None;
            };
            Some(ResolvedEdge {
                id: &e.id,
                source,
                target,
                from,
                to,
            })
        })
        .collect()
}
