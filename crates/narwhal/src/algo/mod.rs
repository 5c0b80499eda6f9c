pub mod adaptive;
pub mod circular;
pub mod force;
pub mod geometric;
pub mod radial;
pub mod tree;

use crate::error::Result;
use crate::graph::GraphIndex;
use serde::{Deserialize, Serialize};

pub use adaptive::AdaptiveOptions;
pub use circular::{CircularOptions, CircularVariant, Partitions};
pub use force::ForceOptions;
pub use geometric::{GeometricOptions, GeometricVariant, HexOrientation};
pub use radial::{AngularSubdivision, RadialOptions};
pub use tree::{ForestMode, Orientation, TreeOptions};

/// Position layouts selectable through [`crate::layout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Algorithm {
    Force(ForceOptions),
    Tree(TreeOptions),
    Radial(RadialOptions),
    Circular(CircularOptions),
    Geometric(GeometricOptions),
}

impl Algorithm {
    /// Parses `{"type": "tree", "siblingSpacing": 60, ...}`; omitted fields take defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Force(_) => "force",
            Algorithm::Tree(_) => "tree",
            Algorithm::Radial(_) => "radial",
            Algorithm::Circular(_) => "circular",
            Algorithm::Geometric(_) => "geometric",
        }
    }
}

/// Node ordering for ring and tiling layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Label,
    /// Accepted for configuration compatibility; currently keeps input order.
    Degree,
    /// Accepted for configuration compatibility; currently keeps input order.
    Connectivity,
}

/// Stable in-place sort of node indices.
pub(crate) fn sort_nodes(idx: &GraphIndex<'_>, order: &mut [usize], key: Option<SortKey>) {
    match key {
        None => {}
        Some(SortKey::Id) => order.sort_by(|&a, &b| idx.id(a).cmp(idx.id(b))),
        Some(SortKey::Label) => order.sort_by_cached_key(|&i| {
            let n = idx.nodes[i];
            n.label.clone().unwrap_or_else(|| n.id.to_string())
        }),
        Some(k @ (SortKey::Degree | SortKey::Connectivity)) => {
            tracing::trace!(key = ?k, "sort key has no effect; keeping input order");
        }
    }
}
