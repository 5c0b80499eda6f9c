#![forbid(unsafe_code)]

//! Headless node layout and edge geometry for graph visualization.
//!
//! `narwhal` computes positions (force-directed, tidy tree, radial, circular, geometric and
//! adaptive layouts), per-edge geometry for parallel edges and edge bundling, and frame-driven
//! transitions between position sets. It never renders anything.

pub mod algo;
pub mod animate;
pub mod bundling;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod multi_edge;

mod rng;

pub use algo::force::worker::{ForceJob, ForceWorker, WorkerEvent, WorkerEvents, finish};
pub use algo::{
    AdaptiveOptions, Algorithm, CircularOptions, ForceOptions, GeometricOptions, RadialOptions,
    SortKey, TreeOptions,
};
pub use animate::{AnimationOptions, AnimationOutcome, Animator, Easing, Transition};
pub use bundling::{AncestorMap, BundlingAlgorithm, EdgeBundler, EdgeBundlingOptions};
pub use error::{Error, Result};
pub use graph::{
    Bounds, Edge, EdgeGeometryMap, Graph, Id, LayoutResult, Node, Point, PositionMap,
};
pub use multi_edge::{BundleDescriptor, BundleStats, MultiEdgeBundler, MultiEdgeOptions};

/// Headless layout entry point.
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> LayoutResult {
    tracing::debug!(
        algorithm = algorithm.name(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "layout"
    );
    match algorithm {
        Algorithm::Force(opts) => algo::force::layout(graph, opts),
        Algorithm::Tree(opts) => algo::tree::layout(graph, opts),
        Algorithm::Radial(opts) => algo::radial::layout(graph, opts),
        Algorithm::Circular(opts) => algo::circular::layout(graph, opts),
        Algorithm::Geometric(opts) => algo::geometric::layout(graph, opts),
    }
}
