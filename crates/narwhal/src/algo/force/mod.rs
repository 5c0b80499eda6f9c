//! Pairwise-repulsion / spring-attraction simulation.
//!
//! Every step is O(n²) in the node count; there is no spatial partitioning and no convergence
//! early-exit. Callers with large graphs lower `iterations` instead.

use crate::graph::{Graph, Id, LayoutResult, Point, PositionMap};
use crate::rng::XorShift64Star;
use serde::{Deserialize, Serialize};

pub mod worker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceOptions {
    /// Exact number of simulation steps.
    pub iterations: usize,
    /// Rest length of every edge spring.
    pub node_spacing: f64,
    pub repulsion_strength: f64,
    pub attraction_strength: f64,
    /// Per-step multiplier turning accumulated force into displacement.
    pub damping: f64,
    /// Size of the area unplaced nodes are scattered into, centered on the origin.
    pub initial_width: f64,
    pub initial_height: f64,
    pub random_seed: u64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            iterations: 300,
            node_spacing: 100.0,
            repulsion_strength: 5000.0,
            attraction_strength: 0.01,
            damping: 0.9,
            initial_width: 1000.0,
            initial_height: 1000.0,
            random_seed: 1,
        }
    }
}

/// Force constants for one step, shared by the force, worker and adaptive layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    pub node_spacing: f64,
    pub repulsion_strength: f64,
    pub attraction_strength: f64,
    pub damping: f64,
}

impl From<&ForceOptions> for ForceParams {
    fn from(o: &ForceOptions) -> Self {
        Self {
            node_spacing: o.node_spacing,
            repulsion_strength: o.repulsion_strength,
            attraction_strength: o.attraction_strength,
            damping: o.damping,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForceSimulation {
    ids: Vec<Id>,
    points: Vec<Point>,
    edges: Vec<(usize, usize)>,
    /// Per-node displacement scale; `1.0` is full mobility.
    mobility: Vec<f64>,
    forces: Vec<Point>,
    params: ForceParams,
}

impl ForceSimulation {
    /// Distance floor for both force classes.
    pub const MIN_DISTANCE: f64 = 1.0;

    // Coincident nodes have no separating vector; spread them along golden-angle directions.
    const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

    pub fn new(graph: &Graph, options: &ForceOptions) -> Self {
        let idx = graph.index();
        let mut rng = XorShift64Star::new(options.random_seed);
        let half_w = options.initial_width.abs() / 2.0;
        let half_h = options.initial_height.abs() / 2.0;

        let points = idx
            .nodes
            .iter()
            .map(|n| match n.position {
                Some(p) if p.is_finite() => p,
                _ => Point::new(
                    rng.next_in_range(-half_w, half_w),
                    rng.next_in_range(-half_h, half_h),
                ),
            })
            .collect::<Vec<_>>();
        let ids = idx.nodes.iter().map(|n| n.id.clone()).collect();
        let edges = idx
            .edges
            .iter()
            .filter(|e| e.a != e.b)
            .map(|e| (e.a, e.b))
            .collect();

        Self::from_parts(ids, points, edges, ForceParams::from(options))
    }

    pub(crate) fn from_parts(
        ids: Vec<Id>,
        points: Vec<Point>,
        edges: Vec<(usize, usize)>,
        params: ForceParams,
    ) -> Self {
        let n = points.len();
        Self {
            ids,
            points,
            edges,
            mobility: vec![1.0; n],
            forces: vec![Point::ORIGIN; n],
            params,
        }
    }

    pub(crate) fn set_mobility(&mut self, mobility: Vec<f64>) {
        debug_assert_eq!(mobility.len(), self.points.len());
        self.mobility = mobility;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn positions(&self) -> PositionMap {
        self.ids
            .iter()
            .cloned()
            .zip(self.points.iter().copied())
            .collect()
    }

    /// Runs one full step: repulsion, attraction, then a damped position update.
    pub fn step(&mut self) {
        let n = self.points.len();
        if n == 0 {
            return;
        }
        let p = self.params;
        self.forces.iter_mut().for_each(|f| *f = Point::ORIGIN);

        for i in 0..n {
            for j in (i + 1)..n {
                let (dir, dist) = self.separation(i, j);
                let magnitude = p.repulsion_strength / (dist * dist);
                let f = dir * magnitude;
                self.forces[i] = self.forces[i] + f;
                self.forces[j] = self.forces[j] - f;
            }
        }

        for &(a, b) in &self.edges {
            let (dir, dist) = self.separation(b, a);
            // Positive pulls `a` toward `b`; negative pushes them apart.
            let magnitude = (dist - p.node_spacing) * p.attraction_strength;
            let f = dir * magnitude;
            self.forces[a] = self.forces[a] + f;
            self.forces[b] = self.forces[b] - f;
        }

        for ((pt, f), m) in self.points.iter_mut().zip(&self.forces).zip(&self.mobility) {
            let scale = p.damping * m;
            pt.x += f.x * scale;
            pt.y += f.y * scale;
        }
    }

    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
    }

    /// Unit vector from `to` toward `from` and the clamped distance between them.
    fn separation(&self, from: usize, to: usize) -> (Point, f64) {
        let d = self.points[from] - self.points[to];
        let raw = d.x.hypot(d.y);
        let dist = raw.max(Self::MIN_DISTANCE);
        if raw > 0.0 && raw.is_finite() {
            (d * (1.0 / raw), dist)
        } else {
            let angle = (from + to) as f64 * Self::GOLDEN_ANGLE;
            let sign = if from < to { 1.0 } else { -1.0 };
            (Point::new(angle.cos(), angle.sin()) * sign, dist)
        }
    }
}

pub fn layout(graph: &Graph, options: &ForceOptions) -> LayoutResult {
    let start = std::time::Instant::now();
    let mut sim = ForceSimulation::new(graph, options);
    sim.run(options.iterations);
    tracing::debug!(
        nodes = sim.len(),
        edges = sim.edges.len(),
        iterations = options.iterations,
        elapsed = ?start.elapsed(),
        "force layout"
    );
    LayoutResult {
        positions: sim.positions(),
    }
}
