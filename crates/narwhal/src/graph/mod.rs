use crate::error::Result;
use indexmap::IndexMap;
use nalgebra as na;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Node or edge identity. Hosts may key their graphs by strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(v) => write!(f, "{v}"),
            Id::Str(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Str(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Str(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector(self) -> na::Vector2<f64> {
        na::Vector2::new(self.x, self.y)
    }

    /// Point at `radius` from `self` in direction `angle` (radians).
    pub fn polar_offset(self, radius: f64, angle: f64) -> Point {
        Point::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

impl From<na::Vector2<f64>> for Point {
    fn from(v: na::Vector2<f64>) -> Self {
        Point::new(v.x, v.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Current position, if the host already placed this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl Node {
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            label: None,
            position: None,
        }
    }

    pub fn at(id: impl Into<Id>, x: f64, y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Self::new(id)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// An edge in either directed (`source`/`target`) or triple (`subject`/`object`) form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Id>,
    /// Opaque host data. Layout code never reads it.
    #[serde(flatten)]
    pub properties: IndexMap<String, serde_json::Value>,
}

impl Edge {
    pub fn directed(id: impl Into<Id>, source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            source: Some(source.into()),
            target: Some(target.into()),
            subject: None,
            object: None,
            properties: IndexMap::new(),
        }
    }

    pub fn triple(id: impl Into<Id>, subject: impl Into<Id>, object: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            source: None,
            target: None,
            subject: Some(subject.into()),
            object: Some(object.into()),
            properties: IndexMap::new(),
        }
    }

    /// Resolves the endpoint pair: `source`/`target` when both are present, else
    /// `subject`/`object`.
    pub fn endpoints(&self) -> Option<(&Id, &Id)> {
        match (&self.source, &self.target) {
            (Some(s), Some(t)) => Some((s, t)),
            _ => match (&self.subject, &self.object) {
                (Some(s), Some(o)) => Some((s, o)),
                _ => None,
            },
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.endpoints().is_some_and(|(a, b)| a == b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn index(&self) -> GraphIndex<'_> {
        GraphIndex::build(self)
    }

    /// Seed positions currently stored on the nodes.
    pub fn positions(&self) -> PositionMap {
        self.nodes
            .iter()
            .filter_map(|n| n.position.map(|p| (n.id.clone(), p)))
            .collect()
    }
}

pub type PositionMap = BTreeMap<Id, Point>;

/// Ordered sample points per edge id.
pub type EdgeGeometryMap = BTreeMap<Id, Vec<Point>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in it {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub positions: PositionMap,
}

impl LayoutResult {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(self.positions.values())
    }

    pub fn center(&self) -> Option<Point> {
        self.bounds().map(|b| b.center())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedEdge {
    /// Position of the edge in `Graph::edges`.
    pub edge: usize,
    pub a: usize,
    pub b: usize,
}

/// Node ids resolved to dense indices, built once per layout call.
#[derive(Debug, Clone)]
pub struct GraphIndex<'a> {
    pub nodes: Vec<&'a Node>,
    pub id_to_idx: FxHashMap<&'a Id, usize>,
    /// Edges whose endpoints both resolved. Self-loops are kept.
    pub edges: Vec<IndexedEdge>,
}

impl<'a> GraphIndex<'a> {
    fn build(graph: &'a Graph) -> Self {
        let mut nodes: Vec<&'a Node> = Vec::with_capacity(graph.nodes.len());
        let mut id_to_idx: FxHashMap<&'a Id, usize> = FxHashMap::default();
        id_to_idx.reserve(graph.nodes.len());
        for n in &graph.nodes {
            if id_to_idx.contains_key(&n.id) {
                tracing::trace!(id = %n.id, "duplicate node id ignored");
                continue;
            }
            id_to_idx.insert(&n.id, nodes.len());
            nodes.push(n);
        }

        let mut edges: Vec<IndexedEdge> = Vec::with_capacity(graph.edges.len());
        for (edge, e) in graph.edges.iter().enumerate() {
            let Some((s, t)) = e.endpoints() else {
                tracing::trace!(edge = %e.id, "edge without endpoints skipped");
                continue;
            };
            let (Some(&a), Some(&b)) = (id_to_idx.get(s), id_to_idx.get(t)) else {
                tracing::trace!(edge = %e.id, "edge with unknown endpoint skipped");
                continue;
            };
            edges.push(IndexedEdge { edge, a, b });
        }

        Self {
            nodes,
            id_to_idx,
            edges,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id(&self, idx: usize) -> &'a Id {
        &self.nodes[idx].id
    }

    /// Outgoing adjacency in edge order, self-loops excluded.
    pub fn out_adjacency(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            if e.a != e.b {
                out[e.a].push(e.b);
            }
        }
        out
    }

    /// Adjacency ignoring direction, in edge order, self-loops excluded.
    pub fn undirected_adjacency(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            if e.a != e.b {
                out[e.a].push(e.b);
                out[e.b].push(e.a);
            }
        }
        out
    }

    pub fn in_degrees(&self) -> Vec<usize> {
        let mut deg = vec![0usize; self.nodes.len()];
        for e in &self.edges {
            if e.a != e.b {
                deg[e.b] += 1;
            }
        }
        deg
    }

    pub fn collect_positions(&self, points: &[Point]) -> PositionMap {
        self.nodes
            .iter()
            .zip(points)
            .map(|(n, p)| (n.id.clone(), *p))
            .collect()
    }
}
