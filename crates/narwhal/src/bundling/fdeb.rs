//! Force-directed edge bundling.
//!
//! Every edge is cut into `subdivisions` equal segments. Interior samples are pulled toward the
//! matching samples of compatible edges, with a step size that cools linearly to zero, then
//! blended back toward their straight-line origin by `1 - strength`. Endpoints never move.

use super::{EdgeBundlingOptions, ResolvedEdge};
use crate::geometry::{lerp_point, midpoint, project_onto_line, subdivide_line};
use crate::graph::{EdgeGeometryMap, Point};

/// Pairwise score in `[0, 1]`: product of angle, scale, position and visibility terms.
pub fn compatibility(p0: Point, p1: Point, q0: Point, q1: Point) -> f64 {
    let p = (p1 - p0).to_vector();
    let q = (q1 - q0).to_vector();
    let lp = p.norm();
    let lq = q.norm();
    if lp <= f64::EPSILON || lq <= f64::EPSILON {
        return 0.0;
    }

    let angle = (p.dot(&q) / (lp * lq)).abs();

    let (lmin, lmax) = if lp < lq { (lp, lq) } else { (lq, lp) };
    let scale = 2.0 / (lmax / lmin + lmin / lmax);

    let lavg = (lp + lq) / 2.0;
    let mp = midpoint(p0, p1);
    let mq = midpoint(q0, q1);
    let position = lavg / (lavg + mp.distance(mq));

    let visibility = visibility(p0, p1, q0, q1).max(visibility(q0, q1, p0, p1));

    angle * scale * position * visibility
}

/// How squarely `q`'s midpoint projects onto segment `p`: `1` at `p`'s midpoint, `0` at or
/// beyond its ends.
fn visibility(p0: Point, p1: Point, q0: Point, q1: Point) -> f64 {
    let len = p0.distance(p1);
    let Some((_, proj)) = project_onto_line(midpoint(q0, q1), p0, p1) else {
        return 0.0;
    };
    (1.0 - 2.0 * midpoint(p0, p1).distance(proj) / len).max(0.0)
}

pub(crate) fn bundle(edges: &[ResolvedEdge<'_>], options: &EdgeBundlingOptions) -> EdgeGeometryMap {
    let segments = options.subdivisions.max(1);
    let original: Vec<Vec<Point>> = edges
        .iter()
        .map(|e| subdivide_line(e.from, e.to, segments))
        .collect();

    let partners = compatible_partners(edges, options.compatibility_threshold);
    let points = relax(&original, &partners, options);

    edges
        .iter()
        .zip(points)
        .map(|(e, pts)| (e.id.clone(), pts))
        .collect()
}

/// For each edge, `(other edge, score)` pairs at or above `threshold`.
fn compatible_partners(edges: &[ResolvedEdge<'_>], threshold: f64) -> Vec<Vec<(usize, f64)>> {
    let mut partners = vec![Vec::new(); edges.len()];
    let mut pairs = 0usize;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let c = compatibility(edges[i].from, edges[i].to, edges[j].from, edges[j].to);
            if c >= threshold && c > 0.0 {
                partners[i].push((j, c));
                partners[j].push((i, c));
                pairs += 1;
            }
        }
    }
    tracing::trace!(edges = edges.len(), pairs, "compatible edge pairs");
    partners
}

fn relax(
    original: &[Vec<Point>],
    partners: &[Vec<(usize, f64)>],
    options: &EdgeBundlingOptions,
) -> Vec<Vec<Point>> {
    let strength = options.strength.clamp(0.0, 1.0);
    let mut current: Vec<Vec<Point>> = original.to_vec();
    let iterations = options.iterations;

    for round in 0..iterations {
        let step = options.step_size * (1.0 - round as f64 / iterations as f64);
        let mut next = current.clone();
        for (i, pts) in next.iter_mut().enumerate() {
            if partners[i].is_empty() {
                continue;
            }
            let last = pts.len() - 1;
            for k in 1..last {
                let here = current[i][k];
                let mut force = Point::ORIGIN;
                for &(j, c) in &partners[i] {
                    force = force + (current[j][k] - here) * c;
                }
                let moved = here + force * step;
                pts[k] = lerp_point(original[i][k], moved, strength);
            }
        }
        current = next;
    }
    current
}
