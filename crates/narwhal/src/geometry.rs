//! Point and Bezier helpers shared by the layouts and edge routers.

use crate::graph::Point;
use crate::multi_edge::BundleDescriptor;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Hermite smoothstep on `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    lerp_point(a, b, 0.5)
}

pub fn quadratic_bezier(p0: Point, c: Point, p1: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * c.x + t * t * p1.x,
        u * u * p0.y + 2.0 * u * t * c.y + t * t * p1.y,
    )
}

pub fn cubic_bezier(p0: Point, c0: Point, c1: Point, p1: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * c0.x + c * c1.x + d * p1.x,
        a * p0.y + b * c0.y + c * c1.y + d * p1.y,
    )
}

/// `segments + 1` evenly spaced samples along a quadratic curve, endpoints included.
pub fn sample_quadratic(p0: Point, c: Point, p1: Point, segments: usize) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| quadratic_bezier(p0, c, p1, i as f64 / segments as f64))
        .collect()
}

/// `segments + 1` evenly spaced samples on the straight line `a -> b`.
pub fn subdivide_line(a: Point, b: Point, segments: usize) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            if i == segments {
                b
            } else {
                lerp_point(a, b, i as f64 / segments as f64)
            }
        })
        .collect()
}

/// Unit normal of `a -> b`, rotated counter-clockwise. `None` for a degenerate segment.
pub fn unit_normal(a: Point, b: Point) -> Option<Point> {
    let d = b - a;
    let len = d.x.hypot(d.y);
    if len <= f64::EPSILON || !len.is_finite() {
        return None;
    }
    Some(Point::new(-d.y / len, d.x / len))
}

/// Quadratic control point for an edge bent by `curvature` (relative to its length) and shifted
/// sideways by `offset` (absolute units).
pub fn curve_control_point(source: Point, target: Point, curvature: f64, offset: f64) -> Point {
    let mid = midpoint(source, target);
    let Some(n) = unit_normal(source, target) else {
        return mid;
    };
    let bend = curvature * source.distance(target) + offset;
    mid + n * bend
}

/// Renderer-facing polyline for a parallel edge.
pub fn edge_path(
    source: Point,
    target: Point,
    descriptor: &BundleDescriptor,
    segments: usize,
) -> Vec<Point> {
    if descriptor.curvature == 0.0 && descriptor.parallel_offset == 0.0 {
        return vec![source, target];
    }
    let c = curve_control_point(
        source,
        target,
        descriptor.curvature,
        descriptor.parallel_offset,
    );
    sample_quadratic(source, c, target, segments)
}

/// Projects `p` onto the infinite line through `a` and `b`; returns the line parameter and the
/// projected point.
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Option<(f64, Point)> {
    let d = (b - a).to_vector();
    let len2 = d.norm_squared();
    if len2 <= f64::EPSILON {
        return None;
    }
    let t = (p - a).to_vector().dot(&d) / len2;
    Some((t, lerp_point(a, b, t)))
}

pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Point> {
    let mut sum = Point::ORIGIN;
    let mut n = 0usize;
    for p in points {
        sum = sum + *p;
        n += 1;
    }
    (n > 0).then(|| sum * (1.0 / n as f64))
}
