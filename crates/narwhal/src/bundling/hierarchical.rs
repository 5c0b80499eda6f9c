//! Hierarchical bundling: each edge bends through the lowest common ancestor of its endpoints.

use super::{AncestorMap, EdgeBundlingOptions, ResolvedEdge};
use crate::geometry::{lerp, lerp_point, smoothstep};
use crate::graph::{EdgeGeometryMap, Id, Point, PositionMap};
use rustc_hash::FxHashSet;

pub(crate) fn bundle(
    edges: &[ResolvedEdge<'_>],
    positions: &PositionMap,
    ancestors: Option<&AncestorMap>,
    options: &EdgeBundlingOptions,
) -> EdgeGeometryMap {
    let Some(ancestors) = ancestors else {
        tracing::debug!("no ancestor map; hierarchical bundling keeps edges straight");
        return edges
            .iter()
            .map(|e| (e.id.clone(), vec![e.from, e.to]))
            .collect();
    };

    let half = (options.subdivisions / 2).max(1);
    edges
        .iter()
        .map(|e| {
            let via = lowest_common_ancestor(e.source, e.target, ancestors)
                .and_then(|lca| positions.get(lca).copied());
            let path = match via {
                Some(l) => {
                    let mut path = half_path(e.from, l, half, options.strength);
                    path.extend(half_path(l, e.to, half, options.strength).into_iter().skip(1));
                    path
                }
                None => vec![e.from, e.to],
            };
            (e.id.clone(), path)
        })
        .collect()
}

/// `id` followed by its ancestors, stopping at the first repeat.
fn ancestor_chain<'a>(id: &'a Id, ancestors: &'a AncestorMap) -> Vec<&'a Id> {
    let mut chain = vec![id];
    let mut seen: FxHashSet<&Id> = FxHashSet::default();
    seen.insert(id);
    let mut cur = id;
    while let Some(parent) = ancestors.get(cur) {
        if !seen.insert(parent) {
            break;
        }
        chain.push(parent);
        cur = parent;
    }
    chain
}

/// First entry of `target`'s chain that is also in `source`'s chain. Both chains include the
/// endpoint itself.
pub fn lowest_common_ancestor<'a>(
    source: &'a Id,
    target: &'a Id,
    ancestors: &'a AncestorMap,
) -> Option<&'a Id> {
    let from_source: FxHashSet<&Id> = ancestor_chain(source, ancestors).into_iter().collect();
    ancestor_chain(target, ancestors)
        .into_iter()
        .find(|id| from_source.contains(id))
}

/// `segments + 1` samples from `a` to `b`, spaced by a blend of linear and smoothstep easing.
fn half_path(a: Point, b: Point, segments: usize, strength: f64) -> Vec<Point> {
    let strength = strength.clamp(0.0, 1.0);
    (0..=segments)
        .map(|i| {
            if i == segments {
                return b;
            }
            let t = i as f64 / segments as f64;
            lerp_point(a, b, lerp(t, smoothstep(t), strength))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ancestor_chain, lowest_common_ancestor};
    use crate::bundling::AncestorMap;
    use crate::graph::Id;

    fn map(pairs: &[(&str, &str)]) -> AncestorMap {
        pairs
            .iter()
            .map(|(c, p)| (Id::from(*c), Id::from(*p)))
            .collect()
    }

    #[test]
    fn lca_of_cousins_is_the_grandparent() {
        let m = map(&[("a1", "a"), ("b1", "b"), ("a", "root"), ("b", "root")]);
        let (s, t) = (Id::from("a1"), Id::from("b1"));
        assert_eq!(lowest_common_ancestor(&s, &t, &m), Some(&Id::from("root")));
    }

    #[test]
    fn lca_includes_endpoints_themselves() {
        let m = map(&[("child", "parent")]);
        let (s, t) = (Id::from("child"), Id::from("parent"));
        assert_eq!(lowest_common_ancestor(&s, &t, &m), Some(&Id::from("parent")));
    }

    #[test]
    fn disjoint_hierarchies_have_no_lca() {
        let m = map(&[("a", "r1"), ("b", "r2")]);
        let (s, t) = (Id::from("a"), Id::from("b"));
        assert_eq!(lowest_common_ancestor(&s, &t, &m), None);
    }

    #[test]
    fn ancestor_cycles_terminate() {
        let m = map(&[("a", "b"), ("b", "a")]);
        let id = Id::from("a");
        assert_eq!(ancestor_chain(&id, &m).len(), 2);
    }
}
