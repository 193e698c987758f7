use std::collections::BTreeMap;

use crate::map::StationId;

/// Weighted, undirected station adjacency.
///
/// The key set is the node set: a member with no edges still owns an
/// (empty) entry. Ordered maps keep neighbour expansion and node iteration
/// in ascending id order, which the routing tie-breaks rely on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NaviGraph {
    routes: BTreeMap<StationId, BTreeMap<StationId, f64>>,
}

impl NaviGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `id` is a node, without any edges.
    pub fn add_node(&mut self, id: StationId) {
        self.routes.entry(id).or_default();
    }

    /// Insert the symmetric edge `a <-> b`, overwriting any previous weight.
    pub fn add_route(&mut self, a: &str, b: &str, weight: f64) {
        self.routes
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), weight);
        self.routes
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), weight);
    }

    /// Weight of the direct edge `a -> b`, if one exists.
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.routes.get(a)?.get(b).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = &StationId> {
        self.routes.keys()
    }

    /// Neighbours of `id` with edge weights, in ascending id order.
    ///
    /// Unknown ids yield an empty iterator.
    pub fn neighbours(&self, id: &str) -> impl Iterator<Item = (&StationId, f64)> {
        self.routes
            .get(id)
            .into_iter()
            .flatten()
            .map(|(to, weight)| (to, *weight))
    }

    /// Fold `other` into this graph. Where both graphs carry the same edge,
    /// the existing weight is kept.
    pub fn merge(&mut self, other: &NaviGraph) {
        for (node, edges) in &other.routes {
            let entry = self.routes.entry(node.clone()).or_default();
            for (to, weight) in edges {
                entry.entry(to.clone()).or_insert(*weight);
            }
        }
    }
}
