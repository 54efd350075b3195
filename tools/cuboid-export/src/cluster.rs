//! Connected component clustering
//!
//! Splits a bone's vertices into rigid islands: the connected components of
//! the subgraph induced by those vertices on the mesh's edge list.

use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

use crate::scene::VertexId;

/// Maximal connected vertex subset, sorted ascending
pub type Cluster = Vec<VertexId>;

/// Partition `vertices` into connected components.
///
/// Only edges with both endpoints in `vertices` are followed. The returned
/// clusters are disjoint, non-empty and together cover `vertices` exactly.
/// Cluster order follows the first appearance of a member in `vertices`.
pub fn connected_clusters(vertices: &[VertexId], edges: &[[VertexId; 2]]) -> Vec<Cluster> {
    let members: HashSet<VertexId> = vertices.iter().copied().collect();

    let mut adjacency: HashMap<VertexId, Vec<VertexId>> = HashMap::with_capacity(members.len());
    for &[a, b] in edges {
        if a != b && members.contains(&a) && members.contains(&b) {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }

    let mut visited: HashSet<VertexId> = HashSet::with_capacity(members.len());
    let mut clusters = Vec::new();
    let mut queue = VecDeque::new();

    for &seed in vertices {
        if !visited.insert(seed) {
            continue;
        }

        let mut cluster = vec![seed];
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            for &next in adjacency.get(&current).map(Vec::as_slice).unwrap_or_default() {
                if visited.insert(next) {
                    cluster.push(next);
                    queue.push_back(next);
                }
            }
        }

        cluster.sort_unstable();
        clusters.push(cluster);
    }

    clusters
}
