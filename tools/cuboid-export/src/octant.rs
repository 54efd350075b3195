//! Canonical corner numbering for box clusters
//!
//! Each of the 8 corners of a box lies in a different octant around the
//! box's centroid. The octant index is
//!
//! ```text
//! index = sx * 4 + sz * 2 + sy
//! ```
//!
//! where `sx`, `sy`, `sz` are 1 when the corner is above the centroid on that
//! authoring-space axis and 0 otherwise. The UV face table in
//! [`crate::uv::Face`] is written against this numbering.

use glam::DVec3;

use crate::scene::{Mesh, VertexId};

/// Vertex id for each octant slot
pub type OctantMap = [VertexId; 8];

/// Cluster cannot be numbered as the corners of a box
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OctantError {
    #[error("expected 8 vertices, found {0}")]
    WrongVertexCount(usize),

    #[error("vertices {first} and {second} both fall in octant {octant}")]
    Collision {
        octant: usize,
        first: VertexId,
        second: VertexId,
    },
}

/// Octant slot of `point` relative to `centroid`
pub fn octant_index(point: DVec3, centroid: DVec3) -> usize {
    let sx = (point.x > centroid.x) as usize;
    let sy = (point.y > centroid.y) as usize;
    let sz = (point.z > centroid.z) as usize;
    sx * 4 + sz * 2 + sy
}

/// Assign each vertex of an 8-vertex box cluster to its octant slot.
pub fn distribute_octants(mesh: &Mesh, cluster: &[VertexId]) -> Result<OctantMap, OctantError> {
    if cluster.len() != 8 {
        return Err(OctantError::WrongVertexCount(cluster.len()));
    }

    let centroid = cluster
        .iter()
        .map(|&id| mesh.position(id))
        .sum::<DVec3>()
        / cluster.len() as f64;

    let mut slots: [Option<VertexId>; 8] = [None; 8];
    for &id in cluster {
        let octant = octant_index(mesh.position(id), centroid);
        if let Some(first) = slots[octant] {
            return Err(OctantError::Collision {
                octant,
                first,
                second: id,
            });
        }
        slots[octant] = Some(id);
    }

    // 8 vertices in 8 distinct slots fill every slot
    let mut map = [0; 8];
    for (slot, id) in map.iter_mut().zip(slots) {
        *slot = id.ok_or(OctantError::WrongVertexCount(cluster.len()))?;
    }
    Ok(map)
}
