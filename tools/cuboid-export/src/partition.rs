//! Vertex partitioning by weight group

use crate::error::ExportError;
use crate::scene::{Mesh, VertexId};

/// Default membership threshold: a vertex belongs to a bone when its weight
/// in the bone's group is strictly greater than this.
pub const DEFAULT_WEIGHT_THRESHOLD: f64 = 0.5;

/// Vertices bound to `bone` through the weight group of the same name.
///
/// A bone without a matching group contributes no geometry and yields an
/// empty list. Two or more groups with the bone's name are ambiguous and
/// rejected. Ids are returned in ascending order.
pub fn vertices_for_bone(
    mesh: &Mesh,
    bone: &str,
    threshold: f64,
) -> Result<Vec<VertexId>, ExportError> {
    let group = match mesh.groups_named(bone).as_slice() {
        [] => {
            tracing::debug!("Bone '{}' has no weight group, skipping geometry", bone);
            return Ok(Vec::new());
        }
        [group] => *group,
        groups => {
            return Err(ExportError::AmbiguousWeightGroup {
                bone: bone.to_string(),
                count: groups.len(),
            })
        }
    };

    Ok(mesh
        .vertices
        .iter()
        .enumerate()
        .filter(|(_, vertex)| {
            vertex
                .groups
                .iter()
                .any(|g| g.group == group && g.weight > threshold)
        })
        .map(|(i, _)| i)
        .collect())
}
