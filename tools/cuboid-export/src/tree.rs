//! Model tree construction
//!
//! The tree is built in two passes around the packing step. [`build_tree`]
//! decomposes every bone into cuboids and writes the cross layouts, producing
//! a [`PendingNode`] tree that still refers to mesh polygons. After packing,
//! [`PendingNode::finish`] reads the final UV placement back and yields the
//! exportable [`ModelNode`] tree. Both passes mirror the bone hierarchy one to
//! one, children in declaration order.

use cuboid_common::{to_target, ModelNode, Position};
use glam::DVec3;

use crate::bounds::{cluster_bounds, Bounds};
use crate::cluster::connected_clusters;
use crate::error::ExportError;
use crate::export::ExportContext;
use crate::octant::distribute_octants;
use crate::partition::vertices_for_bone;
use crate::scene::Mesh;
use crate::skeleton::{Bone, BoneId};
use crate::uv::UvMapper;

/// Cuboid whose UV placement is not yet final
#[derive(Debug, Clone)]
pub struct PendingCuboid {
    pub bounds: Bounds,
    pub mapper: UvMapper,
}

/// Node of the model tree before UV read-back
#[derive(Debug, Clone)]
pub struct PendingNode {
    pub name: String,
    /// Offset from the parent bone's head, target space
    pub mount_point: DVec3,
    pub cuboids: Vec<PendingCuboid>,
    pub children: Vec<PendingNode>,
}

impl PendingNode {
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PendingNode::node_count).sum::<usize>()
    }

    pub fn cuboid_count(&self) -> usize {
        self.cuboids.len()
            + self
                .children
                .iter()
                .map(PendingNode::cuboid_count)
                .sum::<usize>()
    }

    /// Read packed UVs back into cuboids and produce the final node.
    ///
    /// With `restore_bottom` set, each cuboid's bottom face is rebuilt and
    /// unhidden before its placement is read.
    pub fn finish(self, mesh: &mut Mesh, restore_bottom: bool) -> Result<ModelNode, ExportError> {
        let mut node = ModelNode::new(self.name, Position::from(self.mount_point));

        for pending in self.cuboids {
            let face_error = |source| ExportError::FaceLookup {
                bone: node.name.clone(),
                source,
            };
            if restore_bottom {
                pending.mapper.restore_bottom(mesh).map_err(face_error)?;
            }
            let cuboid = pending
                .mapper
                .sync(mesh, pending.bounds)
                .map_err(face_error)?;
            node.mesh.push(cuboid);
        }

        for child in self.children {
            node.children.push(child.finish(mesh, restore_bottom)?);
        }
        Ok(node)
    }
}

/// Decompose the whole skeleton, starting at the root bone.
pub fn build_tree(ctx: &mut ExportContext<'_>) -> Result<PendingNode, ExportError> {
    let root = ctx.skeleton.root()?;
    build_node(ctx, root)
}

fn build_node(ctx: &mut ExportContext<'_>, id: BoneId) -> Result<PendingNode, ExportError> {
    let skeleton = ctx.skeleton;
    let bone = skeleton.bone(id);

    let mount_point = to_target(bone.head - skeleton.parent_head(id));
    let cuboids = bone_cuboids(ctx, bone)?;

    let children = bone
        .children
        .iter()
        .map(|&child| build_node(ctx, child))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PendingNode {
        name: bone.name.clone(),
        mount_point,
        cuboids,
        children,
    })
}

/// Cuboids for every connected cluster of the bone's vertices, with cross
/// layouts written and bottom faces hidden as configured.
fn bone_cuboids(
    ctx: &mut ExportContext<'_>,
    bone: &Bone,
) -> Result<Vec<PendingCuboid>, ExportError> {
    let vertices = vertices_for_bone(ctx.mesh, &bone.name, ctx.config.weight_threshold)?;
    if vertices.is_empty() {
        return Ok(Vec::new());
    }

    let clusters = connected_clusters(&vertices, &ctx.mesh.edges);
    tracing::debug!(
        "Bone '{}': {} vertices in {} clusters",
        bone.name,
        vertices.len(),
        clusters.len()
    );

    let mut cuboids = Vec::with_capacity(clusters.len());
    for cluster in &clusters {
        let octants =
            distribute_octants(ctx.mesh, cluster).map_err(|source| ExportError::Decomposition {
                bone: bone.name.clone(),
                source,
            })?;
        let bounds = cluster_bounds(ctx.mesh, &octants, bone.head);
        let mapper = UvMapper::apply(ctx.mesh, &ctx.polygons, octants, bounds.size()).map_err(
            |source| ExportError::FaceLookup {
                bone: bone.name.clone(),
                source,
            },
        )?;
        if ctx.config.hide_bottom {
            mapper.hide_bottom(ctx.mesh);
        }
        cuboids.push(PendingCuboid { bounds, mapper });
    }
    Ok(cuboids)
}
