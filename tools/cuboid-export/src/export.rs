//! Export pipeline
//!
//! ```text
//! bones -> partition -> clusters -> bounds + octants -> cross layout
//!       -> pack (once, whole mesh) -> restore bottoms -> read back -> document
//! ```
//!
//! The mesh is mutated in place: every cuboid face ends up carrying its packed
//! UVs, and bottom faces are unhidden again before the export returns.

use cuboid_common::{render_document, ModelNode};

use crate::cluster::connected_clusters;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::octant::distribute_octants;
use crate::partition::vertices_for_bone;
use crate::scene::{Mesh, PolygonIndex, Scene};
use crate::skeleton::Skeleton;
use crate::tree::build_tree;
use crate::uv::{PackError, PackFace, ShelfPacker, UvMapper, UvPacker};

/// Everything one export run reads or writes
pub struct ExportContext<'a> {
    pub mesh: &'a mut Mesh,
    pub skeleton: &'a Skeleton,
    pub config: &'a ExportConfig,
    pub(crate) polygons: PolygonIndex,
}

impl<'a> ExportContext<'a> {
    /// Validate the mesh and index its quads.
    pub fn new(
        mesh: &'a mut Mesh,
        skeleton: &'a Skeleton,
        config: &'a ExportConfig,
    ) -> Result<Self, ExportError> {
        mesh.validate()?;
        mesh.fill_missing_uvs();
        let polygons = PolygonIndex::build(mesh);
        Ok(Self {
            mesh,
            skeleton,
            config,
            polygons,
        })
    }
}

/// Decompose the skinned mesh into a cuboid model tree.
///
/// The packer runs exactly once, over every polygon that is not hidden. On
/// failure, polygons hidden by this run are unhidden again before the error
/// is returned.
pub fn export_model(
    ctx: &mut ExportContext<'_>,
    packer: &mut dyn UvPacker,
) -> Result<ModelNode, ExportError> {
    let hidden_before: Vec<bool> = ctx.mesh.polygons.iter().map(|p| p.hidden).collect();
    let result = run_export(ctx, packer);
    if result.is_err() {
        for (polygon, &was_hidden) in ctx.mesh.polygons.iter_mut().zip(&hidden_before) {
            polygon.hidden = was_hidden;
        }
    }
    result
}

fn run_export(
    ctx: &mut ExportContext<'_>,
    packer: &mut dyn UvPacker,
) -> Result<ModelNode, ExportError> {
    tracing::info!(
        "Exporting {} bones, {} vertices, {} polygons",
        ctx.skeleton.len(),
        ctx.mesh.vertices.len(),
        ctx.mesh.polygons.len()
    );
    for group in &ctx.mesh.vertex_groups {
        if ctx.skeleton.find(group).is_none() {
            tracing::warn!("Weight group '{}' has no bone, its vertices are ignored", group);
        }
    }

    let pending = build_tree(ctx)?;
    tracing::info!(
        "Decomposed into {} cuboids across {} nodes",
        pending.cuboid_count(),
        pending.node_count()
    );

    let packed = pack_visible_faces(ctx.mesh, packer)?;
    tracing::debug!("Packed {} faces", packed);

    let model = pending.finish(ctx.mesh, ctx.config.hide_bottom)?;
    tracing::info!("Export complete: root '{}'", model.name);
    Ok(model)
}

/// Export and render the fixed-precision document.
pub fn export_document(
    ctx: &mut ExportContext<'_>,
    packer: &mut dyn UvPacker,
) -> Result<String, ExportError> {
    let model = export_model(ctx, packer)?;
    Ok(render_document(&model))
}

/// Export a loaded scene with the bundled [`ShelfPacker`].
pub fn export_scene(scene: &mut Scene, config: &ExportConfig) -> Result<ModelNode, ExportError> {
    let skeleton = Skeleton::from_defs(&scene.armature.bones)?;
    let mut packer = ShelfPacker::new(config.pack.margin);
    let mut ctx = ExportContext::new(&mut scene.mesh, &skeleton, config)?;
    export_model(&mut ctx, &mut packer)
}

/// Hand every non-hidden polygon to the packer. Returns the face count.
///
/// Fails if the packer leaves any face with non-finite UVs.
pub fn pack_visible_faces(mesh: &mut Mesh, packer: &mut dyn UvPacker) -> Result<usize, PackError> {
    let mut faces: Vec<PackFace<'_>> = mesh
        .polygons
        .iter_mut()
        .filter(|polygon| !polygon.hidden)
        .map(PackFace::new)
        .collect();
    packer.pack(&mut faces)?;
    if let Some(i) = faces
        .iter()
        .position(|face| face.uvs.iter().any(|uv| !uv.is_finite()))
    {
        return Err(PackError::NonFinite(i));
    }
    Ok(faces.len())
}

/// Decomposition summary for one bone
#[derive(Debug, Clone, PartialEq)]
pub struct BoneReport {
    pub name: String,
    pub depth: usize,
    /// Vertices bound to the bone
    pub vertices: usize,
    pub cuboids: usize,
}

/// Run every decomposition check without writing any UVs.
///
/// Fails with the same error an export would report.
pub fn check_scene(scene: &Scene, config: &ExportConfig) -> Result<Vec<BoneReport>, ExportError> {
    let skeleton = Skeleton::from_defs(&scene.armature.bones)?;
    let mesh = &scene.mesh;
    mesh.validate()?;
    let polygons = PolygonIndex::build(mesh);

    let mut reports = Vec::with_capacity(skeleton.len());
    for (id, depth) in skeleton.walk()? {
        let bone = skeleton.bone(id);
        let vertices = vertices_for_bone(mesh, &bone.name, config.weight_threshold)?;
        let clusters = connected_clusters(&vertices, &mesh.edges);

        for cluster in &clusters {
            let octants =
                distribute_octants(mesh, cluster).map_err(|source| ExportError::Decomposition {
                    bone: bone.name.clone(),
                    source,
                })?;
            UvMapper::locate(&polygons, octants).map_err(|source| ExportError::FaceLookup {
                bone: bone.name.clone(),
                source,
            })?;
        }

        reports.push(BoneReport {
            name: bone.name.clone(),
            depth,
            vertices: vertices.len(),
            cuboids: clusters.len(),
        });
    }
    Ok(reports)
}
