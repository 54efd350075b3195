//! cuboid-export library
//!
//! Decomposes a skinned box mesh into a hierarchical cuboid model with packed
//! box UVs. Used by the `cuboid-export` CLI; hosts with their own UV packer
//! drive [`export_model`] directly through the [`UvPacker`] seam.

pub mod bounds;
pub mod cluster;
pub mod config;
pub mod error;
pub mod export;
pub mod octant;
pub mod partition;
pub mod scene;
pub mod skeleton;
pub mod tree;
pub mod uv;

// Re-export the output model and document writer from cuboid-common
pub use cuboid_common::{render_document, to_target, Cuboid, ModelNode, UvMap};

// Re-export the pipeline entry points
pub use config::ExportConfig;
pub use error::{ExportError, HierarchyError};
pub use export::{
    check_scene, export_document, export_model, export_scene, BoneReport, ExportContext,
};

// Re-export scene and packing types
pub use scene::{Mesh, Scene};
pub use skeleton::Skeleton;
pub use uv::{PackError, PackFace, ShelfPacker, UvPacker};
