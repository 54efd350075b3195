//! Export error taxonomy
//!
//! Every variant is fatal: the export aborts at the point of detection and no
//! document is produced. A bone without a matching weight group is not an
//! error and never reaches this module.

use crate::octant::OctantError;
use crate::uv::{FaceLookupError, PackError};

/// Bone hierarchy is not a single rooted tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HierarchyError {
    /// Every bone has a parent
    #[error("no root bone found (every bone has a parent)")]
    NoRoot,

    /// More than one parentless bone
    #[error("skeleton has {} root bones ({}), expected exactly one", .0.len(), .0.join(", "))]
    MultipleRoots(Vec<String>),

    /// Two bones share a name
    #[error("duplicate bone name '{0}'")]
    DuplicateBone(String),

    /// Parent reference does not name a bone
    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    /// Parent chain loops back on itself
    #[error("bone '{0}' is part of a parent cycle")]
    Cycle(String),
}

/// Errors produced by the export pipeline
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// More than one weight group carries the bone's name
    #[error("bone '{bone}' matches {count} weight groups with the same name")]
    AmbiguousWeightGroup { bone: String, count: usize },

    /// A cluster cannot be numbered as the 8 corners of a box
    #[error("bone '{bone}': cluster is not a box: {source}")]
    Decomposition {
        bone: String,
        #[source]
        source: OctantError,
    },

    /// A canonical cuboid face has no matching polygon
    #[error("bone '{bone}': {source}")]
    FaceLookup {
        bone: String,
        #[source]
        source: FaceLookupError,
    },

    /// Skeleton is not a single rooted tree
    #[error("invalid bone hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Mesh references out-of-range data
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// UV packing pass failed
    #[error("UV packing failed: {0}")]
    Packing(#[from] PackError),
}
