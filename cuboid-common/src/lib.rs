//! Shared types and utilities for cuboid model export
//!
//! This crate provides the output side of the exporter, shared between:
//! - `cuboid-export` (decomposition pipeline and CLI)
//! - any runtime that loads the exported model documents
//!
//! # Modules
//!
//! - [`coords`] - Authoring space <-> target model space transform
//! - [`formats`] - Cuboid model value types and the fixed-schema document format

pub mod coords;
pub mod formats;

// Re-export the coordinate transform
pub use coords::{to_authoring, to_target};

// Re-export commonly used format items
pub use formats::{
    Cuboid, DOCUMENT_PRECISION, ModelNode, Position, Position2d, Size, UvMap, WriteJson,
    render_document,
};
