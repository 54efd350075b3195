//! Cuboid model formats
//!
//! The exported model is a tree of [`ModelNode`]s, one per bone, each holding
//! the rigid [`Cuboid`]s that were fitted to that bone's geometry.
//!
//! All value types implement the [`WriteJson`] trait so the whole tree renders
//! through one code path with a fixed key order and fixed numeric precision.

mod document;
pub mod model;

pub use document::{DOCUMENT_PRECISION, WriteJson, render_document};
pub use model::*;
