//! Box-style UV unwrapping and atlas packing
//!
//! The unwrap of each cuboid goes through three phases around a single
//! packing pass over the whole mesh:
//!
//! 1. [`UvMapper::apply`] writes the unfolded cross layout onto the six face
//!    polygons, and [`UvMapper::hide_bottom`] excludes the bottom face.
//! 2. A [`UvPacker`] repacks every non-hidden polygon into the unit square.
//! 3. [`UvMapper::restore_bottom`] rebuilds the bottom face next to the packed
//!    top face, and [`UvMapper::sync`] reads the final placement back.

mod layout;
mod mapper;
mod packer;

pub use layout::{cross_layout, Face};
pub use mapper::{FaceLookupError, UvMapper};
pub use packer::{PackError, PackFace, ShelfPacker, UvPacker};
