//! Bounding box extraction
//!
//! Fits an axis-aligned box to a cluster in target space, relative to the
//! owning bone's head. Extrema are taken after the coordinate transform since
//! the transform negates one axis. Clusters arrive here already numbered by
//! octant, so there are always exactly 8 corners.

use cuboid_common::{to_target, Cuboid, Position, UvMap};
use glam::DVec3;

use crate::octant::OctantMap;
use crate::scene::Mesh;

/// Axis-aligned box in target space (`start <= end` on every axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub start: DVec3,
    pub end: DVec3,
}

impl Bounds {
    /// Box dimensions: width (x), height (y), depth (z)
    pub fn size(&self) -> DVec3 {
        self.end - self.start
    }

    /// Attach a UV map and produce the final cuboid
    pub fn into_cuboid(self, uv_map: UvMap) -> Cuboid {
        Cuboid::new(Position::from(self.start), Position::from(self.end), uv_map)
    }
}

/// Bounds of a box cluster relative to `bone_head`, both in authoring space.
pub fn cluster_bounds(mesh: &Mesh, octants: &OctantMap, bone_head: DVec3) -> Bounds {
    let first = to_target(mesh.position(octants[0]) - bone_head);
    let (start, end) = octants[1..]
        .iter()
        .map(|&id| to_target(mesh.position(id) - bone_head))
        .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Bounds { start, end }
}
