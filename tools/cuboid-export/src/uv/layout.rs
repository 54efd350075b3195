//! Cuboid face table and unfolded cross layout

use glam::{DVec2, DVec3};
use std::fmt;

/// One face of a cuboid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Top,
    Front,
    Left,
    Right,
    Bottom,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Front,
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Back,
    ];

    /// Octant slots of the face corners, in winding order
    pub const fn corners(self) -> [usize; 4] {
        match self {
            Face::Top => [2, 3, 7, 6],
            Face::Front => [0, 2, 6, 4],
            Face::Left => [1, 3, 2, 0],
            Face::Right => [4, 6, 7, 5],
            Face::Bottom => [1, 0, 4, 5],
            Face::Back => [5, 7, 3, 1],
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Face::Top => 0,
            Face::Front => 1,
            Face::Left => 2,
            Face::Right => 3,
            Face::Bottom => 4,
            Face::Back => 5,
        }
    }

    /// UVs of the face corners in the unfolded cross layout of a box with
    /// dimensions `(w, h, d)`, parallel to [`Face::corners`].
    pub fn layout(self, size: DVec3) -> [DVec2; 4] {
        let (w, h, d) = (size.x, size.y, size.z);
        let uv = DVec2::new;
        match self {
            Face::Top => [uv(d, h), uv(d, h + d), uv(d + w, h + d), uv(d + w, h)],
            Face::Front => [uv(d, 0.0), uv(d, h), uv(d + w, h), uv(d + w, 0.0)],
            Face::Left => [uv(0.0, 0.0), uv(0.0, h), uv(d, h), uv(d, 0.0)],
            Face::Right => [
                uv(d + w, 0.0),
                uv(d + w, h),
                uv(2.0 * d + w, h),
                uv(2.0 * d + w, 0.0),
            ],
            Face::Bottom => [
                uv(d + w, d + h),
                uv(d + w, h),
                uv(d + 2.0 * w, h),
                uv(d + 2.0 * w, d + h),
            ],
            Face::Back => [
                uv(2.0 * d + w, 0.0),
                uv(2.0 * d + w, h),
                uv(2.0 * d + 2.0 * w, h),
                uv(2.0 * d + 2.0 * w, 0.0),
            ],
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::Top => "top",
            Face::Front => "front",
            Face::Left => "left",
            Face::Right => "right",
            Face::Bottom => "bottom",
            Face::Back => "back",
        };
        f.write_str(name)
    }
}

/// Cross layout for all six faces, indexed by [`Face::index`]
pub fn cross_layout(size: DVec3) -> [[DVec2; 4]; 6] {
    Face::ALL.map(|face| face.layout(size))
}
