//! Cuboid model value types
//!
//! POD value types for the exported model. Vectors are stored as plain
//! `{x, y, z}` structs so the document schema stays independent of the math
//! library; conversions to and from `glam` are provided for pipeline code.

use glam::{DVec2, DVec3};
use serde::Deserialize;

/// Point or offset in target model space
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Position> for DVec3 {
    fn from(p: Position) -> Self {
        DVec3::new(p.x, p.y, p.z)
    }
}

/// Extent of a cuboid unwrap: width (x), height (y), depth (z)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Size {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True if any component is zero, negative or not finite
    pub fn is_degenerate(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .any(|c| !c.is_finite() || *c <= 0.0)
    }
}

impl From<DVec3> for Size {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Point in normalized texture space
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Position2d {
    pub x: f64,
    pub y: f64,
}

impl Position2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<DVec2> for Position2d {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Placement of a cuboid's box unwrap in the shared texture atlas
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct UvMap {
    /// Top-left corner of the unwrap, in normalized atlas coordinates
    pub offset: Position2d,
    /// Unwrap dimensions (width, height, depth) in normalized atlas units
    pub size: Size,
}

impl UvMap {
    pub const fn new(offset: Position2d, size: Size) -> Self {
        Self { offset, size }
    }
}

/// Axis-aligned box in target space, relative to the owning bone's head
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Cuboid {
    pub start: Position,
    pub end: Position,
    #[serde(rename = "uvMap")]
    pub uv_map: UvMap,
}

impl Cuboid {
    pub fn new(start: Position, end: Position, uv_map: UvMap) -> Self {
        Self { start, end, uv_map }
    }

    /// Box dimensions (end - start)
    pub fn dimensions(&self) -> DVec3 {
        DVec3::from(self.end) - DVec3::from(self.start)
    }
}

/// One bone of the exported model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelNode {
    /// Bone name
    pub name: String,
    /// Offset from the parent bone's head to this bone's head (target space)
    pub mount_point: Position,
    /// Cuboids fitted to this bone's geometry
    pub mesh: Vec<Cuboid>,
    /// Child bones, in skeleton order
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>, mount_point: Position) -> Self {
        Self {
            name: name.into(),
            mount_point,
            mesh: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree (including self)
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }

    /// Total number of cuboids in this subtree
    pub fn cuboid_count(&self) -> usize {
        self.mesh.len() + self.children.iter().map(ModelNode::cuboid_count).sum::<usize>()
    }

    /// Depth-first search for a node by bone name
    pub fn find(&self, name: &str) -> Option<&ModelNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Parse a rendered model document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
