//! Host scene model
//!
//! In-memory mesh and armature as handed over by the authoring host. Scenes
//! are usually loaded from a JSON scene file:
//!
//! ```json
//! {
//!   "mesh": {
//!     "vertex_groups": ["root", "arm"],
//!     "vertices": [{ "co": [0.0, 0.0, 0.0], "groups": [{ "group": 1, "weight": 1.0 }] }],
//!     "edges": [[0, 1]],
//!     "polygons": [{ "vertices": [0, 1, 2, 3], "uvs": [[0, 0], [0, 1], [1, 1], [1, 0]] }]
//!   },
//!   "armature": {
//!     "bones": [{ "name": "root", "head": [0.0, 0.0, 0.0], "parent": null }]
//!   }
//! }
//! ```
//!
//! Vertex identifiers are indices into `vertices`. Positions are in authoring
//! space.

use anyhow::{Context, Result};
use glam::{DVec2, DVec3};
use hashbrown::HashMap;
use serde::Deserialize;
use std::path::Path;

use crate::error::ExportError;

/// Index of a vertex in [`Mesh::vertices`]
pub type VertexId = usize;

/// Membership of a vertex in one weight group
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GroupWeight {
    /// Index into [`Mesh::vertex_groups`]
    pub group: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vertex {
    /// Undeformed authoring-space position
    pub co: DVec3,
    #[serde(default)]
    pub groups: Vec<GroupWeight>,
}

impl Vertex {
    pub fn new(co: DVec3) -> Self {
        Self {
            co,
            groups: Vec::new(),
        }
    }

    /// Weight in the given group, if the vertex is a member
    pub fn weight_in(&self, group: usize) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.group == group)
            .map(|g| g.weight)
    }
}

/// Face loop with one UV per corner
#[derive(Debug, Clone, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<VertexId>,
    /// Per-loop UVs, parallel to `vertices` (empty means all zero)
    #[serde(default)]
    pub uvs: Vec<DVec2>,
    /// Excluded from the UV packing pass
    #[serde(skip)]
    pub hidden: bool,
}

impl Polygon {
    pub fn new(vertices: Vec<VertexId>) -> Self {
        let uvs = vec![DVec2::ZERO; vertices.len()];
        Self {
            vertices,
            uvs,
            hidden: false,
        }
    }

    /// Loop index of `vertex` in this polygon
    pub fn corner_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// UV stored on the loop that references `vertex`
    pub fn uv_at(&self, vertex: VertexId) -> Option<DVec2> {
        self.corner_of(vertex).and_then(|i| self.uvs.get(i).copied())
    }

    /// Set the UV on the loop that references `vertex`.
    ///
    /// Returns `false` if the vertex is not part of this polygon.
    pub fn set_uv_at(&mut self, vertex: VertexId, uv: DVec2) -> bool {
        match self.corner_of(vertex) {
            Some(i) if i < self.uvs.len() => {
                self.uvs[i] = uv;
                true
            }
            _ => false,
        }
    }
}

/// Mesh data: vertices with weight-group memberships, edges, polygons
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mesh {
    /// Weight group names, indexed by [`GroupWeight::group`]
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<[VertexId; 2]>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

impl Mesh {
    /// Indices of all weight groups named `name`
    pub fn groups_named(&self, name: &str) -> Vec<usize> {
        self.vertex_groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.as_str() == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Authoring-space position of a vertex
    pub fn position(&self, id: VertexId) -> DVec3 {
        self.vertices[id].co
    }

    /// Check every index in the mesh.
    ///
    /// Run once before the mesh enters the pipeline; every later stage indexes
    /// vertices directly. Polygons without UVs pass and are filled in by
    /// [`Mesh::fill_missing_uvs`].
    pub fn validate(&self) -> Result<(), ExportError> {
        let vertex_count = self.vertices.len();
        let group_count = self.vertex_groups.len();

        for (i, vertex) in self.vertices.iter().enumerate() {
            if !vertex.co.is_finite() {
                return Err(ExportError::InvalidMesh(format!(
                    "vertex {} has non-finite position {:?}",
                    i, vertex.co
                )));
            }
            if let Some(g) = vertex.groups.iter().find(|g| g.group >= group_count) {
                return Err(ExportError::InvalidMesh(format!(
                    "vertex {} references weight group {} ({} groups defined)",
                    i, g.group, group_count
                )));
            }
        }

        for (i, edge) in self.edges.iter().enumerate() {
            if edge.iter().any(|&v| v >= vertex_count) {
                return Err(ExportError::InvalidMesh(format!(
                    "edge {} ({}, {}) references a vertex out of range ({} vertices)",
                    i, edge[0], edge[1], vertex_count
                )));
            }
        }

        for (i, polygon) in self.polygons.iter().enumerate() {
            if let Some(&v) = polygon.vertices.iter().find(|&&v| v >= vertex_count) {
                return Err(ExportError::InvalidMesh(format!(
                    "polygon {} references vertex {} ({} vertices)",
                    i, v, vertex_count
                )));
            }
            if !polygon.uvs.is_empty() && polygon.uvs.len() != polygon.vertices.len() {
                return Err(ExportError::InvalidMesh(format!(
                    "polygon {} has {} UVs for {} loops",
                    i,
                    polygon.uvs.len(),
                    polygon.vertices.len()
                )));
            }
        }

        Ok(())
    }

    /// Give every polygon without UVs a zeroed UV per loop
    pub fn fill_missing_uvs(&mut self) {
        for polygon in self.polygons.iter_mut().filter(|p| p.uvs.is_empty()) {
            polygon.uvs = vec![DVec2::ZERO; polygon.vertices.len()];
        }
    }
}

/// Lookup from a quad's vertex set to its polygon index
#[derive(Debug, Clone, Default)]
pub struct PolygonIndex {
    quads: HashMap<[VertexId; 4], usize>,
}

impl PolygonIndex {
    /// Index every quad in the mesh. The first polygon wins for duplicate
    /// vertex sets.
    pub fn build(mesh: &Mesh) -> Self {
        let mut quads = HashMap::with_capacity(mesh.polygons.len());
        for (i, polygon) in mesh.polygons.iter().enumerate() {
            if let Ok(key) = <[VertexId; 4]>::try_from(polygon.vertices.as_slice()) {
                quads.entry(quad_key(key)).or_insert(i);
            }
        }
        Self { quads }
    }

    /// Polygon whose four vertices are exactly `vertices`, in any order
    pub fn find(&self, vertices: [VertexId; 4]) -> Option<usize> {
        self.quads.get(&quad_key(vertices)).copied()
    }
}

fn quad_key(mut vertices: [VertexId; 4]) -> [VertexId; 4] {
    vertices.sort_unstable();
    vertices
}

/// Bone as declared by the host
#[derive(Debug, Clone, Deserialize)]
pub struct BoneDef {
    pub name: String,
    /// Head position in authoring (armature) space
    pub head: DVec3,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Armature section of a scene file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArmatureDef {
    pub bones: Vec<BoneDef>,
}

/// Complete host scene: one skinned mesh and its armature
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub mesh: Mesh,
    pub armature: ArmatureDef,
}

impl Scene {
    /// Load a scene from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scene: {}", path.display()))
    }

    /// Parse a scene from a JSON string
    pub fn parse(content: &str) -> Result<Self> {
        let mut scene: Scene =
            serde_json::from_str(content).context("Failed to parse scene JSON")?;
        scene.mesh.validate()?;
        scene.mesh.fill_missing_uvs();
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_SCENE: &str = r#"{
        "mesh": {
            "vertex_groups": ["root"],
            "vertices": [
                { "co": [0, 0, 0], "groups": [{ "group": 0, "weight": 1.0 }] },
                { "co": [1, 0, 0] },
                { "co": [1, 1, 0] },
                { "co": [0, 1, 0] }
            ],
            "edges": [[0, 1], [1, 2], [2, 3], [3, 0]],
            "polygons": [{ "vertices": [0, 1, 2, 3] }]
        },
        "armature": { "bones": [{ "name": "root", "head": [0, 0, 0] }] }
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::parse(QUAD_SCENE).unwrap();
        assert_eq!(scene.mesh.vertices.len(), 4);
        assert_eq!(scene.mesh.edges.len(), 4);
        assert_eq!(scene.mesh.vertices[0].weight_in(0), Some(1.0));
        assert_eq!(scene.mesh.vertices[1].weight_in(0), None);
        assert_eq!(scene.armature.bones[0].parent, None);
        // Missing UVs are filled with zeros
        assert_eq!(scene.mesh.polygons[0].uvs, vec![DVec2::ZERO; 4]);
    }

    #[test]
    fn test_validate_rejects_bad_edge() {
        let mesh = Mesh {
            vertices: vec![Vertex::new(DVec3::ZERO)],
            edges: vec![[0, 3]],
            ..Default::default()
        };
        assert!(matches!(mesh.validate(), Err(ExportError::InvalidMesh(_))));
    }

    #[test]
    fn test_validate_rejects_bad_group() {
        let mut vertex = Vertex::new(DVec3::ZERO);
        vertex.groups.push(GroupWeight {
            group: 2,
            weight: 1.0,
        });
        let mesh = Mesh {
            vertices: vec![vertex],
            ..Default::default()
        };
        assert!(matches!(mesh.validate(), Err(ExportError::InvalidMesh(_))));
    }

    #[test]
    fn test_validate_rejects_uv_count_mismatch() {
        let mut polygon = Polygon::new(vec![0, 0, 0]);
        polygon.uvs.pop();
        let mesh = Mesh {
            vertices: vec![Vertex::new(DVec3::ZERO)],
            polygons: vec![polygon],
            ..Default::default()
        };
        assert!(matches!(mesh.validate(), Err(ExportError::InvalidMesh(_))));
    }

    #[test]
    fn test_groups_named_reports_duplicates() {
        let mesh = Mesh {
            vertex_groups: vec!["arm".into(), "leg".into(), "arm".into()],
            ..Default::default()
        };
        assert_eq!(mesh.groups_named("arm"), vec![0, 2]);
        assert_eq!(mesh.groups_named("leg"), vec![1]);
        assert!(mesh.groups_named("Arm").is_empty());
    }

    #[test]
    fn test_polygon_uv_by_identity() {
        let mut polygon = Polygon::new(vec![7, 3, 9, 1]);
        assert!(polygon.set_uv_at(9, DVec2::new(0.5, 0.25)));
        assert!(!polygon.set_uv_at(4, DVec2::ONE));
        assert_eq!(polygon.uvs[2], DVec2::new(0.5, 0.25));
        assert_eq!(polygon.uv_at(9), Some(DVec2::new(0.5, 0.25)));
        assert_eq!(polygon.uv_at(4), None);
    }

    #[test]
    fn test_polygon_index_ignores_order() {
        let mesh = Mesh {
            polygons: vec![
                Polygon::new(vec![0, 1, 2]),
                Polygon::new(vec![4, 5, 6, 7]),
                Polygon::new(vec![7, 6, 5, 4]),
            ],
            ..Default::default()
        };
        let index = PolygonIndex::build(&mesh);
        assert_eq!(index.find([6, 4, 7, 5]), Some(1));
        assert_eq!(index.find([0, 1, 2, 3]), None);
    }
}
