//! Programmatic scene generation for integration tests.
//!
//! Boxes are emitted the way an authoring host tends to store them: vertex
//! ids in no particular corner order and polygon loops starting at an
//! arbitrary corner.

#![allow(dead_code)]

use cuboid_export::Scene;
use glam::DVec3;
use serde_json::{json, Value};

/// Storage slot of each geometric corner `(x << 2) | (y << 1) | z`
const CORNER_SLOTS: [usize; 8] = [5, 2, 7, 0, 3, 6, 1, 4];

/// Box faces as geometric corners, outward winding
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2], // -x
    [4, 6, 7, 5], // +x
    [0, 4, 5, 1], // -y
    [2, 3, 7, 6], // +y
    [0, 2, 6, 4], // -z
    [1, 5, 7, 3], // +z
];

struct GenVertex {
    co: DVec3,
    groups: Vec<(usize, f64)>,
}

struct GenBone {
    name: String,
    head: DVec3,
    parent: Option<String>,
}

/// Scene builder producing scene JSON
#[derive(Default)]
pub struct SceneBuilder {
    groups: Vec<String>,
    vertices: Vec<GenVertex>,
    edges: Vec<[usize; 2]>,
    polygons: Vec<Vec<usize>>,
    bones: Vec<GenBone>,
    loop_rotation: usize,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a bone
    pub fn bone(mut self, name: &str, head: [f64; 3], parent: Option<&str>) -> Self {
        self.bones.push(GenBone {
            name: name.to_string(),
            head: DVec3::from_array(head),
            parent: parent.map(str::to_string),
        });
        self
    }

    /// Declare a weight group even if one with the same name exists
    pub fn extra_group(mut self, name: &str) -> Self {
        self.groups.push(name.to_string());
        self
    }

    /// Start polygon loops of subsequent boxes `n` corners further along
    pub fn rotate_loops(mut self, n: usize) -> Self {
        self.loop_rotation = n;
        self
    }

    /// Axis-aligned box (authoring space) bound to `group` with `weight`
    pub fn weighted_box(mut self, group: &str, min: [f64; 3], max: [f64; 3], weight: f64) -> Self {
        let group = self.group_index(group);
        let (min, max) = (DVec3::from_array(min), DVec3::from_array(max));
        let base = self.vertices.len();

        let mut corners: Vec<Option<GenVertex>> = (0..8).map(|_| None).collect();
        for corner in 0..8 {
            let co = DVec3::new(
                if corner & 4 != 0 { max.x } else { min.x },
                if corner & 2 != 0 { max.y } else { min.y },
                if corner & 1 != 0 { max.z } else { min.z },
            );
            corners[CORNER_SLOTS[corner]] = Some(GenVertex {
                co,
                groups: vec![(group, weight)],
            });
        }
        self.vertices.extend(corners.into_iter().flatten());

        let id = |corner: usize| base + CORNER_SLOTS[corner];
        for a in 0..8 {
            for bit in [1, 2, 4] {
                if a & bit == 0 {
                    self.edges.push([id(a), id(a | bit)]);
                }
            }
        }
        for (i, face) in BOX_FACES.iter().enumerate() {
            let mut polygon: Vec<usize> = face.iter().map(|&c| id(c)).collect();
            polygon.rotate_left((i + self.loop_rotation) % 4);
            self.polygons.push(polygon);
        }
        self
    }

    /// Fully weighted box
    pub fn cube(self, group: &str, min: [f64; 3], max: [f64; 3]) -> Self {
        self.weighted_box(group, min, max, 1.0)
    }

    /// Single connected quad (4 vertices, one polygon) bound to `group`
    pub fn quad(mut self, group: &str, corners: [[f64; 3]; 4]) -> Self {
        let group = self.group_index(group);
        let base = self.vertices.len();
        for co in corners {
            self.vertices.push(GenVertex {
                co: DVec3::from_array(co),
                groups: vec![(group, 1.0)],
            });
        }
        for i in 0..4 {
            self.edges.push([base + i, base + (i + 1) % 4]);
        }
        self.polygons.push((base..base + 4).collect());
        self
    }

    pub fn to_value(&self) -> Value {
        let vertices: Vec<Value> = self
            .vertices
            .iter()
            .map(|v| {
                let groups: Vec<Value> = v
                    .groups
                    .iter()
                    .map(|&(group, weight)| json!({ "group": group, "weight": weight }))
                    .collect();
                json!({ "co": [v.co.x, v.co.y, v.co.z], "groups": groups })
            })
            .collect();
        let polygons: Vec<Value> = self
            .polygons
            .iter()
            .map(|p| json!({ "vertices": p }))
            .collect();
        let bones: Vec<Value> = self
            .bones
            .iter()
            .map(|b| {
                json!({
                    "name": b.name,
                    "head": [b.head.x, b.head.y, b.head.z],
                    "parent": b.parent,
                })
            })
            .collect();

        json!({
            "mesh": {
                "vertex_groups": self.groups,
                "vertices": vertices,
                "edges": self.edges,
                "polygons": polygons,
            },
            "armature": { "bones": bones },
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).expect("Failed to serialize scene")
    }

    /// Parse the generated JSON back through the scene loader
    pub fn build(&self) -> Scene {
        Scene::parse(&self.to_json()).expect("Generated scene should parse")
    }

    fn group_index(&mut self, name: &str) -> usize {
        match self.groups.iter().position(|g| g == name) {
            Some(i) => i,
            None => {
                self.groups.push(name.to_string());
                self.groups.len() - 1
            }
        }
    }
}

/// One bone at the origin owning a unit cube spanning authoring
/// x, y in [0, 1] and z in [-1, 0], so that its target-space box is
/// (0, 0, 0)..(1, 1, 1).
pub fn unit_cube_scene() -> SceneBuilder {
    SceneBuilder::new()
        .bone("body", [0.0, 0.0, 0.0], None)
        .cube("body", [0.0, 0.0, -1.0], [1.0, 1.0, 0.0])
}

/// "body" with a unit cube at the origin and a child "head" one unit up,
/// owning a unit cube of its own.
pub fn two_bone_scene() -> SceneBuilder {
    SceneBuilder::new()
        .bone("body", [0.0, 0.0, 0.0], None)
        .bone("head", [0.0, 0.0, 1.0], Some("body"))
        .cube("body", [0.0, 0.0, -1.0], [1.0, 1.0, 0.0])
        .cube("head", [0.0, 0.0, 0.0], [1.0, 1.0, 1.0])
}
