//! UV packing seam
//!
//! The exporter treats packing as a black box: it hands every non-hidden
//! polygon to a [`UvPacker`] exactly once and expects the UVs back repacked
//! and normalized into the unit square. Packers may move and uniformly scale
//! islands but must not rotate or mirror them, since the cuboid read-back
//! measures face extents along fixed axes.
//!
//! [`ShelfPacker`] is the bundled implementation for running outside an
//! authoring host.

use glam::DVec2;
use hashbrown::HashMap;

use crate::scene::{Polygon, VertexId};

/// Errors reported by a packer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PackError {
    /// A face carries NaN or infinite UVs
    #[error("face {0} has non-finite UVs")]
    NonFinite(usize),

    /// Packer-specific failure
    #[error("{0}")]
    Failed(String),
}

/// One active face as seen by a packer: fixed topology, mutable UVs
#[derive(Debug)]
pub struct PackFace<'a> {
    pub vertices: &'a [VertexId],
    pub uvs: &'a mut [DVec2],
}

impl<'a> PackFace<'a> {
    pub fn new(polygon: &'a mut Polygon) -> Self {
        Self {
            vertices: &polygon.vertices,
            uvs: &mut polygon.uvs,
        }
    }
}

/// Repacks the active faces of a mesh into the unit square
pub trait UvPacker {
    fn pack(&mut self, faces: &mut [PackFace<'_>]) -> Result<(), PackError>;
}

/// Row-based island packer.
///
/// Faces sharing a vertex form one island. Islands are sorted by height and
/// laid out left to right in rows, then the whole layout is scaled uniformly
/// so its longer side spans the unit square.
#[derive(Debug, Clone, Default)]
pub struct ShelfPacker {
    /// Gap between islands, in unscaled UV units
    pub margin: f64,
}

struct Island {
    faces: Vec<usize>,
    min: DVec2,
    max: DVec2,
}

impl Island {
    fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

impl ShelfPacker {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    fn islands(faces: &[PackFace<'_>]) -> Result<Vec<Island>, PackError> {
        let mut parent: Vec<usize> = (0..faces.len()).collect();
        let mut owner: HashMap<VertexId, usize> = HashMap::new();

        for (i, face) in faces.iter().enumerate() {
            if face.uvs.iter().any(|uv| !uv.is_finite()) {
                return Err(PackError::NonFinite(i));
            }
            for &vertex in face.vertices {
                match owner.get(&vertex) {
                    Some(&other) => union(&mut parent, i, other),
                    None => {
                        owner.insert(vertex, i);
                    }
                }
            }
        }

        let mut by_root: HashMap<usize, usize> = HashMap::new();
        let mut islands: Vec<Island> = Vec::new();
        for (i, face) in faces.iter().enumerate() {
            let root = find(&mut parent, i);
            let slot = *by_root.entry(root).or_insert_with(|| {
                islands.push(Island {
                    faces: Vec::new(),
                    min: DVec2::INFINITY,
                    max: DVec2::NEG_INFINITY,
                });
                islands.len() - 1
            });
            let island = &mut islands[slot];
            island.faces.push(i);
            for uv in face.uvs.iter() {
                island.min = island.min.min(*uv);
                island.max = island.max.max(*uv);
            }
        }

        // Faces without loops contribute no extent
        for island in &mut islands {
            if !island.min.is_finite() {
                island.min = DVec2::ZERO;
                island.max = DVec2::ZERO;
            }
        }
        Ok(islands)
    }
}

impl UvPacker for ShelfPacker {
    fn pack(&mut self, faces: &mut [PackFace<'_>]) -> Result<(), PackError> {
        if faces.is_empty() {
            return Ok(());
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(PackError::Failed(format!("invalid margin {}", self.margin)));
        }

        let islands = Self::islands(faces)?;

        let mut order: Vec<usize> = (0..islands.len()).collect();
        order.sort_by(|&a, &b| {
            islands[b]
                .size()
                .y
                .total_cmp(&islands[a].size().y)
                .then(a.cmp(&b))
        });

        let area: f64 = islands
            .iter()
            .map(|island| {
                let s = island.size() + DVec2::splat(self.margin);
                s.x * s.y
            })
            .sum();
        let widest = islands
            .iter()
            .map(|island| island.size().x)
            .fold(0.0, f64::max);
        let row_limit = area.sqrt().max(widest);

        // Top-left placement of each island, in unscaled units
        let mut placement = vec![DVec2::ZERO; islands.len()];
        let mut cursor = DVec2::ZERO;
        let mut row_height = 0.0_f64;
        let mut extent = DVec2::ZERO;
        for &i in &order {
            let size = islands[i].size();
            if cursor.x > 0.0 && cursor.x + size.x > row_limit {
                cursor.x = 0.0;
                cursor.y += row_height + self.margin;
                row_height = 0.0;
            }
            placement[i] = cursor;
            extent = extent.max(cursor + size);
            cursor.x += size.x + self.margin;
            row_height = row_height.max(size.y);
        }

        let longest = extent.max_element();
        let scale = if longest > 0.0 { 1.0 / longest } else { 1.0 };

        for (island, origin) in islands.iter().zip(&placement) {
            for &f in &island.faces {
                for uv in faces[f].uvs.iter_mut() {
                    let local = *uv - island.min;
                    // Rows grow downwards from the top of the atlas
                    let flipped = DVec2::new(
                        origin.x + local.x,
                        extent.y - origin.y - island.size().y + local.y,
                    );
                    *uv = flipped * scale;
                }
            }
        }

        tracing::debug!(
            "Packed {} faces in {} islands, scale {:.6}",
            faces.len(),
            islands.len(),
            scale
        );
        Ok(())
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(vertices: [VertexId; 4], min: (f64, f64), max: (f64, f64)) -> Polygon {
        let mut polygon = Polygon::new(vertices.to_vec());
        polygon.uvs = vec![
            DVec2::new(min.0, min.1),
            DVec2::new(min.0, max.1),
            DVec2::new(max.0, max.1),
            DVec2::new(max.0, min.1),
        ];
        polygon
    }

    fn pack(polygons: &mut [Polygon], packer: &mut ShelfPacker) -> Result<(), PackError> {
        let mut faces: Vec<PackFace> = polygons.iter_mut().map(PackFace::new).collect();
        packer.pack(&mut faces)
    }

    #[test]
    fn test_single_island_is_normalized() {
        let mut polygons = vec![
            quad([0, 1, 2, 3], (0.0, 0.0), (2.0, 1.0)),
            quad([2, 3, 4, 5], (2.0, 0.0), (4.0, 1.0)),
        ];
        pack(&mut polygons, &mut ShelfPacker::default()).unwrap();

        // 4 x 1 layout scaled by 1/4, shapes preserved
        assert_eq!(polygons[0].uvs[0], DVec2::new(0.0, 0.0));
        assert_eq!(polygons[0].uvs[2], DVec2::new(0.5, 0.25));
        assert_eq!(polygons[1].uvs[2], DVec2::new(1.0, 0.25));
    }

    #[test]
    fn test_islands_do_not_overlap() {
        // Two disjoint islands stacked on top of each other before packing
        let mut polygons = vec![
            quad([0, 1, 2, 3], (0.0, 0.0), (3.0, 2.0)),
            quad([4, 5, 6, 7], (0.0, 0.0), (3.0, 2.0)),
            quad([8, 9, 10, 11], (0.0, 0.0), (1.0, 1.0)),
        ];
        pack(&mut polygons, &mut ShelfPacker::new(0.5)).unwrap();

        let rects: Vec<(DVec2, DVec2)> = polygons
            .iter()
            .map(|p| {
                let min = p.uvs.iter().fold(DVec2::INFINITY, |a, b| a.min(*b));
                let max = p.uvs.iter().fold(DVec2::NEG_INFINITY, |a, b| a.max(*b));
                (min, max)
            })
            .collect();

        for (min, max) in &rects {
            assert!(min.cmpge(DVec2::ZERO).all() && max.cmple(DVec2::ONE).all());
        }
        for i in 0..rects.len() {
            for j in i + 1..rects.len() {
                let (a_min, a_max) = rects[i];
                let (b_min, b_max) = rects[j];
                let overlap = a_min.x < b_max.x
                    && b_min.x < a_max.x
                    && a_min.y < b_max.y
                    && b_min.y < a_max.y;
                assert!(!overlap, "islands {} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn test_preserves_aspect() {
        let mut polygons = vec![quad([0, 1, 2, 3], (5.0, 5.0), (7.0, 6.0))];
        pack(&mut polygons, &mut ShelfPacker::default()).unwrap();
        let uvs = &polygons[0].uvs;
        let width = uvs[2].x - uvs[0].x;
        let height = uvs[2].y - uvs[0].y;
        assert_eq!(width, 1.0);
        assert_eq!(height, 0.5);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut polygons = vec![quad([0, 1, 2, 3], (0.0, 0.0), (f64::NAN, 1.0))];
        assert_eq!(
            pack(&mut polygons, &mut ShelfPacker::default()),
            Err(PackError::NonFinite(0))
        );
    }

    #[test]
    fn test_empty_is_noop() {
        assert!(pack(&mut [], &mut ShelfPacker::default()).is_ok());
    }
}
