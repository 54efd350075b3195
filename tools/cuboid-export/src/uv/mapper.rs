//! Per-cuboid UV mapper
//!
//! Remembers which polygon carries each face of one cuboid and which vertex
//! sits at each face corner. All UV reads and writes go through vertex
//! identity, never loop position, so the mapper is unaffected by how the
//! host orders polygon loops.

use cuboid_common::{Cuboid, Position2d, Size, UvMap};
use glam::{DVec2, DVec3};

use super::layout::Face;
use crate::bounds::Bounds;
use crate::octant::OctantMap;
use crate::scene::{Mesh, PolygonIndex, VertexId};

/// No polygon matches a face, or a face polygon lost one of its corners
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("no polygon matches the {face} face (vertices {vertices:?})")]
pub struct FaceLookupError {
    pub face: Face,
    pub vertices: [VertexId; 4],
}

/// UV mapping state of one cuboid between layout and read-back
#[derive(Debug, Clone)]
pub struct UvMapper {
    octants: OctantMap,
    /// Polygon index per face, indexed by [`Face::index`]
    polygons: [usize; 6],
}

impl UvMapper {
    /// Find the polygon of every face without touching any UVs.
    pub fn locate(index: &PolygonIndex, octants: OctantMap) -> Result<Self, FaceLookupError> {
        let mut polygons = [0; 6];
        for face in Face::ALL {
            let vertices = face_vertices(&octants, face);
            polygons[face.index()] = index
                .find(vertices)
                .ok_or(FaceLookupError { face, vertices })?;
        }
        Ok(Self { octants, polygons })
    }

    /// Write the cross layout for a box of `size` (w, h, d) onto the faces.
    pub fn apply(
        mesh: &mut Mesh,
        index: &PolygonIndex,
        octants: OctantMap,
        size: DVec3,
    ) -> Result<Self, FaceLookupError> {
        let mapper = Self::locate(index, octants)?;
        for face in Face::ALL {
            mapper.write_face(mesh, face, face.layout(size))?;
        }
        Ok(mapper)
    }

    /// Vertex ids at the corners of `face`
    pub fn vertices(&self, face: Face) -> [VertexId; 4] {
        face_vertices(&self.octants, face)
    }

    /// Polygon index carrying `face`
    pub fn polygon(&self, face: Face) -> usize {
        self.polygons[face.index()]
    }

    /// Exclude the bottom face from the packing pass.
    pub fn hide_bottom(&self, mesh: &mut Mesh) {
        mesh.polygons[self.polygon(Face::Bottom)].hidden = true;
    }

    /// Rebuild the bottom face beside the packed top face and unhide it.
    ///
    /// The bottom's own pre-pack layout is discarded since it never took part
    /// in packing.
    pub fn restore_bottom(&self, mesh: &mut Mesh) -> Result<(), FaceLookupError> {
        let top = self.face_uvs(mesh, Face::Top)?;
        let width = top[3].x - top[0].x;
        let bottom = [
            top[2],
            top[3],
            DVec2::new(top[3].x + width, top[3].y),
            DVec2::new(top[2].x + width, top[2].y),
        ];
        self.write_face(mesh, Face::Bottom, bottom)?;
        mesh.polygons[self.polygon(Face::Bottom)].hidden = false;
        Ok(())
    }

    /// Atlas origin of the unwrap (top-left, v measured downwards)
    pub fn offset(&self, mesh: &Mesh) -> Result<DVec2, FaceLookupError> {
        let left = self.face_uvs(mesh, Face::Left)?;
        let top = self.face_uvs(mesh, Face::Top)?;
        Ok(DVec2::new(left[1].x, 1.0 - top[1].y))
    }

    /// Packed unwrap dimensions (width, height, depth)
    pub fn size(&self, mesh: &Mesh) -> Result<DVec3, FaceLookupError> {
        let front = self.face_uvs(mesh, Face::Front)?;
        let top = self.face_uvs(mesh, Face::Top)?;
        Ok(DVec3::new(
            front[3].x - front[0].x,
            front[1].y - front[0].y,
            top[1].y - top[0].y,
        ))
    }

    /// Read the final placement and attach it to the cuboid.
    ///
    /// Only meaningful after packing and [`UvMapper::restore_bottom`].
    pub fn sync(&self, mesh: &Mesh, bounds: Bounds) -> Result<Cuboid, FaceLookupError> {
        let uv_map = UvMap::new(
            Position2d::from(self.offset(mesh)?),
            Size::from(self.size(mesh)?),
        );
        Ok(bounds.into_cuboid(uv_map))
    }

    /// Current UVs of `face` in corner order
    pub fn face_uvs(&self, mesh: &Mesh, face: Face) -> Result<[DVec2; 4], FaceLookupError> {
        let polygon = &mesh.polygons[self.polygon(face)];
        let vertices = self.vertices(face);
        let mut uvs = [DVec2::ZERO; 4];
        for (uv, &vertex) in uvs.iter_mut().zip(&vertices) {
            *uv = polygon
                .uv_at(vertex)
                .ok_or(FaceLookupError { face, vertices })?;
        }
        Ok(uvs)
    }

    fn write_face(
        &self,
        mesh: &mut Mesh,
        face: Face,
        uvs: [DVec2; 4],
    ) -> Result<(), FaceLookupError> {
        let polygon = &mut mesh.polygons[self.polygon(face)];
        let vertices = self.vertices(face);
        for (&vertex, uv) in vertices.iter().zip(uvs) {
            if !polygon.set_uv_at(vertex, uv) {
                return Err(FaceLookupError { face, vertices });
            }
        }
        Ok(())
    }
}

fn face_vertices(octants: &OctantMap, face: Face) -> [VertexId; 4] {
    face.corners().map(|slot| octants[slot])
}
