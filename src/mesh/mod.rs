//! Immutable indexed triangle meshes.
//!
//! A [`Mesh`] is built once and never edited: a shape change means building
//! a new mesh. Meshes are shared between scene entities through `Arc`.

pub mod arrow;
pub mod cuboid;

use glam::Vec3;
use serde::Serialize;

use crate::core::triangle_intersection::nearest_intersection;
use crate::error::MeshError;
use crate::math::{Ray, AABB};

pub use arrow::{ArrowMeshParameters, ArrowPreview};

/// Vertex layout handed to the render collaborator
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Plain-array view of a mesh for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct MeshExport {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    normals: Vec<Vec3>,
    bounds: AABB,
}

impl Mesh {
    /// Validate face indices and compute vertex normals
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self::from_valid_parts(vertices, faces))
    }

    /// Caller guarantees every index is in range
    pub(crate) fn from_valid_parts(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Self {
        debug_assert!(faces
            .iter()
            .flatten()
            .all(|&i| (i as usize) < vertices.len()));

        let normals = compute_vertex_normals(&vertices, &faces);
        let bounds = AABB::from_points(vertices.iter().copied())
            .unwrap_or(AABB::new(Vec3::ZERO, Vec3::ZERO));

        Self {
            vertices,
            faces,
            normals,
            bounds,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Local-space bounding box
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.faces.len()).map(move |i| self.triangle(i))
    }

    /// Interleaved position/normal buffer
    pub fn gpu_vertices(&self) -> Vec<MeshVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Flattened triangle list index buffer
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }

    pub fn export(&self) -> MeshExport {
        MeshExport {
            vertices: self.vertices.iter().map(|v| v.to_array()).collect(),
            faces: self.faces.clone(),
            normals: self.normals.iter().map(|n| n.to_array()).collect(),
        }
    }

    /// Nearest triangle hit of a ray given in this mesh's local space
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        nearest_intersection(ray.origin, ray.direction, self.triangles())
            .map(|(_, hit)| hit.t)
            .filter(|&t| t <= ray.far)
    }

    /// Signed enclosed volume; positive when faces wind outward
    pub fn signed_volume(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| a.dot(b.cross(c)))
            .sum::<f32>()
            / 6.0
    }
}

/// Area-weighted average of adjacent face normals. Vertices touched only by
/// degenerate faces fall back to their radial direction, or ±Y on the axis.
pub fn compute_vertex_normals(vertices: &[Vec3], faces: &[[u32; 3]]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; vertices.len()];

    for &[a, b, c] in faces {
        let (pa, pb, pc) = (
            vertices[a as usize],
            vertices[b as usize],
            vertices[c as usize],
        );
        // Unnormalized cross product: length is twice the face area
        let weighted = (pb - pa).cross(pc - pa);
        accum[a as usize] += weighted;
        accum[b as usize] += weighted;
        accum[c as usize] += weighted;
    }

    accum
        .into_iter()
        .zip(vertices)
        .map(|(n, p)| {
            n.try_normalize().unwrap_or_else(|| {
                Vec3::new(p.x, 0.0, p.z)
                    .try_normalize()
                    .unwrap_or(if p.y < 0.0 { Vec3::NEG_Y } else { Vec3::Y })
            })
        })
        .collect()
}
