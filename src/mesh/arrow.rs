//! Procedural arrow: a cylindrical shaft tapering into a cone tip.
//!
//! The arrow is a surface of revolution around +Y spanning `y ∈ [-1, 1]`,
//! sampled at `slices` angular steps on four rings:
//!
//! | ring | radius | height |
//! |------|--------|--------|
//! | 0    | `r`    | `-1`   |
//! | 1    | `r`    | `h`    |
//! | 2    | `1`    | `h`    |
//! | 3    | `0`    | `1`    |
//!
//! with `r = point_radius_proportion` and `h = 2 * point_height_proportion - 1`.
//! A centre vertex at `(0, -1, 0)` closes the base.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::Mesh;
use crate::error::MeshError;
use crate::scene::Transform;

const SECTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowMeshParameters {
    pub slices: u32,
    pub point_height_proportion: f32,
    pub point_radius_proportion: f32,
}

impl Default for ArrowMeshParameters {
    fn default() -> Self {
        Self {
            slices: 20,
            point_height_proportion: 0.85,
            point_radius_proportion: 0.4,
        }
    }
}

impl ArrowMeshParameters {
    pub fn new(slices: u32, point_height_proportion: f32, point_radius_proportion: f32) -> Self {
        Self {
            slices,
            point_height_proportion,
            point_radius_proportion,
        }
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.slices < 3 {
            return Err(MeshError::InvalidParameter {
                name: "slices",
                value: self.slices as f32,
                reason: "at least 3 slices are required",
            });
        }
        for (name, value) in [
            ("point_height_proportion", self.point_height_proportion),
            ("point_radius_proportion", self.point_radius_proportion),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(MeshError::InvalidParameter {
                    name,
                    value,
                    reason: "proportion must be in (0, 1]",
                });
            }
        }
        Ok(())
    }

    /// Height of the shaft/point boundary on the [-1, 1] axis
    pub fn point_base_height(&self) -> f32 {
        2.0 * self.point_height_proportion - 1.0
    }

    pub fn vertex_count(&self) -> usize {
        SECTIONS * self.slices as usize + 1
    }

    pub fn face_count(&self) -> usize {
        7 * self.slices as usize
    }
}

/// Build the arrow mesh.
///
/// Never fails. Parameters outside the contract still yield an index-valid
/// mesh: fewer than 3 slices collapse the rings into degenerate, possibly
/// self-intersecting geometry. Use [`try_build`] to reject them instead.
pub fn build(params: &ArrowMeshParameters) -> Mesh {
    let slices = params.slices as usize;
    let h = params.point_base_height();
    let r = params.point_radius_proportion;
    let radii = [r, r, 1.0, 0.0];
    let heights = [-1.0, h, h, 1.0];
    let delta = TAU / params.slices.max(1) as f32;

    let mut vertices = Vec::with_capacity(params.vertex_count());
    for (&radius, &height) in radii.iter().zip(&heights) {
        vertices.extend((0..slices).map(|j| {
            let angle = j as f32 * delta;
            Vec3::new(radius * angle.cos(), height, radius * angle.sin())
        }));
    }

    let mut faces = Vec::with_capacity(params.face_count());
    let s = slices as u32;
    for i in 0..(SECTIONS as u32 - 1) {
        for j in 0..s {
            let a = j + i * s;
            let b = (j + 1) % s + i * s;
            let c = a + s;
            let d = b + s;
            faces.push([b, a, c]);
            faces.push([c, d, b]);
        }
    }

    vertices.push(Vec3::new(0.0, heights[0], 0.0));
    let apex = SECTIONS as u32 * s;
    for j in 0..s {
        faces.push([j, (j + 1) % s, apex]);
    }

    Mesh::from_valid_parts(vertices, faces)
}

/// Strict variant of [`build`]
pub fn try_build(params: &ArrowMeshParameters) -> Result<Mesh, MeshError> {
    params.validate()?;
    Ok(build(params))
}

/// Arrow whose shape follows live parameters, standing on the ground plane.
///
/// The mesh is rebuilt only when the shape parameters change; scale changes
/// only affect [`ArrowPreview::transform`].
#[derive(Debug, Clone)]
pub struct ArrowPreview {
    params: ArrowMeshParameters,
    pub width_scale: f32,
    pub height_scale: f32,
    mesh: Arc<Mesh>,
}

impl ArrowPreview {
    pub fn new(params: ArrowMeshParameters) -> Self {
        Self {
            params,
            width_scale: 0.5,
            height_scale: 1.8,
            mesh: Arc::new(build(&params)),
        }
    }

    pub fn params(&self) -> &ArrowMeshParameters {
        &self.params
    }

    pub fn mesh(&self) -> Arc<Mesh> {
        Arc::clone(&self.mesh)
    }

    /// Returns true when a new mesh was built
    pub fn set_params(&mut self, params: ArrowMeshParameters) -> bool {
        if params == self.params {
            return false;
        }
        log::debug!("rebuilding arrow mesh: {:?}", params);
        self.params = params;
        self.mesh = Arc::new(build(&params));
        true
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translation: Vec3::new(0.0, self.height_scale, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(self.width_scale, self.height_scale, self.width_scale),
        }
    }
}

impl Default for ArrowPreview {
    fn default() -> Self {
        Self::new(ArrowMeshParameters::new(20, 0.8, 0.4))
    }
}
