//! Orientation markers: three colored arrows (X red, Y green, Z blue) around
//! a small grey cube, grouped so they select and move together.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::Rng;

use super::{GroupId, Material, MaterialId, Scene, Transform};
use crate::mesh::{arrow, cuboid, ArrowMeshParameters, Mesh};

pub const ARROW_HEIGHT_SCALE: f32 = 1.8;
pub const ARROW_WIDTH_SCALE: f32 = 0.2;
/// Offset of each arrow's centre along its own axis
pub const ARROW_SHIFT: f32 = 0.1;

pub const DEFAULT_MARKER_COUNT: usize = 40;
pub const DEFAULT_SCATTER_RADIUS: f32 = 40.0;

/// Meshes and materials shared by every marker in a scene
#[derive(Debug, Clone)]
pub struct MarkerAssets {
    pub arrow: Arc<Mesh>,
    pub cube: Arc<Mesh>,
    pub x_material: MaterialId,
    pub y_material: MaterialId,
    pub z_material: MaterialId,
    pub cube_material: MaterialId,
}

impl MarkerAssets {
    pub fn new(scene: &mut Scene) -> Self {
        Self::with_arrow(scene, ArrowMeshParameters::default())
    }

    pub fn with_arrow(scene: &mut Scene, params: ArrowMeshParameters) -> Self {
        Self {
            arrow: Arc::new(arrow::build(&params)),
            cube: Arc::new(cuboid::cube(ARROW_WIDTH_SCALE)),
            x_material: scene.add_material(Material::from_hex("x-axis", 0xff0000)),
            y_material: scene.add_material(Material::from_hex("y-axis", 0x00ff00)),
            z_material: scene.add_material(Material::from_hex("z-axis", 0x0000ff)),
            cube_material: scene.add_material(Material::from_hex("center", 0x888888)),
        }
    }
}

fn axis_transform(rotation: Quat, shift: Vec3) -> Transform {
    Transform {
        translation: shift,
        rotation,
        scale: Vec3::new(ARROW_WIDTH_SCALE, ARROW_HEIGHT_SCALE, ARROW_WIDTH_SCALE),
    }
}

/// Adds one marker; members are X arrow, Y arrow, Z arrow, cube in that order
pub fn spawn_marker(scene: &mut Scene, assets: &MarkerAssets, placement: Transform) -> GroupId {
    let group = scene.add_group(placement);

    let parts = [
        (
            &assets.arrow,
            axis_transform(Quat::from_rotation_z(1.5 * PI), Vec3::X * ARROW_SHIFT),
            assets.x_material,
        ),
        (
            &assets.arrow,
            axis_transform(Quat::IDENTITY, Vec3::Y * ARROW_SHIFT),
            assets.y_material,
        ),
        (
            &assets.arrow,
            axis_transform(Quat::from_rotation_x(0.5 * PI), Vec3::Z * ARROW_SHIFT),
            assets.z_material,
        ),
        (&assets.cube, Transform::IDENTITY, assets.cube_material),
    ];

    let members: Vec<_> = parts
        .into_iter()
        .filter_map(|(mesh, transform, material)| {
            scene.add_group_member(group, Arc::clone(mesh), transform, material)
        })
        .collect();
    log::trace!("marker {:?} spawned with members {:?}", group, members);

    group
}

/// Random placement inside a cube of side `radius` centred on the origin,
/// with random XYZ euler orientation
pub fn random_placement(rng: &mut impl Rng, radius: f32) -> Transform {
    let half = radius * 0.5;
    let translation = Vec3::new(
        rng.gen_range(-half..half),
        rng.gen_range(-half..half),
        rng.gen_range(-half..half),
    );
    let euler = Vec3::new(
        rng.gen_range(0.0..TAU),
        rng.gen_range(0.0..TAU),
        rng.gen_range(0.0..TAU),
    );
    Transform::from_translation_euler(translation, euler)
}

pub fn scatter_markers(
    scene: &mut Scene,
    assets: &MarkerAssets,
    count: usize,
    radius: f32,
    rng: &mut impl Rng,
) -> Vec<GroupId> {
    let groups: Vec<_> = (0..count)
        .map(|_| {
            let placement = random_placement(rng, radius);
            spawn_marker(scene, assets, placement)
        })
        .collect();
    log::info!("scattered {} markers ({} entities)", groups.len(), scene.entity_count());
    groups
}
