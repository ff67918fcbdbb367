use glam::Vec3;

use super::Mesh;

/// (normal, u, v) per face with `u × v == normal`, so corners listed
/// counter-clockwise in (u, v) wind outward
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Axis-aligned box centred on the origin. Each side has its own four
/// vertices so normals stay flat.
pub fn build(size: Vec3) -> Mesh {
    let half = size * 0.5;
    let mut vertices = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);

    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.push((normal + u * su + v * sv) * half);
        }
        faces.push([base, base + 1, base + 2]);
        faces.push([base, base + 2, base + 3]);
    }

    Mesh::from_valid_parts(vertices, faces)
}

pub fn cube(edge: f32) -> Mesh {
    build(Vec3::splat(edge))
}
