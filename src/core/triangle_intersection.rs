use glam::Vec3;

/// Result of triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleIntersection {
    pub t: f32,           // Distance along ray
    pub u: f32,           // Barycentric coordinate u
    pub v: f32,           // Barycentric coordinate v
    pub normal: Vec3,     // Geometric normal, counter-clockwise winding
}

impl TriangleIntersection {
    /// Get barycentric coordinates (u, v, w) where w = 1 - u - v
    pub fn barycentric(&self) -> (f32, f32, f32) {
        (self.u, self.v, 1.0 - self.u - self.v)
    }

    /// True when the ray struck the side the winding faces
    pub fn is_front_face(&self, ray_dir: Vec3) -> bool {
        self.normal.dot(ray_dir) < 0.0
    }
}

/// Möller-Trumbore ray-triangle intersection.
/// Two-sided: hits on back faces are reported too.
pub fn moller_trumbore_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleIntersection> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Parallel ray or degenerate triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Behind the origin
    if t < EPSILON {
        return None;
    }

    let normal = edge1.cross(edge2).normalize();

    Some(TriangleIntersection { t, u, v, normal })
}

/// Closest hit over a set of triangles, with the index of the winning one
pub fn nearest_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    triangles: impl IntoIterator<Item = [Vec3; 3]>,
) -> Option<(usize, TriangleIntersection)> {
    let mut closest_hit = None;
    let mut closest_t = f32::INFINITY;

    for (idx, [v0, v1, v2]) in triangles.into_iter().enumerate() {
        if let Some(hit) = moller_trumbore_intersect(ray_origin, ray_dir, v0, v1, v2) {
            if hit.t < closest_t {
                closest_t = hit.t;
                closest_hit = Some((idx, hit));
            }
        }
    }

    closest_hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_triangle() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(-1.0, 0.0, -5.0),
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        )
    }

    #[test]
    fn test_moller_trumbore_hit() {
        let (v0, v1, v2) = create_test_triangle();
        let hit = moller_trumbore_intersect(Vec3::new(0.0, 0.2, 0.0), Vec3::NEG_Z, v0, v1, v2);
        assert!(hit.is_some());

        let hit = hit.unwrap();
        assert!((hit.t - 5.0).abs() < 1e-5);
        assert!(hit.u >= 0.0 && hit.u <= 1.0);
        assert!(hit.v >= 0.0 && hit.v <= 1.0);
        assert!(hit.u + hit.v <= 1.0);
    }

    #[test]
    fn test_moller_trumbore_miss() {
        let (v0, v1, v2) = create_test_triangle();
        let ray_dir = Vec3::new(5.0, 0.0, -1.0).normalize();
        assert!(moller_trumbore_intersect(Vec3::ZERO, ray_dir, v0, v1, v2).is_none());
    }

    #[test]
    fn test_behind_ray() {
        let (v0, v1, v2) = create_test_triangle();
        assert!(moller_trumbore_intersect(Vec3::ZERO, Vec3::Z, v0, v1, v2).is_none());
    }

    #[test]
    fn test_degenerate_triangle_never_hit() {
        let p = Vec3::new(0.0, 0.0, -5.0);
        assert!(moller_trumbore_intersect(Vec3::ZERO, Vec3::NEG_Z, p, p, Vec3::new(1.0, 0.0, -5.0)).is_none());
    }

    #[test]
    fn test_barycentric_coordinates() {
        let (v0, v1, v2) = create_test_triangle();
        let hit = moller_trumbore_intersect(Vec3::new(0.0, 0.2, 0.0), Vec3::NEG_Z, v0, v1, v2).unwrap();
        let (u, v, w) = hit.barycentric();
        assert!((u + v + w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_front_face_and_normal() {
        let (v0, v1, v2) = create_test_triangle();
        let hit = moller_trumbore_intersect(Vec3::new(0.0, 0.2, 0.0), Vec3::NEG_Z, v0, v1, v2).unwrap();
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);
        assert!(hit.normal.z > 0.0);
        assert!(hit.is_front_face(Vec3::NEG_Z));
    }

    #[test]
    fn test_nearest_intersection_prefers_closer() {
        let far = [
            Vec3::new(-1.0, 0.0, -10.0),
            Vec3::new(1.0, 0.0, -10.0),
            Vec3::new(0.0, 1.0, -10.0),
        ];
        let near = [
            Vec3::new(-1.0, 0.0, -5.0),
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        ];

        let (idx, hit) =
            nearest_intersection(Vec3::new(0.0, 0.2, 0.0), Vec3::NEG_Z, [far, near]).unwrap();
        assert_eq!(idx, 1);
        assert!((hit.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_edge_case_parallel_ray() {
        let (v0, v1, v2) = create_test_triangle();
        let hit = moller_trumbore_intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::X, v0, v1, v2);
        assert!(hit.is_none());
    }
}
