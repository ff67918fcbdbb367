use glam::{Mat4, Vec3};
use arrow_markers::math::{intersect_aabb, ray_hits_aabb, Ray};

#[cfg(test)]
mod ray_intersection_tests {
    use super::*;

    fn unit_box() -> (Vec3, Vec3) {
        (Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_ray_hits_aabb_from_outside() {
        let ray = Ray::new(Vec3::new(-5.0, 0.2, 0.1), Vec3::X);
        let (min, max) = unit_box();

        let t = ray_hits_aabb(&ray, min, max).expect("Ray should hit AABB");

        assert!((t - 4.0).abs() < 0.001, "Hit distance should be ~4.0, got {}", t);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let ray = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        let (min, max) = unit_box();

        assert_eq!(ray_hits_aabb(&ray, min, max), None, "Ray should miss AABB");
        assert_eq!(intersect_aabb(ray.origin, ray.direction, min, max), -1.0);
    }

    #[test]
    fn test_ray_starts_inside_aabb() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0));
        let (min, max) = unit_box();

        assert_eq!(ray_hits_aabb(&ray, min, max), Some(0.0), "Origin inside should report 0");
    }

    #[test]
    fn test_ray_pointing_away_from_aabb() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        let (min, max) = unit_box();

        assert_eq!(ray_hits_aabb(&ray, min, max), None);
    }

    #[test]
    fn test_ray_far_limit() {
        let (min, max) = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);

        assert!(ray_hits_aabb(&ray.with_far(9.5), min, max).is_some());
        assert!(ray_hits_aabb(&ray.with_far(8.5), min, max).is_none(), "Box beyond far must be culled");
    }

    #[test]
    fn test_ray_parallel_to_aabb_face() {
        let ray = Ray::new(Vec3::new(-5.0, 1.5, 0.0), Vec3::X);
        let (min, max) = unit_box();

        assert!(ray_hits_aabb(&ray, min, max).is_none());
    }

    #[test]
    fn test_ray_hits_aabb_at_angle() {
        let ray = Ray::new(Vec3::new(-5.0, -5.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let (min, max) = unit_box();

        let t = ray_hits_aabb(&ray, min, max).expect("Diagonal ray should hit");
        let expected = 4.0 * std::f32::consts::SQRT_2;
        assert!((t - expected).abs() < 0.001, "expected {}, got {}", expected, t);
    }
}

#[cfg(test)]
mod ray_value_tests {
    use super::*;

    #[test]
    fn test_ray_direction_normalization() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));

        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.far, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ONE, Vec3::Y);
        assert_eq!(ray.at(2.0), Vec3::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn test_transformed_keeps_parameter() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let to_local = Mat4::from_scale(Vec3::splat(0.5));
        let local = ray.transformed(&to_local);

        // Same t reaches the image of the same world point
        let world_point = ray.at(4.0);
        assert!((local.at(4.0) - to_local.transform_point3(world_point)).length() < 1e-6);
        assert!((local.direction.length() - 0.5).abs() < 1e-6, "Direction must not be renormalized");
    }
}
