use glam::{Mat4, Vec3};

/// Half-line `origin + t * direction` limited to `t <= far`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub far: f32,
}

impl Ray {
    /// Unbounded ray; `direction` is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            far: f32::INFINITY,
        }
    }

    pub fn with_far(mut self, far: f32) -> Self {
        self.far = far;
        self
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Express the ray in another frame without renormalizing the direction,
    /// so parametric distances stay comparable with the source frame
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
            far: self.far,
        }
    }
}

pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero direction components are clamped so the slab test never divides by zero
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        if t_far > 0.001 {
            t_far
        } else {
            -1.0
        }
    } else {
        t_near
    }
}

/// Slab test honoring the ray's `far` limit. Returns the entry distance
/// (0 when the origin is inside the box).
pub fn ray_hits_aabb(ray: &Ray, box_min: Vec3, box_max: Vec3) -> Option<f32> {
    if box_min.cmple(ray.origin).all() && ray.origin.cmple(box_max).all() {
        return Some(0.0);
    }
    let t = intersect_aabb(ray.origin, ray.direction, box_min, box_max);
    (t >= 0.0 && t <= ray.far).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_aabb_hit() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, -1.0, -1.0),
            Vec3::new(10.0, 1.0, 1.0),
        );
        assert!((t - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_intersect_aabb_miss() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, 2.0, 2.0),
            Vec3::new(10.0, 3.0, 3.0),
        );
        assert!(t < 0.0);
    }

    #[test]
    fn test_ray_hits_aabb_respects_far() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X).with_far(4.0);
        assert!(ray_hits_aabb(&ray, Vec3::new(5.0, -1.0, -1.0), Vec3::new(6.0, 1.0, 1.0)).is_none());
        let ray = ray.with_far(10.0);
        assert!(ray_hits_aabb(&ray, Vec3::new(5.0, -1.0, -1.0), Vec3::new(6.0, 1.0, 1.0)).is_some());
    }

    #[test]
    fn test_ray_origin_inside_box() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_hits_aabb(&ray, Vec3::splat(-1.0), Vec3::splat(1.0)), Some(0.0));
    }

    #[test]
    fn test_ray_transformed_keeps_parameter() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let to_local = Mat4::from_scale(Vec3::splat(0.5));
        let local = ray.transformed(&to_local);
        // Same t lands on the image of the same world point
        assert!((local.at(4.0) - to_local.transform_point3(ray.at(4.0))).length() < 1e-5);
    }
}
