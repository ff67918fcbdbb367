use glam::{Mat4, Vec2, Vec3};

use crate::math::Ray;

pub const DEFAULT_FOV_Y_DEGREES: f32 = 60.0;
pub const DEFAULT_NEAR: f32 = 0.5;
pub const DEFAULT_FAR: f32 = 500.0;

/// Perspective camera looking at a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            fov_y_degrees: DEFAULT_FOV_Y_DEGREES,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    /// Camera on +Z backed off far enough to frame a scatter of `radius`
    pub fn framing(radius: f32, aspect: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, 1.25 * radius), Vec3::ZERO, aspect)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.target, self.up());
        let proj = Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far);
        proj * view
    }

    /// Window pixels (origin top-left) to NDC in [-1, 1], +Y up
    pub fn pixel_to_ndc(x: f32, y: f32, width: u32, height: u32) -> Vec2 {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Vec2::new(x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
    }

    pub fn ndc_to_pixel(ndc: Vec2, width: u32, height: u32) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (1.0 - ndc.y) * 0.5 * height as f32,
        )
    }

    /// World ray through a point on the image plane, limited to the far plane
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let half_height = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction = self.forward()
            + self.right() * ndc.x * half_width
            + self.up() * ndc.y * half_height;
        Ray::new(self.position, direction).with_far(self.far)
    }

    /// NDC of a world point, or None when it lies behind the camera
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        if (point - self.position).dot(self.forward()) <= 0.0 {
            return None;
        }
        let clip = self.view_projection() * point.extend(1.0);
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::framing(40.0, 4.0 / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::default();
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 50.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(ray.far, DEFAULT_FAR);
    }

    #[test]
    fn test_pixel_ndc_round_trip() {
        let ndc = Camera::pixel_to_ndc(200.0, 150.0, 800, 600);
        assert!((ndc - Vec2::new(-0.5, 0.5)).length() < 1e-6);
        let px = Camera::ndc_to_pixel(ndc, 800, 600);
        assert!((px - Vec2::new(200.0, 150.0)).length() < 1e-4);
    }

    #[test]
    fn test_project_matches_ray() {
        let camera = Camera::default();
        let point = Vec3::new(3.0, -2.0, 5.0);
        let ndc = camera.project(point).unwrap();
        let ray = camera.ray_from_ndc(ndc);
        let to_point = (point - ray.origin).normalize();
        assert!(ray.direction.dot(to_point) > 0.9999);
        assert!(camera.project(Vec3::new(0.0, 0.0, 60.0)).is_none());
    }

    #[test]
    fn test_set_aspect_ignores_zero() {
        let mut camera = Camera::default();
        camera.set_aspect(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect(0, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}
