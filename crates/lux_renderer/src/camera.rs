//! Pinhole camera for ray generation.
//!
//! The orientation matrix maps world directions into camera space, where the
//! camera looks down -Z with +Y up. Rotations are applied on the left, so
//! each one turns the camera about its own current axes.

use lux_math::{Mat3, Ray, Vec3};

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    pub position: Vec3,
    /// World-to-camera rotation
    pub orientation: Mat3,
    /// Image plane distance, in image widths
    pub focal_length: f32,

    /// Distance moved per [`Camera::translate`] step
    pub speed: f32,
    /// Angle in radians turned per rotation step
    pub rotation_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 600,
            position: Vec3::new(0.0, 0.0, 4.0),
            orientation: Mat3::IDENTITY,
            focal_length: 2.0,
            speed: 0.05,
            rotation_speed: 0.5_f32.to_radians(),
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Point the camera at `target`.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.look_at(target);
        self
    }

    /// Move by `speed` along each component of `direction` (world axes).
    pub fn translate(&mut self, direction: Vec3) {
        self.position += direction * self.speed;
    }

    /// Tilt up or down by `steps` rotation steps.
    pub fn pitch(&mut self, steps: f32) {
        self.rotate(Mat3::from_rotation_x(steps * self.rotation_speed));
    }

    /// Turn left or right by `steps` rotation steps.
    pub fn yaw(&mut self, steps: f32) {
        self.rotate(Mat3::from_rotation_y(steps * self.rotation_speed));
    }

    /// Roll about the view axis by `steps` rotation steps.
    pub fn roll(&mut self, steps: f32) {
        self.rotate(Mat3::from_rotation_z(steps * self.rotation_speed));
    }

    fn rotate(&mut self, rotation: Mat3) {
        self.orientation = rotation * self.orientation;
    }

    /// Rebuild the orientation so the camera faces `target` with world +Y up.
    ///
    /// Looking straight up or down has no defined roll; world +X is used as
    /// the camera's right axis then.
    pub fn look_at(&mut self, target: Vec3) {
        let back = (self.position - target).normalize_or_zero();
        if back == Vec3::ZERO {
            return;
        }

        let mut right = Vec3::Y.cross(back).normalize_or_zero();
        if right == Vec3::ZERO {
            right = Vec3::X;
        }
        let up = back.cross(right);

        self.orientation = Mat3::from_cols(right, up, back).transpose();
    }

    /// Move `angle` radians around the world Y axis at the current distance
    /// from it, keeping height, then face the origin.
    pub fn orbit(&mut self, angle: f32) {
        let radius = Vec3::new(self.position.x, 0.0, self.position.z).length();
        let theta = self.position.z.atan2(self.position.x) + angle;

        self.position.x = radius * theta.cos();
        self.position.z = radius * theta.sin();
        self.look_at(Vec3::ZERO);
    }

    /// World-space viewing direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation.transpose() * Vec3::NEG_Z
    }

    /// Primary ray through image coordinates `(px, py)`, measured in pixels
    /// from the top-left corner.
    pub fn ray(&self, px: f32, py: f32) -> Ray {
        let width = self.image_width as f32;
        let height = self.image_height as f32;

        let camera_space = Vec3::new(px - width / 2.0, height / 2.0 - py, -self.focal_length * width);
        Ray::normalized(self.position, self.orientation.transpose() * camera_space)
    }

    /// Primary ray for pixel `(x, y)`.
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        self.ray(x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_centre_ray_looks_down_negative_z() {
        let camera = Camera::new();
        let ray = camera.get_ray(400, 300);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 4.0));
        assert_close(ray.direction, Vec3::NEG_Z);
        assert_close(camera.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_image_axes() {
        let camera = Camera::new().with_resolution(8, 6);
        // Left edge of the image looks left, top edge looks up
        assert!(camera.get_ray(0, 3).direction.x < 0.0);
        assert!(camera.get_ray(4, 0).direction.y > 0.0);
        assert!(camera.get_ray(4, 5).direction.y < 0.0);
    }

    #[test]
    fn test_translate_uses_speed() {
        let mut camera = Camera::new();
        camera.translate(Vec3::X);
        camera.translate(Vec3::NEG_Z);
        assert_close(camera.position, Vec3::new(0.05, 0.0, 3.95));
    }

    #[test]
    fn test_yaw_round_trip() {
        let mut camera = Camera::new();
        camera.yaw(10.0);
        assert!((camera.forward() - Vec3::NEG_Z).length() > 0.01);
        camera.yaw(-10.0);
        assert!(camera.orientation.abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_pitch_turns_view_vertically() {
        let mut camera = Camera::new();
        camera.pitch(20.0);
        let forward = camera.forward();
        assert!(forward.y.abs() > 0.1);
        assert!(forward.x.abs() < 1e-5);
    }

    #[test]
    fn test_roll_keeps_forward() {
        let mut camera = Camera::new();
        camera.roll(30.0);
        assert_close(camera.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_look_at() {
        let camera = Camera::new().looking_at(Vec3::ZERO);
        assert!(camera.orientation.abs_diff_eq(Mat3::IDENTITY, 1e-6));

        let camera = Camera::new()
            .with_position(Vec3::new(4.0, 0.0, 0.0))
            .looking_at(Vec3::ZERO);
        assert_close(camera.forward(), Vec3::NEG_X);
        assert_close(camera.orientation.transpose() * Vec3::Y, Vec3::Y);
    }

    #[test]
    fn test_look_straight_down() {
        let camera = Camera::new()
            .with_position(Vec3::new(0.0, 5.0, 0.0))
            .looking_at(Vec3::ZERO);
        assert_close(camera.forward(), Vec3::NEG_Y);
        assert!(camera.orientation.is_finite());
    }

    #[test]
    fn test_orbit_quarter_turn() {
        let mut camera = Camera::new();
        camera.orbit(FRAC_PI_2);
        assert_close(camera.position, Vec3::new(-4.0, 0.0, 0.0));
        assert_close(camera.forward(), Vec3::X);
    }

    #[test]
    fn test_orbit_keeps_height() {
        let mut camera = Camera::new().with_position(Vec3::new(3.0, 1.5, 0.0));
        camera.orbit(1.0);
        assert!((camera.position.y - 1.5).abs() < 1e-6);
        let horizontal = Vec3::new(camera.position.x, 0.0, camera.position.z).length();
        assert!((horizontal - 3.0).abs() < 1e-5);
    }
}
