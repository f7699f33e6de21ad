use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Camera rays, shadow rays and photon paths all use this type. The direction
/// is not required to be unit length, but every ray the renderer builds is
/// normalized so that `t` is a world-space distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray with a normalized direction.
    pub fn normalized(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction.normalize())
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Mirror this ray about `normal`, starting from `point`.
    pub fn reflected(&self, point: Vec3, normal: Vec3) -> Ray {
        Ray::new(point, reflect(self.direction, normal))
    }
}

/// Reflect a vector about a normal: `v - 2 (v·n) n`.
///
/// The sign of `n` does not matter, only its line.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_normalized_direction() {
        let ray = Ray::normalized(Vec3::ONE, Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!((ray.at(5.0) - Vec3::new(1.0, 4.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_reflect_ignores_normal_sign() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(reflect(v, -Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_reflected_ray_starts_at_hit() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let bounced = ray.reflected(Vec3::ZERO, Vec3::Y);
        assert_eq!(bounced.origin, Vec3::ZERO);
        assert_eq!(bounced.direction, Vec3::Y);
    }
}
