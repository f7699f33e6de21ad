// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::{reflect, Ray};

/// Component of `v` along axis `axis` (0=X, 1=Y, 2=Z), wrapping past Z.
#[inline]
pub fn axis_component(v: Vec3, axis: usize) -> f32 {
    match axis % 3 {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(axis_component(v, 0), 1.0);
        assert_eq!(axis_component(v, 1), 2.0);
        assert_eq!(axis_component(v, 2), 3.0);
        // Depth-based axis cycling passes raw depths
        assert_eq!(axis_component(v, 4), 2.0);
    }

    #[test]
    fn test_mat3_rotation_matches_column_layout() {
        // Rotation about X keeps the X column and mixes Y/Z
        let r = Mat3::from_rotation_x(std::f32::consts::FRAC_PI_2);
        assert!((r.x_axis - Vec3::X).length() < 1e-6);
        assert!((r * Vec3::Y - Vec3::Z).length() < 1e-6);
    }
}
