//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm.

use crate::hittable::{HitRecord, Hittable};
use lux_core::Triangle;
use lux_math::{Interval, Ray};

/// Parametric solution of a ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
}

/// Möller-Trumbore intersection of `ray` with the plane region of `triangle`.
///
/// Returns `None` when the ray is parallel to the triangle or crosses its
/// plane outside the edges. `t` is not range checked, so hits behind the
/// origin are reported with negative `t`.
pub fn intersect(triangle: &Triangle, ray: &Ray) -> Option<TriangleHit> {
    let (edge1, edge2) = triangle.edges();

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - triangle.vertices[0];
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(TriangleHit {
        t: f * edge2.dot(q),
        u,
        v,
    })
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let Some(hit) = intersect(self, ray) else {
            return false;
        };

        if !ray_t.contains(hit.t) {
            return false;
        }

        rec.t = hit.t;
        rec.p = ray.at(hit.t);
        rec.set_face_normal(ray, self.normal);
        rec.u = hit.u;
        rec.v = hit.v;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::Vec3;

    fn triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            0,
        )
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(triangle().hit(&ray, Interval::FORWARD, &mut rec));
        assert!((rec.t - 1.0).abs() < 0.001);
        assert!((rec.p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_triangle_miss() {
        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(!triangle().hit(&ray, Interval::FORWARD, &mut rec));

        // Passing beside the triangle
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(intersect(&triangle(), &ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::X);
        assert!(intersect(&triangle(), &ray).is_none());
    }

    #[test]
    fn test_intersect_reports_hits_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::NEG_Z);
        let hit = intersect(&triangle(), &ray).unwrap();
        assert!((hit.t + 2.0).abs() < 1e-5);

        let mut rec = HitRecord::default();
        assert!(!triangle().hit(&ray, Interval::FORWARD, &mut rec));
    }

    #[test]
    fn test_barycentrics_at_vertices() {
        let tri = triangle();
        // Aim straight at the second vertex
        let ray = Ray::new(Vec3::new(0.999, -0.999, 0.0), Vec3::NEG_Z);
        let hit = intersect(&tri, &ray).unwrap();
        assert!(hit.u > 0.99);
        assert!(hit.v < 0.01);
    }
}
