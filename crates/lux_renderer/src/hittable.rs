//! Hittable trait and HitRecord for ray-scene intersection.

use lux_core::Scene;
use lux_math::{Interval, Ray, Vec3};

/// Record of a ray-triangle intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Face normal at the intersection (always points against the ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Barycentric weights of the second and third vertex
    pub u: f32,
    pub v: f32,
    /// Index of the triangle that was hit
    pub triangle: usize,
    /// Whether the ray hit the side the face normal points to
    pub front_face: bool,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The stored normal always points against the ray, so the side of a
    /// wall facing the viewer (or the light) is the one that gets shaded.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

impl Hittable for Scene {
    /// Closest hit over every triangle, by linear scan.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for (index, triangle) in self.triangles().iter().enumerate() {
            if triangle.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
                rec.triangle = index;
            }
        }

        hit_anything
    }
}
