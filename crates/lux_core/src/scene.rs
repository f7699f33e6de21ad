//! Scene types for Lux.
//!
//! A scene is an ordered list of triangles, each referring to one material,
//! plus a single point light. The ray tracer and the photon emitter both read
//! it; nothing mutates it once rendering starts.

use std::collections::HashMap;

use lux_math::Vec3;

use crate::error::{SceneError, SceneResult};

/// Surface description shared by many triangles.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (from `newmtl` / `usemtl`)
    pub name: String,

    /// Diffuse color (RGB, 0-1)
    pub colour: Vec3,

    /// Perfect mirror: camera rays bounce once before shading
    pub mirror: bool,

    /// Interpolate vertex normals instead of using the flat face normal
    pub smooth: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            colour: Vec3::new(0.5, 0.5, 0.5), // Grey default
            mirror: false,
            smooth: false,
        }
    }
}

impl Material {
    /// Create a new material with a name and diffuse color.
    pub fn new(name: impl Into<String>, colour: Vec3) -> Self {
        Self {
            name: name.into(),
            colour,
            ..Default::default()
        }
    }

    /// Mark this material as a mirror.
    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }

    /// Mark this material as smooth shaded.
    pub fn smooth_shaded(mut self) -> Self {
        self.smooth = true;
        self
    }
}

/// A triangle with a precomputed face normal.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],

    /// Unit face normal, `(v1 - v0) x (v2 - v0)`. Zero for degenerate triangles.
    pub normal: Vec3,

    /// Per-vertex normals for smooth shading. Equal to `normal` until
    /// [`Scene::compute_vertex_normals`] runs.
    pub vertex_normals: [Vec3; 3],

    /// Index into the owning scene's material list
    pub material: usize,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: usize) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            vertices: [v0, v1, v2],
            normal,
            vertex_normals: [normal; 3],
            material,
        }
    }

    /// Edges from the first vertex: `(v1 - v0, v2 - v0)`.
    #[inline]
    pub fn edges(&self) -> (Vec3, Vec3) {
        (
            self.vertices[1] - self.vertices[0],
            self.vertices[2] - self.vertices[0],
        )
    }

    /// True when the vertices are collinear and no normal exists.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    /// Interpolated vertex normal at barycentric `(u, v)`, where `u` weights
    /// `v1` and `v` weights `v2`.
    pub fn shading_normal(&self, u: f32, v: f32) -> Vec3 {
        let w = 1.0 - u - v;
        let [n0, n1, n2] = self.vertex_normals;
        (w * n0 + u * n1 + v * n2).normalize_or_zero()
    }
}

/// A renderable scene: triangles, their materials and a point light.
#[derive(Clone, Debug)]
pub struct Scene {
    pub name: String,
    triangles: Vec<Triangle>,
    materials: Vec<Material>,

    /// Point light position
    pub light: Vec3,
}

impl Scene {
    /// Create an empty scene with the light at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
            materials: Vec::new(),
            light: Vec3::ZERO,
        }
    }

    /// Set the light position.
    pub fn with_light(mut self, light: Vec3) -> Self {
        self.light = light;
        self
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Look up a material index by name.
    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// Add a triangle using an existing material and return its index.
    pub fn add_triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, material: usize) -> SceneResult<usize> {
        if material >= self.materials.len() {
            return Err(SceneError::InvalidMaterial {
                index: material,
                count: self.materials.len(),
            });
        }

        let triangle = Triangle::new(v0, v1, v2, material);
        if triangle.is_degenerate() {
            log::warn!("Degenerate triangle {:?} in scene '{}'", triangle.vertices, self.name);
        }
        self.triangles.push(triangle);
        Ok(self.triangles.len() - 1)
    }

    /// Move every triangle and material of `other` into this scene.
    ///
    /// Material indices of the appended triangles are shifted to match, and
    /// vertex normals are recomputed so vertices shared across the two
    /// scenes are smoothed together. The light of `self` is kept.
    pub fn append(&mut self, other: Scene) {
        let offset = self.materials.len();
        self.materials.extend(other.materials);
        self.triangles.extend(other.triangles.into_iter().map(|mut t| {
            t.material += offset;
            t
        }));
        self.compute_vertex_normals();
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material of a triangle.
    pub fn material_of(&self, triangle: &Triangle) -> &Material {
        &self.materials[triangle.material]
    }

    /// Ordered (triangle, material) pairs.
    pub fn surfaces(&self) -> impl Iterator<Item = (&Triangle, &Material)> + '_ {
        self.triangles.iter().map(move |t| (t, self.material_of(t)))
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds `(min, max)` of all vertices, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.triangles.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            min = min.min(*v);
            max = max.max(*v);
        }
        Some((min, max))
    }

    /// A light position just under the top of the scene, centred in X/Z.
    ///
    /// Matches a ceiling light in a Cornell-box style room.
    pub fn default_light(&self) -> Option<Vec3> {
        self.bounds().map(|(min, max)| {
            let centre = (min + max) * 0.5;
            Vec3::new(centre.x, max.y - 0.1, centre.z)
        })
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Every triangle sharing a vertex position (exactly equal, with `-0.0`
    /// and `0.0` treated as the same) contributes its face normal to that
    /// vertex. Degenerate triangles contribute nothing.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated: HashMap<[u32; 3], Vec3> = HashMap::new();

        for triangle in &self.triangles {
            for v in &triangle.vertices {
                *accumulated.entry(vertex_key(*v)).or_insert(Vec3::ZERO) += triangle.normal;
            }
        }

        for triangle in &mut self.triangles {
            for (i, v) in triangle.vertices.iter().enumerate() {
                let sum = accumulated
                    .get(&vertex_key(*v))
                    .copied()
                    .unwrap_or(triangle.normal);
                let normal = sum.normalize_or_zero();
                triangle.vertex_normals[i] = if normal == Vec3::ZERO {
                    triangle.normal
                } else {
                    normal
                };
            }
        }
    }
}

/// Hash key for exact vertex sharing. Signed zeros share a key.
fn vertex_key(v: Vec3) -> [u32; 3] {
    let bits = |c: f32| if c == 0.0 { 0.0f32.to_bits() } else { c.to_bits() };
    [bits(v.x), bits(v.y), bits(v.z)]
}
