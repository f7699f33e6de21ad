//! Wavefront OBJ/MTL loading.
//!
//! Faces are triangulated by `tobj`; only positions and the diffuse `Kd`
//! colour are used. Material names decide the two surface flags the ray
//! tracer understands (mirror and smooth shading).

use std::path::Path;

use lux_math::Vec3;

use crate::error::{SceneError, SceneResult};
use crate::scene::{Material, Scene};

/// Options for [`load_obj`].
#[derive(Clone, Debug)]
pub struct ObjOptions {
    /// Uniform scale applied to every vertex
    pub scale: f32,

    /// Material names that become mirrors
    pub mirror_materials: Vec<String>,

    /// Material names that are smooth shaded
    pub smooth_materials: Vec<String>,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self {
            scale: 0.17,
            mirror_materials: vec!["Mirror".to_string()],
            smooth_materials: vec!["Sphere".to_string()],
        }
    }
}

impl ObjOptions {
    /// Same options with a different scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    fn material_from(&self, mtl: &tobj::Material) -> Material {
        let colour = mtl
            .diffuse
            .map(Vec3::from_array)
            .unwrap_or_else(|| Material::default().colour);
        let mut material = Material::new(mtl.name.clone(), colour);
        material.mirror = self.mirror_materials.iter().any(|n| *n == mtl.name);
        material.smooth = self.smooth_materials.iter().any(|n| *n == mtl.name);
        material
    }
}

/// Load an OBJ file (and its MTL library, if any) into a new [`Scene`].
///
/// The light is placed with [`Scene::default_light`] and vertex normals are
/// computed for smooth-shaded materials.
pub fn load_obj<P: AsRef<Path>>(path: P, options: &ObjOptions) -> SceneResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("No usable MTL library for {:?}: {}", path, e);
        Vec::new()
    });

    let mut scene = Scene::new(name);
    for mtl in &materials {
        scene.add_material(options.material_from(mtl));
    }

    // Faces without `usemtl` share one grey material, created on demand
    let mut fallback: Option<usize> = None;

    for model in &models {
        let mesh = &model.mesh;
        let material = match mesh.material_id {
            Some(id) if id < materials.len() => id,
            _ => *fallback.get_or_insert_with(|| scene.add_material(Material::default())),
        };

        for face in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [face[0], face[1], face[2]].map(|i| {
                let i = i as usize * 3;
                Vec3::from_slice(&mesh.positions[i..i + 3]) * options.scale
            });
            scene.add_triangle(a, b, c, material)?;
        }

        log::debug!("Model '{}': {} triangles", model.name, mesh.indices.len() / 3);
    }

    if scene.is_empty() {
        return Err(SceneError::NoGeometry(path.display().to_string()));
    }

    scene.compute_vertex_normals();
    if let Some(light) = scene.default_light() {
        scene.light = light;
    }

    log::info!(
        "Loaded {} triangles, {} materials from {:?}",
        scene.triangle_count(),
        scene.materials().len(),
        path
    );

    Ok(scene)
}
