//! Whitted-style ray tracer.
//!
//! Each pixel gets one primary ray. Mirror surfaces reflect it once; the
//! surface it lands on is then lit either directly from the point light or
//! from the photon map.

use std::f32::consts::{FRAC_PI_2, PI};
use std::time::Instant;

use lux_core::{Material, Scene};
use lux_math::{reflect, Interval, Ray, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::config::{RenderConfig, ShadingMode};
use crate::estimator::RadianceEstimator;
use crate::hittable::{HitRecord, Hittable};
use crate::kdtree::KdTree;
use crate::photon::PhotonEmitter;
use crate::{Color, ImageBuffer};

/// Brightness of a shadowed surface relative to its colour
const SHADOW_FACTOR: f32 = 0.2;
/// Sharpness of the specular highlight
const SPECULAR_EXPONENT: i32 = 60;
/// Scale applied to the diffuse term in direct mode
const DIFFUSE_GAIN: f32 = 5.0;

/// Everything needed to shade a ray, shared read-only across render threads.
pub struct Shader<'a> {
    scene: &'a Scene,
    mode: ShadingMode,
    background: Color,
    photon_map: Option<&'a KdTree>,
    estimator: RadianceEstimator,
}

impl<'a> Shader<'a> {
    pub fn new(scene: &'a Scene, config: &RenderConfig, photon_map: Option<&'a KdTree>) -> Self {
        Self {
            scene,
            mode: config.mode,
            background: config.background_color(),
            photon_map,
            estimator: RadianceEstimator::new(&config.estimator),
        }
    }

    /// Colour seen along `ray`.
    pub fn trace(&self, ray: &Ray) -> Color {
        let mut rec = HitRecord::default();
        if !self.scene.hit(ray, Interval::FORWARD, &mut rec) {
            return self.background;
        }

        let material = self.material_at(&rec);
        if !material.mirror {
            return self.shade(ray, &rec, material);
        }

        // One specular bounce; whatever is seen in the mirror is shaded as-is
        let bounced = ray.reflected(rec.p, rec.normal);
        let mut mirrored = HitRecord::default();
        if !self.scene.hit(&bounced, Interval::FORWARD, &mut mirrored) {
            return self.background;
        }
        self.shade(&bounced, &mirrored, self.material_at(&mirrored))
    }

    fn material_at(&self, rec: &HitRecord) -> &'a Material {
        self.scene.material_of(&self.scene.triangles()[rec.triangle])
    }

    /// Colour of the surface at `rec`, reached along `ray`.
    fn shade(&self, ray: &Ray, rec: &HitRecord, material: &Material) -> Color {
        if self.mode == ShadingMode::Indirect {
            if let Some(map) = self.photon_map {
                let radiance = self.estimator.estimate(map, rec.p).unwrap_or(0.0);
                return material.colour * radiance;
            }
        }

        let normal = if material.smooth {
            let n = self.scene.triangles()[rec.triangle].shading_normal(rec.u, rec.v);
            if n.dot(ray.direction) > 0.0 {
                -n
            } else {
                n
            }
        } else {
            rec.normal
        };

        self.direct(ray.origin, rec.p, normal, material.colour)
    }

    /// Point light shading: specular highlight plus a distance-attenuated
    /// diffuse term, or a flat dark tone when the light is blocked.
    fn direct(&self, eye: Vec3, p: Vec3, normal: Vec3, colour: Color) -> Color {
        let to_light = self.scene.light - p;
        let distance = to_light.length();
        let light_dir = to_light.normalize_or_zero();

        if self.occluded(p, light_dir, distance) {
            return colour * SHADOW_FACTOR;
        }

        let view_dir = (eye - p).normalize_or_zero();
        let specular = reflect(-light_dir, normal)
            .dot(view_dir)
            .max(0.0)
            .powi(SPECULAR_EXPONENT);

        let angle = normal.dot(light_dir).clamp(-1.0, 1.0).acos();
        let incidence = if angle > FRAC_PI_2 {
            0.0
        } else {
            1.0 - 2.0 * angle / PI
        };
        let falloff = 1.0 / (4.0 * PI * distance * distance).max(f32::EPSILON);
        let diffuse = DIFFUSE_GAIN * (falloff * incidence).clamp(0.1, 1.0);

        (Color::splat(specular) + diffuse * colour).clamp(Color::ZERO, Color::ONE)
    }

    /// True when any surface lies strictly between `p` and the light.
    fn occluded(&self, p: Vec3, light_dir: Vec3, distance: f32) -> bool {
        if distance <= Interval::FORWARD.min {
            return false;
        }
        let shadow_ray = Ray::new(p, light_dir);
        let mut rec = HitRecord::default();
        self.scene
            .hit(&shadow_ray, Interval::new(Interval::FORWARD.min, distance - Interval::FORWARD.min), &mut rec)
    }

    /// Colour of pixel `(x, y)` seen through `camera`.
    pub fn pixel(&self, camera: &Camera, x: u32, y: u32) -> Color {
        self.trace(&camera.get_ray(x, y))
    }
}

/// Render the scene to an image buffer, one rayon task per row.
///
/// `photon_map` is only read in indirect mode; without one indirect mode
/// falls back to direct lighting.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig, photon_map: Option<&KdTree>) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    if image.pixels.is_empty() {
        return image;
    }

    let shader = Shader::new(scene, config, photon_map);
    let width = image.width as usize;

    image
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = shader.pixel(camera, x as u32, y as u32);
            }
        });

    image
}

/// A rendering session: one scene and camera, any number of frames.
///
/// In indirect mode the photon map is built when the first frame is rendered
/// and reused for every frame after it; direct mode never builds one. Camera moves between frames do not invalidate it
/// because the scene and light never change.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    config: RenderConfig,
    photon_map: Option<KdTree>,
    rng: StdRng,
}

impl Renderer {
    /// Start a session. The camera takes its resolution from `config`.
    pub fn new(scene: Scene, camera: Camera, config: RenderConfig) -> Self {
        let camera = camera.with_resolution(config.width, config.height);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            scene,
            camera,
            config,
            photon_map: None,
            rng,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera to move between frames.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The photon map, once the first indirect frame has built it.
    pub fn photon_map(&self) -> Option<&KdTree> {
        self.photon_map.as_ref()
    }

    /// Build the photon map if it does not exist yet.
    pub fn ensure_photon_map(&mut self) -> &KdTree {
        let Self {
            scene,
            config,
            photon_map,
            rng,
            ..
        } = self;

        photon_map.get_or_insert_with(|| {
            let start = Instant::now();
            let emitter = PhotonEmitter::new(config.photons.clone());
            let map = emitter.build_map(&*scene, scene.light, &mut *rng);
            log::info!("Photon map took {:.2?}", start.elapsed());
            map
        })
    }

    /// Render one frame with the current camera.
    pub fn render_frame(&mut self) -> ImageBuffer {
        if self.config.mode == ShadingMode::Indirect {
            self.ensure_photon_map();
        }

        let start = Instant::now();
        let image = render(&self.camera, &self.scene, &self.config, self.photon_map.as_ref());
        log::info!(
            "Rendered {}x{} {:?} frame in {:.2?}",
            image.width,
            image.height,
            self.config.mode,
            start.elapsed()
        );
        image
    }
}
