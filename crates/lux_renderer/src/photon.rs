//! Photon emission from the scene light.
//!
//! Each photon leaves the point light in a random direction, deposits a
//! record at every surface it strikes and bounces specularly until it
//! escapes the scene, loses the survival roll or runs out of bounces.
//! Intensity starts at 1 and is multiplied by the decay factor after every
//! deposit.

use lux_math::{Interval, Ray, Vec3};
use rand::{Rng, RngCore};

use crate::config::{DirectionSampling, PhotonConfig};
use crate::gen_f32;
use crate::hittable::{HitRecord, Hittable};
use crate::kdtree::KdTree;

/// A stored light deposit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub position: Vec3,
    pub intensity: f32,
}

impl Photon {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Random unit direction for a photon leaving the light.
///
/// [`DirectionSampling::Cube`] normalizes a point drawn uniformly from the
/// cube `[-1, 1]^3`, which favours the cube's diagonals.
/// [`DirectionSampling::Sphere`] rejects points outside the unit ball first
/// and is uniform over the sphere.
pub fn sample_direction(sampling: DirectionSampling, rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            2.0 * gen_f32(rng) - 1.0,
            2.0 * gen_f32(rng) - 1.0,
            2.0 * gen_f32(rng) - 1.0,
        );
        let len_sq = p.length_squared();
        // A zero vector has no direction; draw again
        if len_sq <= 1e-12 {
            continue;
        }
        if sampling == DirectionSampling::Sphere && len_sq > 1.0 {
            continue;
        }
        return p / len_sq.sqrt();
    }
}

/// Simulates photon paths and collects their deposits.
#[derive(Debug, Clone, Default)]
pub struct PhotonEmitter {
    config: PhotonConfig,
}

impl PhotonEmitter {
    pub fn new(config: PhotonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhotonConfig {
        &self.config
    }

    /// Follow one photon from `light`, appending its deposits to `photons`.
    ///
    /// Returns the number of deposits made; zero means the photon escaped
    /// without touching anything.
    pub fn trace_path(
        &self,
        world: &dyn Hittable,
        light: Vec3,
        rng: &mut dyn RngCore,
        photons: &mut Vec<Photon>,
    ) -> usize {
        let survival = f64::from(self.config.survival).clamp(0.0, 1.0);
        let mut ray = Ray::new(light, sample_direction(self.config.sampling, rng));
        let mut intensity = 1.0;
        let mut deposits = 0;

        for _ in 0..self.config.max_bounces {
            let mut rec = HitRecord::default();
            if !world.hit(&ray, Interval::FORWARD, &mut rec) {
                break;
            }

            photons.push(Photon::new(rec.p, intensity));
            deposits += 1;
            intensity *= self.config.decay;

            if !rng.gen_bool(survival) {
                break;
            }
            ray = ray.reflected(rec.p, rec.normal);
        }

        deposits
    }

    /// Emit every photon and return the deposits in emission order.
    pub fn emit(&self, world: &dyn Hittable, light: Vec3, rng: &mut dyn RngCore) -> Vec<Photon> {
        let mut photons = Vec::with_capacity(self.config.count);
        let mut escaped = 0usize;

        for _ in 0..self.config.count {
            if self.trace_path(world, light, rng, &mut photons) == 0 {
                escaped += 1;
            }
        }

        log::debug!(
            "Emitted {} photons: {} deposits, {} escaped",
            self.config.count,
            photons.len(),
            escaped
        );
        photons
    }

    /// Emit every photon and insert the deposits into a new photon map.
    pub fn build_map(&self, world: &dyn Hittable, light: Vec3, rng: &mut dyn RngCore) -> KdTree {
        log::info!(
            "Building photon map: {} photons from light at {:?}",
            self.config.count,
            light
        );

        let map: KdTree = self.emit(world, light, rng).into_iter().collect();

        if map.is_empty() && self.config.count > 0 {
            log::warn!("Photon map is empty: every photon escaped the scene");
        } else {
            log::info!("Photon map built: {} photons, depth {}", map.len(), map.depth());
        }
        map
    }
}
