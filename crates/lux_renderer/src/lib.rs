//! Lux Renderer - photon-mapped CPU ray tracing
//!
//! A Whitted-style ray tracer over triangle scenes, with an optional
//! indirect-lighting mode that reads a photon map: a k-d tree filled by
//! simulating photons from the scene light, queried per shading point and
//! averaged with a Gaussian kernel.

mod buffer;
mod camera;
mod config;
mod error;
mod estimator;
mod hittable;
mod kdtree;
mod photon;
mod renderer;
mod triangle;

#[cfg(test)]
mod testing;

pub use buffer::{color_to_rgba, Color, ImageBuffer};
pub use camera::Camera;
pub use config::{DirectionSampling, EstimatorConfig, PhotonConfig, RenderConfig, ShadingMode};
pub use error::{RenderError, RenderResult};
pub use estimator::{gaussian, RadianceEstimator};
pub use hittable::{HitRecord, Hittable};
pub use kdtree::{KdNode, KdTree, Neighbourhood};
pub use photon::{sample_direction, Photon, PhotonEmitter};
pub use renderer::{render, Renderer, Shader};
pub use triangle::{intersect, TriangleHit};

/// Re-export math and scene types used in this crate's API
pub use lux_core::{Material, Scene, Triangle};
pub use lux_math::{Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
