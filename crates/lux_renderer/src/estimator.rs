//! Photon map radiance estimate.
//!
//! The candidates of a photon map query that lie within the cutoff radius
//! are averaged, each weighted by a zero-mean Gaussian of its distance to
//! the shading point.

use std::f32::consts::PI;

use lux_math::Vec3;

use crate::config::EstimatorConfig;
use crate::kdtree::{KdTree, Neighbourhood};

/// Normal probability density at `x`.
#[inline]
pub fn gaussian(x: f32, mean: f32, sigma: f32) -> f32 {
    let d = (x - mean) / sigma;
    (-0.5 * d * d).exp() / (sigma * (2.0 * PI).sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadianceEstimator {
    pub cutoff: f32,
    pub spread: f32,
}

impl Default for RadianceEstimator {
    fn default() -> Self {
        Self::new(&EstimatorConfig::default())
    }
}

impl RadianceEstimator {
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            cutoff: config.cutoff,
            spread: config.spread,
        }
    }

    /// Query `map` at `point` and estimate the light arriving there.
    pub fn estimate(&self, map: &KdTree, point: Vec3) -> Option<f32> {
        self.estimate_from(&map.query(point), point)
    }

    /// Weighted mean intensity of the candidates within the cutoff.
    ///
    /// `None` when no candidate is close enough to say anything.
    pub fn estimate_from(&self, neighbourhood: &Neighbourhood<'_>, point: Vec3) -> Option<f32> {
        let (weighted, total) = neighbourhood
            .within(point, self.cutoff)
            .map(|(photon, distance)| {
                let w = gaussian(distance, 0.0, self.spread);
                (w * photon.intensity, w)
            })
            .fold((0.0, 0.0), |(sum, weights), (iw, w)| (sum + iw, weights + w));

        (total > 0.0).then(|| weighted / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_peak() {
        let peak = gaussian(0.0, 0.0, 0.4);
        assert!((peak - 0.997_355_7).abs() < 1e-5);
        assert!(gaussian(0.1, 0.0, 0.4) < peak);
        assert_eq!(gaussian(0.1, 0.0, 0.4), gaussian(-0.1, 0.0, 0.4));
    }

    #[test]
    fn test_empty_map_has_no_estimate() {
        let estimator = RadianceEstimator::default();
        assert_eq!(estimator.estimate(&KdTree::new(), Vec3::ZERO), None);
    }

    #[test]
    fn test_distant_photons_have_no_estimate() {
        let mut map = KdTree::new();
        map.insert(Vec3::new(1.0, 0.0, 0.0), 1.0);
        map.insert(Vec3::new(0.0, 0.06, 0.0), 1.0);

        let estimator = RadianceEstimator::default();
        assert_eq!(estimator.estimate(&map, Vec3::ZERO), None);
    }

    #[test]
    fn test_weighted_mean_of_two_photons() {
        // Root at +0.01 on x sends the -0.04 photon left; both are visited
        let mut map = KdTree::new();
        map.insert(Vec3::new(0.01, 0.0, 0.0), 1.0);
        map.insert(Vec3::new(-0.04, 0.0, 0.0), 2.0);

        let w1 = gaussian(0.01, 0.0, 0.4);
        let w2 = gaussian(0.04, 0.0, 0.4);
        let expected = (w1 * 1.0 + w2 * 2.0) / (w1 + w2);

        let estimate = RadianceEstimator::default().estimate(&map, Vec3::ZERO).unwrap();
        assert!((estimate - expected).abs() < 1e-6);
        assert!((estimate - 1.498_83).abs() < 1e-4);
    }

    #[test]
    fn test_single_photon_estimate_is_its_intensity() {
        let mut map = KdTree::new();
        map.insert(Vec3::new(0.0, 0.02, 0.0), 0.16);

        let estimate = RadianceEstimator::default().estimate(&map, Vec3::ZERO).unwrap();
        assert!((estimate - 0.16).abs() < 1e-6);
    }

    #[test]
    fn test_photon_on_cutoff_counts() {
        let mut map = KdTree::new();
        map.insert(Vec3::new(0.0, 0.0, 0.5), 0.4);

        let estimator = RadianceEstimator {
            cutoff: 0.5,
            spread: 0.4,
        };
        let estimate = estimator.estimate(&map, Vec3::ZERO).unwrap();
        assert!((estimate - 0.4).abs() < 1e-6);
    }
}
