//! Decorative bodies: the translucent spheres floating around the text.
//!
//! Placement is drawn once from a seeded ChaCha RNG, so a given seed always
//! produces the same cloud. After that only the owning group node moves.

use crate::graph::GeometryHandle;
use bubbletext_common::Transform;
use bubbletext_materials::MaterialId;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Scatter parameters for the decorative cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    pub count: usize,
    /// Edge length of the cube the bodies are placed in, centered on the origin.
    pub spread: f32,
    pub seed: u64,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            count: 500,
            spread: 15.0,
            seed: 42,
        }
    }
}

/// One sphere of the cloud. Immutable after startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorativeBody {
    pub transform: Transform,
}

/// Instanced bodies sharing one geometry and one material.
#[derive(Debug, Clone)]
pub struct BodyGroup {
    pub bodies: Vec<DecorativeBody>,
    pub geometry: GeometryHandle,
    pub material: MaterialId,
}

impl BodyGroup {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Place `params.count` bodies: uniform position in the cube, uniform
/// scale in `[0, 1)`, rotation about X and Y uniform in `[0, π)`.
pub fn scatter(params: &ScatterParams) -> Vec<DecorativeBody> {
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let spread = params.spread;
    (0..params.count)
        .map(|_| {
            let position = Vec3::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            );
            let scale = rng.random::<f32>();
            let rx = rng.random::<f32>() * PI;
            let ry = rng.random::<f32>() * PI;
            DecorativeBody {
                transform: Transform::from_position(position)
                    .with_uniform_scale(scale)
                    .with_euler(rx, ry, 0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_scene_layout() {
        let p = ScatterParams::default();
        assert_eq!(p.count, 500);
        assert_eq!(p.spread, 15.0);
    }

    #[test]
    fn scatter_is_reproducible_for_a_seed() {
        let p = ScatterParams::default();
        assert_eq!(scatter(&p), scatter(&p));

        let other = scatter(&ScatterParams { seed: 7, ..p.clone() });
        assert_ne!(scatter(&p), other);
    }

    #[test]
    fn bodies_stay_inside_the_cube() {
        let p = ScatterParams {
            count: 2000,
            spread: 15.0,
            seed: 3,
        };
        let bodies = scatter(&p);
        assert_eq!(bodies.len(), 2000);
        for b in &bodies {
            let t = b.transform;
            assert!(t.position.abs().max_element() <= 7.5);
            assert!(t.scale.x >= 0.0 && t.scale.x < 1.0);
            assert_eq!(t.scale.x, t.scale.y);
            assert_eq!(t.scale.y, t.scale.z);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let p = ScatterParams {
            count: 0,
            ..ScatterParams::default()
        };
        assert!(scatter(&p).is_empty());
    }
}
