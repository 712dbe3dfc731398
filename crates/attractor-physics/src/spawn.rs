//! Randomised initial state

use crate::constants::*;
use crate::particle::{Attractor, ParticlePosition, ParticleVelocity};
use glam::Vec3;
use rand::Rng;

/// Host-side staging arrays uploaded once at startup
#[derive(Clone, Debug)]
pub struct InitialState {
    pub positions: Vec<ParticlePosition>,
    pub velocities: Vec<ParticleVelocity>,
    pub attractors: Vec<Attractor>,
}

/// Uniform point in the cube `[-extent, extent]^3`
pub fn random_point_in_cube<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> Vec3 {
    Vec3::new(
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
    )
}

impl InitialState {
    pub fn generate<R: Rng + ?Sized>(particle_count: u32, attractor_count: u32, rng: &mut R) -> Self {
        let positions = (0..particle_count)
            .map(|_| {
                ParticlePosition::new(
                    random_point_in_cube(rng, SPAWN_EXTENT),
                    rng.random_range(MASS_MIN..=MASS_MAX),
                )
            })
            .collect();

        let velocities = (0..particle_count)
            .map(|_| {
                let v = random_point_in_cube(rng, VELOCITY_EXTENT) + Vec3::splat(VELOCITY_BIAS);
                ParticleVelocity::new(v)
            })
            .collect();

        let attractors = (0..attractor_count)
            .map(|_| Attractor::new(random_point_in_cube(rng, ATTRACTOR_SPAWN_EXTENT)))
            .collect();

        Self {
            positions,
            velocities,
            attractors,
        }
    }

    pub fn particle_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn attractor_count(&self) -> u32 {
        self.attractors.len() as u32
    }
}
