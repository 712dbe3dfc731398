//! Attractor pull and integration step
//!
//! NOTE: These are reference implementations for documentation and testing.
//! The actual simulation runs the same math in `particles_compute.wgsl`.

use crate::constants::*;
use crate::particle::{Attractor, ParticlePosition, ParticleVelocity};
use glam::Vec3;

/// Acceleration on a particle of mass `mass` at `position` from every attractor.
/// F = strength * r̂ / (r² + ε²)
pub fn attraction(position: Vec3, mass: f32, attractors: &[Attractor]) -> Vec3 {
    let softening_sq = SOFTENING * SOFTENING;
    let force = attractors.iter().fold(Vec3::ZERO, |acc, a| {
        let r_vec = a.xyz() - position;
        let dist_sq = r_vec.length_squared() + softening_sq;
        acc + r_vec * (ATTRACTOR_STRENGTH / (dist_sq * dist_sq.sqrt()))
    });
    force / mass.max(MASS_MIN)
}

/// Semi-implicit Euler step with linear damping. `dt == 0` leaves both
/// position and velocity untouched.
pub fn integrate(
    position: &mut ParticlePosition,
    velocity: &mut ParticleVelocity,
    attractors: &[Attractor],
    dt: f32,
) {
    let acc = attraction(position.xyz(), position.w, attractors);
    let damping = (1.0 - DAMPING * dt).max(0.0);
    let v = (velocity.xyz() + acc * dt) * damping;
    let p = position.xyz() + v * dt;

    velocity.velocity = v.to_array();
    position.position = p.to_array();
}
