//! Periodic attractor repositioning
//!
//! Every tick advances a shared angle `d` (degrees) and places each attractor at
//! `(sin(d) * r1, cos(d) * r2, tan(d))`, with `r1` and `r2` drawn fresh per
//! attractor from `(0, radius]`.

use crate::constants::{ANGLE_STEP_DEG, ATTRACTOR_ORBIT_RADIUS};
use crate::particle::Attractor;
use glam::Vec3;
use rand::Rng;

/// Point on the orbit for angle `angle_deg` and radii `r1`, `r2`
pub fn orbit_point(angle_deg: f32, r1: f32, r2: f32) -> Vec3 {
    let rad = angle_deg.to_radians();
    Vec3::new(rad.sin() * r1, rad.cos() * r2, rad.tan())
}

/// Uniform radius in `(0, max]`
pub fn random_radius<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    max * (1.0 - rng.random::<f32>())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttractorOrbit {
    ticks: u64,
    pub step_deg: f32,
    pub radius: f32,
}

impl Default for AttractorOrbit {
    fn default() -> Self {
        Self::new(ANGLE_STEP_DEG, ATTRACTOR_ORBIT_RADIUS)
    }
}

impl AttractorOrbit {
    pub fn new(step_deg: f32, radius: f32) -> Self {
        Self {
            ticks: 0,
            step_deg,
            radius,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current angle in degrees, `ticks * step_deg`. Monotonically increasing.
    pub fn angle_deg(&self) -> f64 {
        self.ticks as f64 * f64::from(self.step_deg)
    }

    /// Angle reduced to `[0, 360)`, as fed to `orbit_point`
    pub fn phase_deg(&self) -> f32 {
        self.angle_deg().rem_euclid(360.0) as f32
    }

    /// Advance one tick and rewrite every attractor in `attractors`.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, attractors: &mut [Attractor]) {
        self.ticks += 1;
        let phase = self.phase_deg();
        for attractor in attractors.iter_mut() {
            let r1 = random_radius(rng, self.radius);
            let r2 = random_radius(rng, self.radius);
            attractor.set(orbit_point(phase, r1, r2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn angle_after_n_ticks() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut orbit = AttractorOrbit::new(1.0, 5.0);
        let mut attractors = vec![Attractor::default(); 5];
        for _ in 0..37 {
            orbit.advance(&mut rng, &mut attractors);
        }
        assert_eq!(orbit.angle_deg(), 37.0);
    }

    #[test]
    fn positions_follow_orbit_formula() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut orbit = AttractorOrbit::new(2.5, 5.0);
        let mut attractors = vec![Attractor::default(); 4];

        for _ in 0..10 {
            let mut replay = rng.clone();
            orbit.advance(&mut rng, &mut attractors);

            let rad = orbit.phase_deg().to_radians();
            for a in &attractors {
                let r1 = random_radius(&mut replay, 5.0);
                let r2 = random_radius(&mut replay, 5.0);
                assert!(r1 > 0.0 && r1 <= 5.0);
                assert!(r2 > 0.0 && r2 <= 5.0);
                assert_eq!(a.xyz(), Vec3::new(rad.sin() * r1, rad.cos() * r2, rad.tan()));
            }
        }
    }

    #[test]
    fn all_attractors_share_z() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut orbit = AttractorOrbit::default();
        let mut attractors = vec![Attractor::default(); 8];
        orbit.advance(&mut rng, &mut attractors);

        let z = attractors[0].position[2];
        assert!(attractors.iter().all(|a| a.position[2] == z));
    }

    #[test]
    fn angle_keeps_growing_past_f32_precision() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut orbit = AttractorOrbit::new(1.0, 5.0);
        orbit.ticks = 1 << 24;
        let before = orbit.angle_deg();
        orbit.advance(&mut rng, &mut []);
        assert_eq!(orbit.angle_deg(), before + 1.0);
        assert_eq!(orbit.phase_deg(), ((1u64 << 24) + 1).rem_euclid(360) as f32);
    }

    #[test]
    fn phase_wraps_without_changing_positions() {
        let mut orbit = AttractorOrbit::new(1.0, 5.0);
        orbit.ticks = 370;
        assert_eq!(orbit.angle_deg(), 370.0);
        assert_eq!(orbit.phase_deg(), 10.0);
    }

    #[test]
    fn orbit_point_at_zero() {
        assert_eq!(orbit_point(0.0, 3.0, 4.0), Vec3::new(0.0, 4.0, 0.0));
    }
}
