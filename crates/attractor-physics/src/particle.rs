//! GPU-compatible particle and attractor layouts
//!
//! WGSL storage arrays of `vec3<f32>` use a 16-byte stride, so every
//! three-component buffer carries an unused fourth lane.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Particle position. `w` is a per-particle scalar the kernel uses as mass;
/// the point renderer ignores it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticlePosition {
    pub position: [f32; 3],
    pub w: f32,
}

impl ParticlePosition {
    pub fn new(position: Vec3, w: f32) -> Self {
        Self {
            position: position.to_array(),
            w,
        }
    }

    pub fn xyz(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn to_vec4(&self) -> Vec4 {
        self.xyz().extend(self.w)
    }
}

/// Particle velocity
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVelocity {
    pub velocity: [f32; 3],
    pub _padding: f32,
}

impl ParticleVelocity {
    pub fn new(velocity: Vec3) -> Self {
        Self {
            velocity: velocity.to_array(),
            _padding: 0.0,
        }
    }

    pub fn xyz(&self) -> Vec3 {
        Vec3::from_array(self.velocity)
    }
}

/// A point that pulls particles towards itself
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Attractor {
    pub position: [f32; 3],
    pub _padding: f32,
}

impl Attractor {
    pub fn new(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _padding: 0.0,
        }
    }

    pub fn xyz(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn set(&mut self, position: Vec3) {
        self.position = position.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn layouts_match_wgsl_stride() {
        assert_eq!(mem::size_of::<ParticlePosition>(), 16);
        assert_eq!(mem::size_of::<ParticleVelocity>(), 16);
        assert_eq!(mem::size_of::<Attractor>(), 16);
    }

    #[test]
    fn attractor_set_keeps_padding_zero() {
        let mut a = Attractor::new(Vec3::new(1.0, 2.0, 3.0));
        a.set(Vec3::new(-4.0, 5.0, 0.5));
        assert_eq!(a.xyz(), Vec3::new(-4.0, 5.0, 0.5));
        assert_eq!(a._padding, 0.0);
    }

    #[test]
    fn position_extends_with_w() {
        let p = ParticlePosition::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(p.to_vec4(), Vec4::new(1.0, 2.0, 3.0, 0.5));
    }
}
