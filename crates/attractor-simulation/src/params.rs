//! Simulation configuration and the per-frame uniform block

use crate::error::SimulationError;
use attractor_physics::{
    ATTRACTOR_COUNT, ATTRACTOR_STRENGTH, DAMPING, PARTICLE_COUNT, SOFTENING, WORKGROUP_SIZE,
};
use bytemuck::{Pod, Zeroable};

/// Sizes and kernel constants. Defaults come from `attractor_physics::constants`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub particle_count: u32,
    pub attractor_count: u32,
    pub workgroup_size: u32,
    pub attractor_strength: f32,
    pub softening: f32,
    pub damping: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            attractor_count: ATTRACTOR_COUNT,
            workgroup_size: WORKGROUP_SIZE,
            attractor_strength: ATTRACTOR_STRENGTH,
            softening: SOFTENING,
            damping: DAMPING,
        }
    }
}

impl SimulationConfig {
    /// Reject configs the dispatch cannot cover exactly.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.particle_count == 0 {
            return Err(SimulationError::NoParticles);
        }
        if self.attractor_count == 0 {
            return Err(SimulationError::NoAttractors);
        }
        if self.workgroup_size == 0 || self.particle_count % self.workgroup_size != 0 {
            return Err(SimulationError::InvalidWorkgroup {
                particle_count: self.particle_count,
                workgroup_size: self.workgroup_size,
            });
        }
        Ok(())
    }

    /// Workgroups per dispatch. Exact because `validate` rejects remainders.
    pub fn workgroup_count(&self) -> u32 {
        self.particle_count / self.workgroup_size
    }

    pub fn to_params(&self, dt: f32) -> SimParams {
        SimParams {
            dt,
            attractor_strength: self.attractor_strength,
            softening: self.softening,
            damping: self.damping,
            particle_count: self.particle_count,
            attractor_count: self.attractor_count,
            _padding: [0; 2],
        }
    }
}

/// Uniform block bound at slot 3 of the compute program (matches WGSL)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SimParams {
    pub dt: f32,
    pub attractor_strength: f32,
    pub softening: f32,
    pub damping: f32,
    pub particle_count: u32,
    pub attractor_count: u32,
    pub _padding: [u32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(particle_count: u32, attractor_count: u32, workgroup_size: u32) -> SimulationConfig {
        SimulationConfig {
            particle_count,
            attractor_count,
            workgroup_size,
            ..Default::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particle_count % config.workgroup_size, 0);
    }

    #[test]
    fn dispatch_covers_exactly() {
        let config = config(1024, 5, 128);
        config.validate().unwrap();
        assert_eq!(config.workgroup_count(), 8);
        assert_eq!(config.workgroup_count() * config.workgroup_size, 1024);
    }

    #[test]
    fn remainder_is_rejected() {
        assert!(matches!(
            config(1000, 5, 128).validate(),
            Err(SimulationError::InvalidWorkgroup {
                particle_count: 1000,
                workgroup_size: 128
            })
        ));
        assert!(matches!(
            config(1024, 5, 0).validate(),
            Err(SimulationError::InvalidWorkgroup { .. })
        ));
    }

    #[test]
    fn empty_counts_are_rejected() {
        assert!(matches!(config(0, 5, 128).validate(), Err(SimulationError::NoParticles)));
        assert!(matches!(config(128, 0, 128).validate(), Err(SimulationError::NoAttractors)));
    }

    #[test]
    fn params_are_uniform_sized() {
        assert_eq!(std::mem::size_of::<SimParams>(), 32);
        let params = config(256, 3, 128).to_params(0.25);
        assert_eq!(params.dt, 0.25);
        assert_eq!(params.particle_count, 256);
        assert_eq!(params.attractor_count, 3);
    }
}
