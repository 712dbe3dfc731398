//! Error types for simulation setup and readback

use crate::programs::ProgramId;
use thiserror::Error;

/// Everything that can go wrong building or reading back the simulation.
///
/// All of these are startup faults except `Readback`, which only the
/// diagnostic readback path can produce.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(
        "particle count {particle_count} is not a multiple of the workgroup size {workgroup_size}"
    )]
    InvalidWorkgroup {
        particle_count: u32,
        workgroup_size: u32,
    },

    #[error("simulation needs at least one particle")]
    NoParticles,

    #[error("simulation needs at least one attractor")]
    NoAttractors,

    #[error("initial state has {actual} {what}, config expects {expected}")]
    CountMismatch {
        what: &'static str,
        expected: u32,
        actual: u32,
    },

    #[error("failed to compile {program:?} shader: {message}")]
    ShaderCompilation { program: ProgramId, message: String },

    #[error("buffer readback failed: {0}")]
    Readback(String),
}

impl From<wgpu::BufferAsyncError> for SimulationError {
    fn from(err: wgpu::BufferAsyncError) -> Self {
        SimulationError::Readback(err.to_string())
    }
}

impl From<wgpu::PollError> for SimulationError {
    fn from(err: wgpu::PollError) -> Self {
        SimulationError::Readback(err.to_string())
    }
}
