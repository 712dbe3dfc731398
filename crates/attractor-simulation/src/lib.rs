//! # Attractor Simulation Engine
//!
//! GPU particle simulation: buffer set, shader registry and the compute step
//! that pulls particles towards moving attractors.

pub mod buffers;
pub mod error;
pub mod params;
pub mod programs;
pub mod simulation;

pub use buffers::*;
pub use error::*;
pub use params::*;
pub use programs::*;
pub use simulation::*;
