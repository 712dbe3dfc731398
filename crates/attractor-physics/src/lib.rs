//! # Attractor Physics
//!
//! CPU-side data model for the attractor particle demo: GPU-compatible particle
//! and attractor layouts, initial state generation, attractor orbits and the
//! host clocks that drive the simulation.

pub mod constants;
pub mod forces;
pub mod orbit;
pub mod particle;
pub mod spawn;
pub mod timing;

pub use constants::*;
pub use forces::*;
pub use orbit::*;
pub use particle::*;
pub use spawn::*;
pub use timing::*;
