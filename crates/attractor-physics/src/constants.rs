//! Simulation constants
//!
//! Everything here is fixed at compile time. `SimulationConfig` in the
//! simulation crate collects the values that size the GPU buffers.

use std::time::Duration;

/// Number of simulated particles. Must be a multiple of `WORKGROUP_SIZE`.
pub const PARTICLE_COUNT: u32 = 128 * 1024;

/// Number of point attractors
pub const ATTRACTOR_COUNT: u32 = 8;

/// Invocations per compute workgroup (matches `WORKGROUP_SIZE` in the WGSL)
pub const WORKGROUP_SIZE: u32 = 128;

/// Half-width of the cube particles spawn in
pub const SPAWN_EXTENT: f32 = 10.0;

/// Per-particle scalar carried in `position.w` (used as mass by the kernel)
pub const MASS_MIN: f32 = 0.1;
pub const MASS_MAX: f32 = 1.0;

/// Half-width of the initial velocity range, per axis
pub const VELOCITY_EXTENT: f32 = 0.5;

/// Added to every initial velocity component so nothing starts exactly at rest
pub const VELOCITY_BIAS: f32 = 0.01;

/// Half-width of the cube attractors spawn in
pub const ATTRACTOR_SPAWN_EXTENT: f32 = 20.0;

/// Upper bound for the per-tick orbit radii drawn on refresh
pub const ATTRACTOR_ORBIT_RADIUS: f32 = 5.0;

/// Orbit angle increment per refresh tick, in degrees
pub const ANGLE_STEP_DEG: f32 = 1.0;

/// How often attractors are repositioned
pub const ATTRACTOR_REFRESH_PERIOD: Duration = Duration::from_millis(100);

/// Elapsed milliseconds are divided by this to get `dt`
pub const DT_SCALE_MS: f32 = 1000.0;

/// Speed multiplier applied to `dt` at startup and after a reset
pub const DEFAULT_SPEED: f32 = 1.0;

/// Speed change per Up/Down key press
pub const SPEED_STEP: f32 = 0.1;

/// Strength of the pull each attractor exerts
pub const ATTRACTOR_STRENGTH: f32 = 50.0;

/// Softening parameter to prevent singularities at r→0
pub const SOFTENING: f32 = 0.5;

/// Velocity damping per unit of simulated time
pub const DAMPING: f32 = 0.1;

/// Radius of the sphere drawn at each attractor
pub const ATTRACTOR_MARKER_RADIUS: f32 = 0.4;
