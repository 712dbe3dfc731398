//! # Attractor Renderer
//!
//! Draws the simulated particles as additive points and the attractors as
//! small lit spheres.

pub mod camera;
pub mod mesh;
pub mod points;
pub mod renderer;
pub mod spheres;

pub use camera::*;
pub use mesh::*;
pub use points::*;
pub use renderer::*;
pub use spheres::*;
