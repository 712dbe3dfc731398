//! Startup failures. All of them are fatal.

use attractor_simulation::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported formats on this adapter")]
    NoSurfaceFormat,

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
