//! Shader program registry
//!
//! Every WGSL program the demo uses is compiled once at startup and looked up
//! by `ProgramId`.

use crate::error::SimulationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramId {
    /// Particle integration kernel
    Compute,
    /// Unshaded particle points
    Points,
    /// Lit attractor spheres
    Sphere,
}

impl ProgramId {
    pub const ALL: [ProgramId; 3] = [ProgramId::Compute, ProgramId::Points, ProgramId::Sphere];

    pub fn label(self) -> &'static str {
        match self {
            ProgramId::Compute => "Particle Compute Shader",
            ProgramId::Points => "Particle Points Shader",
            ProgramId::Sphere => "Attractor Sphere Shader",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ProgramId::Compute => include_str!("shaders/particles_compute.wgsl"),
            ProgramId::Points => include_str!("shaders/points.wgsl"),
            ProgramId::Sphere => include_str!("shaders/sphere.wgsl"),
        }
    }
}

pub struct ShaderRegistry {
    compute: wgpu::ShaderModule,
    points: wgpu::ShaderModule,
    sphere: wgpu::ShaderModule,
}

impl ShaderRegistry {
    /// Compile all programs. The first one that fails validation aborts.
    pub async fn new(device: &wgpu::Device) -> Result<Self, SimulationError> {
        let compute = Self::compile(device, ProgramId::Compute).await?;
        let points = Self::compile(device, ProgramId::Points).await?;
        let sphere = Self::compile(device, ProgramId::Sphere).await?;

        log::info!("Shaders loaded");

        Ok(Self {
            compute,
            points,
            sphere,
        })
    }

    async fn compile(
        device: &wgpu::Device,
        program: ProgramId,
    ) -> Result<wgpu::ShaderModule, SimulationError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.label()),
            source: wgpu::ShaderSource::Wgsl(program.source().into()),
        });

        match device.pop_error_scope().await {
            Some(err) => Err(SimulationError::ShaderCompilation {
                program,
                message: err.to_string(),
            }),
            None => {
                log::debug!("Compiled {:?}", program);
                Ok(module)
            }
        }
    }

    pub fn get(&self, program: ProgramId) -> &wgpu::ShaderModule {
        match program {
            ProgramId::Compute => &self.compute,
            ProgramId::Points => &self.points,
            ProgramId::Sphere => &self.sphere,
        }
    }
}
