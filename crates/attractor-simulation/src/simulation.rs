//! GPU-based particle simulation manager
//!
//! Owns the buffer set and the integration pipeline. One `encode_step` per
//! frame records a single compute pass; the caller begins its render passes
//! after it in the same encoder, and wgpu places the storage-write to
//! vertex-read barrier at that pass boundary.

use crate::buffers::{
    GpuBufferSet, ATTRACTOR_BINDING, PARAMS_BINDING, POSITION_BINDING, VELOCITY_BINDING,
};
use crate::error::SimulationError;
use crate::params::{SimParams, SimulationConfig};
use crate::programs::{ProgramId, ShaderRegistry};
use attractor_physics::{Attractor, AttractorOrbit, InitialState, ParticlePosition, ParticleVelocity};
use bytemuck::Pod;
use rand::Rng;
use wgpu::util::DeviceExt;

pub struct ParticleSimulation {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: SimulationConfig,

    buffers: GpuBufferSet,
    params_buffer: wgpu::Buffer,

    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,

    orbit: AttractorOrbit,
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ParticleSimulation {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        shaders: &ShaderRegistry,
        config: SimulationConfig,
        initial: &InitialState,
    ) -> Result<Self, SimulationError> {
        log::info!("Initializing ParticleSimulation...");
        config.validate()?;

        if initial.particle_count() != config.particle_count {
            return Err(SimulationError::CountMismatch {
                what: "particles",
                expected: config.particle_count,
                actual: initial.particle_count(),
            });
        }
        if initial.attractor_count() != config.attractor_count {
            return Err(SimulationError::CountMismatch {
                what: "attractors",
                expected: config.attractor_count,
                actual: initial.attractor_count(),
            });
        }

        let buffers = GpuBufferSet::new(&device, initial);

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Params Buffer"),
            contents: bytemuck::cast_slice(&[config.to_params(0.0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Simulation Bind Group Layout"),
            entries: &[
                storage_entry(POSITION_BINDING, false),
                storage_entry(VELOCITY_BINDING, false),
                storage_entry(ATTRACTOR_BINDING, true),
                wgpu::BindGroupLayoutEntry {
                    binding: PARAMS_BINDING,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Simulation Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Simulation Pipeline"),
            layout: Some(&pipeline_layout),
            module: shaders.get(ProgramId::Compute),
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions {
                constants: &[("WORKGROUP_SIZE", config.workgroup_size as f64)],
                ..Default::default()
            },
            cache: None,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Simulation Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: POSITION_BINDING,
                    resource: buffers.position_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: VELOCITY_BINDING,
                    resource: buffers.velocity_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: ATTRACTOR_BINDING,
                    resource: buffers.attractor_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: PARAMS_BINDING,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        log::info!(
            "Simulation pipeline created ({} workgroups of {})",
            config.workgroup_count(),
            config.workgroup_size
        );

        Ok(Self {
            device,
            queue,
            config,
            buffers,
            params_buffer,
            pipeline,
            bind_group,
            orbit: AttractorOrbit::default(),
        })
    }

    /// Record one integration step into `encoder`. Negative `dt` is clamped to 0.
    pub fn encode_step(&self, encoder: &mut wgpu::CommandEncoder, dt: f32) {
        let params: SimParams = self.config.to_params(dt.max(0.0));
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::cast_slice(&[params]));

        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Particle Compute Pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, &self.bind_group, &[]);
        compute_pass.dispatch_workgroups(self.config.workgroup_count(), 1, 1);
    }

    /// Step the simulation forward by one timestep on its own submission
    pub fn step(&self, dt: f32) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Simulation Encoder"),
            });
        self.encode_step(&mut encoder, dt);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Advance the attractor orbit `ticks` times and upload the result into the
    /// existing attractor buffer.
    pub fn refresh_attractors<R: Rng + ?Sized>(&mut self, rng: &mut R, ticks: u32) {
        if ticks == 0 {
            return;
        }
        for _ in 0..ticks {
            self.orbit.advance(rng, self.buffers.attractors_mut());
        }
        self.buffers.write_attractors(&self.queue);
    }

    pub fn orbit(&self) -> &AttractorOrbit {
        &self.orbit
    }

    pub fn attractors(&self) -> &[Attractor] {
        self.buffers.attractors()
    }

    pub fn buffers(&self) -> &GpuBufferSet {
        &self.buffers
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn particle_count(&self) -> u32 {
        self.config.particle_count
    }

    pub fn attractor_count(&self) -> u32 {
        self.config.attractor_count
    }

    /// Workgroups per compute dispatch
    pub fn dispatch_size(&self) -> u32 {
        self.config.workgroup_count()
    }

    /// Blocking copy of the device position buffer
    pub fn read_positions(&self) -> Result<Vec<ParticlePosition>, SimulationError> {
        self.read_buffer(self.buffers.position_buffer())
    }

    /// Blocking copy of the device velocity buffer
    pub fn read_velocities(&self) -> Result<Vec<ParticleVelocity>, SimulationError> {
        self.read_buffer(self.buffers.velocity_buffer())
    }

    /// Blocking copy of the device attractor buffer
    pub fn read_attractors(&self) -> Result<Vec<Attractor>, SimulationError> {
        self.read_buffer(self.buffers.attractor_buffer())
    }

    fn read_buffer<T: Pod>(&self, buffer: &wgpu::Buffer) -> Result<Vec<T>, SimulationError> {
        let size = buffer.size();
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Staging Buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })?;
        receiver
            .recv()
            .map_err(|err| SimulationError::Readback(err.to_string()))??;

        let values = {
            let data = slice.get_mapped_range();
            bytemuck::pod_collect_to_vec(&data)
        };
        staging.unmap();
        Ok(values)
    }
}
