//! Device-resident particle and attractor buffers
//!
//! Three storage buffers are allocated once and live as long as the set:
//! positions (binding 0), velocities (binding 1), attractors (binding 2).
//! The host keeps the attractor array as the source of truth and re-uploads
//! it whole into the same buffer on every refresh.

use attractor_physics::{Attractor, InitialState};
use wgpu::util::DeviceExt;

pub const POSITION_BINDING: u32 = 0;
pub const VELOCITY_BINDING: u32 = 1;
pub const ATTRACTOR_BINDING: u32 = 2;
pub const PARAMS_BINDING: u32 = 3;

pub struct GpuBufferSet {
    position_buffer: wgpu::Buffer,
    velocity_buffer: wgpu::Buffer,
    attractor_buffer: wgpu::Buffer,

    attractors: Vec<Attractor>,
    particle_count: u32,
}

impl GpuBufferSet {
    pub fn new(device: &wgpu::Device, initial: &InitialState) -> Self {
        // The point renderer draws straight from the position buffer.
        let position_buffer = Self::allocate(
            device,
            "Particle Position Buffer",
            bytemuck::cast_slice(&initial.positions),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX,
        );

        let velocity_buffer = Self::allocate(
            device,
            "Particle Velocity Buffer",
            bytemuck::cast_slice(&initial.velocities),
            wgpu::BufferUsages::STORAGE,
        );

        let attractor_buffer = Self::allocate(
            device,
            "Attractor Buffer",
            bytemuck::cast_slice(&initial.attractors),
            wgpu::BufferUsages::STORAGE,
        );

        log::info!(
            "Buffers created: {} particles, {} attractors",
            initial.particle_count(),
            initial.attractor_count()
        );

        Self {
            position_buffer,
            velocity_buffer,
            attractor_buffer,
            attractors: initial.attractors.clone(),
            particle_count: initial.particle_count(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: usage | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        })
    }

    /// Replace the attractor buffer contents with the host array, in place.
    pub fn write_attractors(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.attractor_buffer,
            0,
            bytemuck::cast_slice(&self.attractors),
        );
    }

    /// Host copy of the attractors. Call `write_attractors` after mutating.
    pub fn attractors_mut(&mut self) -> &mut [Attractor] {
        &mut self.attractors
    }

    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    pub fn position_buffer(&self) -> &wgpu::Buffer {
        &self.position_buffer
    }

    pub fn velocity_buffer(&self) -> &wgpu::Buffer {
        &self.velocity_buffer
    }

    pub fn attractor_buffer(&self) -> &wgpu::Buffer {
        &self.attractor_buffer
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    pub fn attractor_count(&self) -> u32 {
        self.attractors.len() as u32
    }
}
