//! Lit sphere markers at the attractor positions
//!
//! One instanced draw; instance `i` is translated to attractor `i`, read from
//! the simulation's attractor buffer. That buffer is never reallocated, so the
//! bind group is built once.

use crate::camera::TransformState;
use crate::mesh::{MeshVertex, SphereMesh};
use crate::renderer::DEPTH_FORMAT;
use attractor_simulation::{ProgramId, ShaderRegistry};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

const SPHERE_STACKS: u16 = 12;
const SPHERE_SLICES: u16 = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: [f32; 4],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 30.0, 30.0),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Uniform block of the sphere program (matches WGSL)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    /// x: marker radius
    pub marker: [f32; 4],
}

impl SphereUniform {
    pub fn new(transform: &TransformState, light: &Light, base_color: [f32; 4], radius: f32) -> Self {
        Self {
            view_proj: transform.view_projection().to_cols_array_2d(),
            model: transform.mouse_transform().to_cols_array_2d(),
            normal_matrix: transform.normal_matrix().to_cols_array_2d(),
            base_color,
            light_position: light.position.extend(1.0).to_array(),
            light_color: light.color,
            marker: [radius, 0.0, 0.0, 0.0],
        }
    }
}

pub struct AttractorRenderer {
    fill_pipeline: wgpu::RenderPipeline,
    /// Only built when the device supports `POLYGON_MODE_LINE`
    line_pipeline: Option<wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    base_color: [f32; 4],
    radius: f32,
}

impl AttractorRenderer {
    pub fn new(
        device: &wgpu::Device,
        shaders: &ShaderRegistry,
        format: wgpu::TextureFormat,
        attractor_buffer: &wgpu::Buffer,
        base_color: [f32; 4],
        radius: f32,
    ) -> Self {
        let mesh = SphereMesh::uv(SPHERE_STACKS, SPHERE_SLICES);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sphere Uniform Buffer"),
            size: std::mem::size_of::<SphereUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sphere Bind Group Layout"),
            entries: &[
                // Uniforms - Binding 0
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Attractors (Storage) - Binding 1
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sphere Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: attractor_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = shaders.get(ProgramId::Sphere);
        let build = |label: &str, polygon_mode: wgpu::PolygonMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vertex"),
                    buffers: &[MeshVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fragment"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    unclipped_depth: false,
                    polygon_mode,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let fill_pipeline = build("Sphere Fill Pipeline", wgpu::PolygonMode::Fill);
        let line_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(build("Sphere Line Pipeline", wgpu::PolygonMode::Line))
        } else {
            log::warn!("POLYGON_MODE_LINE not supported, wireframe disabled");
            None
        };

        Self {
            fill_pipeline,
            line_pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            base_color,
            radius,
        }
    }

    pub fn supports_wireframe(&self) -> bool {
        self.line_pipeline.is_some()
    }

    pub fn prepare(&self, queue: &wgpu::Queue, transform: &TransformState, light: &Light) {
        let uniform = SphereUniform::new(transform, light, self.base_color, self.radius);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, attractor_count: u32, wireframe: bool) {
        let pipeline = match (&self.line_pipeline, wireframe) {
            (Some(line), true) => line,
            _ => &self.fill_pipeline,
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..attractor_count);
    }
}
