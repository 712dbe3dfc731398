//! Unit UV sphere used for the attractor markers

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct SphereMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl SphereMesh {
    /// Unit sphere with counter-clockwise, outward-facing triangles.
    pub fn uv(stacks: u16, slices: u16) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let ring = slices + 1;

        let mut vertices = Vec::with_capacity((stacks as usize + 1) * ring as usize);
        for i in 0..=stacks {
            let phi = std::f32::consts::PI * i as f32 / stacks as f32;
            for j in 0..=slices {
                let theta = std::f32::consts::TAU * j as f32 / slices as f32;
                let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                vertices.push(MeshVertex {
                    position: n.to_array(),
                    normal: n.to_array(),
                });
            }
        }

        let mut indices = Vec::with_capacity(stacks as usize * slices as usize * 6);
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * ring + j;
                let b = a + ring;
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }

        Self { vertices, indices }
    }
}
