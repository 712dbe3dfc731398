//! Scene rendering: one pass, particles first, then attractor markers

use crate::camera::TransformState;
use crate::points::ParticleRenderer;
use crate::spheres::{AttractorRenderer, Light};
use attractor_simulation::ShaderRegistry;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Particles are additive, so they stay dim individually.
const PARTICLE_INTENSITY: f32 = 0.35;

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Catppuccin color converted to linear RGBA
pub fn palette_color(color: &catppuccin::Color, alpha: f32) -> [f32; 4] {
    [
        srgb_to_linear(color.rgb.r),
        srgb_to_linear(color.rgb.g),
        srgb_to_linear(color.rgb.b),
        alpha,
    ]
}

pub struct SceneRenderer {
    depth_texture: wgpu::TextureView,
    particles: ParticleRenderer,
    attractors: AttractorRenderer,
    light: Light,
    clear_color: wgpu::Color,
    wireframe: bool,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        shaders: &ShaderRegistry,
        surface_config: &wgpu::SurfaceConfiguration,
        attractor_buffer: &wgpu::Buffer,
        marker_radius: f32,
    ) -> Self {
        let mocha = &catppuccin::PALETTE.mocha.colors;

        let [r, g, b, a] = palette_color(&mocha.crust, 1.0);
        let clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };

        let particle_color = palette_color(&mocha.lavender, 1.0).map(|c| c * PARTICLE_INTENSITY);
        let particles =
            ParticleRenderer::new(device, shaders, surface_config.format, particle_color);
        let attractors = AttractorRenderer::new(
            device,
            shaders,
            surface_config.format,
            attractor_buffer,
            palette_color(&mocha.peach, 1.0),
            marker_radius,
        );
        log::info!("Renderer initialized");

        Self {
            depth_texture: Self::create_depth_texture(device, surface_config),
            particles,
            attractors,
            light: Light::default(),
            clear_color,
            wireframe: false,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, new_config: &wgpu::SurfaceConfiguration) {
        self.depth_texture = Self::create_depth_texture(device, new_config);
    }

    /// Switch the markers between wireframe and fill. Returns the mode actually
    /// in effect, which stays fill when the device has no line polygon mode.
    pub fn set_wireframe(&mut self, wireframe: bool) -> bool {
        if wireframe && !self.attractors.supports_wireframe() {
            log::warn!("Wireframe requested but not supported by this adapter");
        }
        self.wireframe = wireframe && self.attractors.supports_wireframe();
        self.wireframe
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Upload this frame's uniforms.
    pub fn prepare(&self, queue: &wgpu::Queue, transform: &TransformState) {
        self.particles.prepare(queue, transform.mvp());
        self.attractors.prepare(queue, transform, &self.light);
    }

    /// Record the scene pass. Must be encoded after the compute pass that
    /// wrote `positions`.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        positions: &wgpu::Buffer,
        particle_count: u32,
        attractor_count: u32,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.particles.draw(&mut render_pass, positions, particle_count);
        self.attractors
            .draw(&mut render_pass, attractor_count, self.wireframe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attractor_physics::{Attractor, ParticlePosition};
    use glam::Vec3;
    use wgpu::util::DeviceExt;

    const SIZE: u32 = 255;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("Test Device"),
                    ..Default::default()
                })
                .await
                .ok()
        })
    }

    /// Render one frame offscreen and return the RGBA8 pixel at the center.
    fn center_pixel(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        particles_at: Vec3,
        marker_at: Vec3,
    ) -> [u8; 4] {
        let shaders = pollster::block_on(ShaderRegistry::new(device)).expect("shaders compile");
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: FORMAT,
            width: SIZE,
            height: SIZE,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let positions = vec![ParticlePosition::new(particles_at, 1.0); 128];
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Test Positions"),
            contents: bytemuck::cast_slice(&positions),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::STORAGE,
        });
        let attractor_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Test Attractors"),
            contents: bytemuck::cast_slice(&[Attractor::new(marker_at)]),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let renderer = SceneRenderer::new(device, &shaders, &config, &attractor_buffer, 0.4);
        renderer.prepare(queue, &TransformState::new(SIZE, SIZE));

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Test Target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = (SIZE * 4).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Test Readback"),
            size: (bytes_per_row * SIZE) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Encoder"),
        });
        renderer.encode(&mut encoder, &view, &position_buffer, 128, 1);
        encoder.copy_texture_to_buffer(
            target.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .expect("device poll");
        rx.recv().expect("map callback").expect("map succeeds");

        let data = slice.get_mapped_range();
        let offset = ((SIZE / 2) * bytes_per_row + (SIZE / 2) * 4) as usize;
        let pixel = [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]];
        drop(data);
        readback.unmap();
        pixel
    }

    #[test]
    fn particles_in_front_of_a_marker_stay_visible() {
        let Some((device, queue)) = headless_device() else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };
        let far_away = Vec3::splat(-50.0);
        let between_eye_and_marker = Vec3::ONE;

        let marker_only = center_pixel(&device, &queue, far_away, Vec3::ZERO);
        let clear_only = center_pixel(&device, &queue, far_away, far_away);
        assert_ne!(marker_only, clear_only, "marker covers the center");

        let occluding = center_pixel(&device, &queue, between_eye_and_marker, Vec3::ZERO);
        assert_ne!(occluding, marker_only);
    }

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(128) < 128.0 / 255.0);
    }

    #[test]
    fn palette_color_keeps_alpha() {
        let color = palette_color(&catppuccin::PALETTE.mocha.colors.peach, 0.5);
        assert_eq!(color[3], 0.5);
        assert!(color[..3].iter().all(|c| (0.0..=1.0).contains(c)));
    }
}
