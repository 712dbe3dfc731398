//! Attractor Particles
//!
//! A compute shader pulls particles towards a handful of moving attractors;
//! the particles are drawn as additive points and the attractors as lit
//! spheres.

mod error;
mod input;

use attractor_physics::{
    dt_from_elapsed, FrameClock, InitialState, RefreshTicker, ATTRACTOR_MARKER_RADIUS,
    ATTRACTOR_REFRESH_PERIOD,
};
use attractor_renderer::SceneRenderer;
use attractor_simulation::{ParticleSimulation, ShaderRegistry, SimulationConfig};
use error::AppError;
use input::{Action, Controls, MouseDrag};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

/// Frames averaged for the FPS shown in the title
const FRAME_WINDOW: usize = 60;

/// Fixed RNG seed, read from `ATTRACTORS_SEED` when set
fn seeded_rng() -> StdRng {
    match std::env::var("ATTRACTORS_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    simulation: ParticleSimulation,
    renderer: SceneRenderer,
    controls: Controls,
    rng: StdRng,

    frame_clock: FrameClock,
    refresh: RefreshTicker,
    frame_times: VecDeque<f32>,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        // Line polygon mode backs the wireframe toggle; optional.
        let required_features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(AppError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sim_config = SimulationConfig::default();
        sim_config.validate()?;

        let mut rng = seeded_rng();
        let initial =
            InitialState::generate(sim_config.particle_count, sim_config.attractor_count, &mut rng);
        log::info!(
            "✓ Initialized {} particles, {} attractors",
            initial.particle_count(),
            initial.attractor_count()
        );

        let shaders = ShaderRegistry::new(&device).await?;

        let simulation =
            ParticleSimulation::new(device.clone(), queue.clone(), &shaders, sim_config, &initial)?;
        log::info!("✓ Simulation initialized");

        let renderer = SceneRenderer::new(
            &device,
            &shaders,
            &config,
            simulation.buffers().attractor_buffer(),
            ATTRACTOR_MARKER_RADIUS,
        );
        log::info!("✓ Renderer initialized");

        let now = Instant::now();

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            simulation,
            renderer,
            controls: Controls::new(size.width, size.height),
            rng,
            frame_clock: FrameClock::new(now),
            refresh: RefreshTicker::new(ATTRACTOR_REFRESH_PERIOD, now),
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, &self.config);
            self.controls
                .transform
                .resize(new_size.width, new_size.height);
        }
    }

    /// Reposition attractors for every refresh period that has passed.
    fn refresh_attractors(&mut self) {
        let ticks = self.refresh.poll(Instant::now());
        if ticks == 0 {
            return;
        }
        self.simulation.refresh_attractors(&mut self.rng, ticks);

        if log::log_enabled!(log::Level::Debug) {
            for (i, a) in self.simulation.attractors().iter().enumerate() {
                log::debug!("attractor[{}] = {:?}", i, a.position);
            }
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Step 1: dt from the interval since the last frame
        let elapsed = self.frame_clock.tick(Instant::now());
        let dt = dt_from_elapsed(elapsed, self.controls.speed());
        log::debug!("dt = {:.5}", dt);

        self.frame_times.push_back(elapsed.as_secs_f32() * 1000.0);
        if self.frame_times.len() > FRAME_WINDOW {
            self.frame_times.pop_front();
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.prepare(&self.queue, &self.controls.transform);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Step 2: compute dispatch over positions/velocities/attractors
        self.simulation.encode_step(&mut encoder, dt);

        // Step 3: the compute pass has ended. Everything recorded below reads
        // the position buffer after wgpu's pass-boundary barrier.

        // Steps 4 and 5: particles, then attractor spheres
        self.renderer.encode(
            &mut encoder,
            &view,
            self.simulation.buffers().position_buffer(),
            self.simulation.particle_count(),
            self.simulation.attractor_count(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    fn handle_action(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        if self.controls.apply(action) {
            log::debug!("{:?} -> speed {:.2}", action, self.controls.speed());
            return;
        }

        match action {
            Action::Quit => event_loop.exit(),
            Action::Wireframe(on) => {
                self.renderer.set_wireframe(on);
            }
            Action::Fullscreen => self
                .window
                .set_fullscreen(Some(Fullscreen::Borderless(None))),
            Action::Windowed => self.window.set_fullscreen(None),
            Action::Reset | Action::SpeedUp | Action::SpeedDown => {}
        }
    }
}

#[derive(Default)]
struct App {
    gpu_state: Option<GpuState>,
    mouse: MouseDrag,
    error: Option<AppError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("Fatal: {}", err);
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu_state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Attractor Particles")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        match pollster::block_on(GpuState::new(window)) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(action) = Action::from_key(key_code) {
                    gpu_state.handle_action(action, event_loop);
                }
            }

            WindowEvent::Resized(physical_size) => gpu_state.resize(physical_size),

            WindowEvent::MouseInput { state, button, .. } => self.mouse.button(button, state),

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse
                    .moved(position.x, position.y, &mut gpu_state.controls.transform);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                gpu_state.controls.transform.zoom(lines);
            }

            WindowEvent::RedrawRequested => match gpu_state.render() {
                Ok(()) => {
                    let frame_time = gpu_state.average_frame_time();
                    let fps = if frame_time > 0.0 { 1000.0 / frame_time } else { 0.0 };
                    gpu_state.window.set_title(&format!(
                        "Attractor Particles - {:.0} FPS ({:.2}ms) - {} particles",
                        fps,
                        frame_time,
                        gpu_state.simulation.particle_count()
                    ));
                }
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = gpu_state.window.inner_size();
                    gpu_state.resize(size);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory, exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.refresh_attractors();
            gpu_state.window.request_redraw();
        }
    }
}

fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for per-frame dt and attractor positions)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting attractor particle simulation...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
