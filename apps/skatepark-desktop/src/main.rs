use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use skatepark_common::{MoveDir, Trick};
use skatepark_input::{Binding, InputQueue, KeyBindings, KeyEvent as SkateKey};
use skatepark_kernel::{MonotonicClock, Scheduler, Session, ShutdownSignal};
use skatepark_render::{RenderView, SceneStyle};
use skatepark_render_wgpu::{ChaseCamera, SkateRenderer};
use skatepark_tools::{SessionInspector, SkateConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "skatepark-desktop", about = "Skateboard trick demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config with `tuning` and `bindings` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use WASD instead of ZQSD for movement
    #[arg(long)]
    qwerty: bool,
}

/// Simulation, input and view state. Everything the frame loop touches
/// apart from GPU resources.
struct AppState {
    session: Session,
    input: InputQueue,
    scheduler: Scheduler<MonotonicClock>,
    shutdown: ShutdownSignal,
    camera: ChaseCamera,
    show_hud: bool,
    landed: [usize; 4],
}

impl AppState {
    fn new(config: SkateConfig) -> Self {
        let scheduler = Scheduler::new(MonotonicClock::new());
        let shutdown = scheduler.shutdown_signal();
        Self {
            session: Session::new(config.tuning),
            input: InputQueue::new(config.bindings),
            scheduler,
            shutdown,
            camera: ChaseCamera::default(),
            show_hud: true,
            landed: [0; 4],
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        match key {
            KeyCode::Escape if pressed => {
                tracing::info!("escape pressed, shutting down");
                self.shutdown.request();
                return;
            }
            KeyCode::F1 if pressed && !repeat => {
                self.show_hud = !self.show_hud;
                return;
            }
            _ => {}
        }

        let code = format!("{key:?}");
        let event = if pressed {
            SkateKey::Down { code, repeat }
        } else {
            SkateKey::Up { code }
        };
        self.input.push_key(&event);
    }

    /// One scheduler tick plus camera sync.
    fn update(&mut self) {
        let report = self.scheduler.tick(&mut self.session, &mut self.input);
        if let Some(landing) = report.landed {
            tracing::info!(
                trick = %landing.trick,
                airtime = landing.airtime,
                turns = landing.rotation_turns,
                "landed"
            );
        }
        let events = self.session.drain_events();
        for (slot, (_, n)) in self
            .landed
            .iter_mut()
            .zip(SessionInspector::landed_counts(&events))
        {
            *slot += n;
        }
        self.camera.sync(&RenderView::from_rig(self.session.camera()));
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = SessionInspector::summary(&self.session);
        let bindings = self.input.bindings();

        egui::Window::new("Skatepark")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("State: {}", summary.state));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    summary.position[0], summary.position[1], summary.position[2]
                ));
                ui.label(format!(
                    "Height: {:.2}  Vy: {:.2}  Turns: {:.2}",
                    summary.height, summary.velocity_y, summary.flip_turns
                ));
                match summary.last_landing {
                    Some(l) => ui.label(format!(
                        "Last: {} ({:.2}s, {:.2} turns)",
                        l.trick, l.airtime, l.rotation_turns
                    )),
                    None => ui.label("Last: -"),
                };
                let intent = self.session.intent();
                let held: Vec<&str> = MoveDir::ALL
                    .into_iter()
                    .filter(|dir| intent.is_held(*dir))
                    .map(MoveDir::name)
                    .collect();
                ui.label(format!(
                    "Holding: {}",
                    if held.is_empty() { "-".to_string() } else { held.join(" + ") }
                ));
                ui.separator();

                ui.heading("Landed");
                for (trick, n) in Trick::ALL.iter().zip(self.landed) {
                    ui.label(format!("{trick}: {n}"));
                }
                if self.input.dropped() > 0 {
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("Dropped inputs: {}", self.input.dropped()),
                    );
                }
                ui.separator();

                ui.heading("Keys");
                for trick in Trick::ALL {
                    ui.label(format!(
                        "{trick}: {}",
                        key_list(bindings, Binding::Trick(trick))
                    ));
                }
                for dir in MoveDir::ALL {
                    ui.label(format!(
                        "{}: {}",
                        dir.name(),
                        key_list(bindings, Binding::Move(dir))
                    ));
                }
                ui.small("F1: Toggle HUD | Esc: Quit");
            });
    }
}

fn key_list(bindings: &KeyBindings, binding: Binding) -> String {
    let codes: Vec<&str> = bindings.codes_for(binding).collect();
    if codes.is_empty() {
        "unbound".to_string()
    } else {
        codes.join(", ")
    }
}

/// Window and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SkateRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Skatepark")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skatepark_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = SkateRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            SceneStyle::default(),
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Draw the scene and the HUD, then present.
    fn frame(&mut self, egui_ctx: &EguiContext, state: &mut AppState) {
        state
            .camera
            .set_viewport(self.config.width, self.config.height);

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            &state.session,
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_hud(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct SkateApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl SkateApp {
    fn new(config: SkateConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for SkateApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.state.shutdown.request();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed, repeat);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                if let Some(gpu) = &mut self.gpu {
                    gpu.frame(&self.egui_ctx, &mut self.state);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.shutdown.is_requested() {
            event_loop.exit();
            return;
        }
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = SkateConfig::load(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;
    if cli.qwerty {
        config.bindings = KeyBindings::qwerty();
    }

    tracing::info!("skatepark-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SkateApp::new(config);
    event_loop.run_app(&mut app)?;

    tracing::info!(frames = app.state.session.frame(), "skatepark-desktop exiting");
    Ok(())
}
