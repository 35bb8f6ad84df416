mod panel;

use anyhow::{Context as _, Result};
use bubbletext_assets::{AssetEvent, AssetLoader};
use bubbletext_render_wgpu::WgpuRenderer;
use bubbletext_runtime::{AppContext, FrameScheduler, MonotonicClock, SceneConfig, TickOutcome};
use clap::Parser;
use egui::Context as EguiContext;
use panel::PanelState;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "bubbletext-desktop", about = "Floating 3D text among iridescent bubbles")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset directory (overrides the config file). Expected layout:
    /// `fonts/gentilis_bold.ttf` (any TTF/OTF; set `font: null` in the
    /// config for placeholder glyphs), `textures/matcaps/1.png` to `8.png`,
    /// and `textures/environmentMap/skies.hdr`. Missing files are logged
    /// and leave that feature inactive.
    #[arg(long, verbatim_doc_comment)]
    assets: Option<PathBuf>,

    /// Initial text (overrides the config file)
    #[arg(long)]
    text: Option<String>,

    /// Write the effective configuration to this YAML file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Debug)]
enum UserEvent {
    Asset(AssetEvent),
}

/// Live GPU state, created on `resumed` and dropped on close.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    ctx: AppContext,
    scheduler: FrameScheduler<MonotonicClock>,
    loader: AssetLoader,
    panel: PanelState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(ctx: AppContext, loader: AssetLoader) -> Self {
        let panel = PanelState::new(&ctx);
        Self {
            ctx,
            scheduler: FrameScheduler::new(MonotonicClock::new()),
            loader,
            panel,
            gpu: None,
            egui_ctx: EguiContext::default(),
            dragging: false,
            last_cursor: None,
            init_error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window_config = &self.ctx.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

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
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("bubbletext_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

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

        let scale = window.scale_factor();
        let logical: LogicalSize<f32> = window.inner_size().to_logical(scale);
        let change = self.ctx.resize(logical.width, logical.height, scale as f32);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: change.physical_width,
            height: change.physical_height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            width = config.width,
            height = config.height,
            "GPU initialized"
        );

        Ok(Gpu {
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

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let scale = gpu.window.scale_factor();
        let logical: LogicalSize<f32> = size.to_logical(scale);
        let change = self.ctx.resize(logical.width, logical.height, scale as f32);
        gpu.config.width = change.physical_width;
        gpu.config.height = change.physical_height;
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer
            .resize(&gpu.device, gpu.config.width, gpu.config.height);
    }

    fn redraw(&mut self) {
        if self.ctx.is_cancelled() {
            return;
        }
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
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

        let mut frame = gpu.renderer.frame(&gpu.device, &gpu.queue, &view);
        if let TickOutcome::Rendered(stats) = self.scheduler.tick(&mut self.ctx, &mut frame) {
            tracing::trace!(?stats, "scene drawn");
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ectx| {
            panel::draw(ectx, &mut self.ctx, &mut self.panel, &self.loader);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }

    /// Single shutdown path: stop the loop, drop the text mesh, then the surface.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.ctx.teardown();
        self.gpu = None;
        event_loop.exit();
    }
}

impl ApplicationHandler<UserEvent> for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Asset(asset) => self.ctx.on_asset(asset),
        }
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
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
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last), Some(gpu)) = (self.dragging, self.last_cursor, &self.gpu) {
                    let scale = gpu.window.scale_factor();
                    let dx = ((position.x - last.x) / scale) as f32;
                    let dy = ((position.y - last.y) / scale) as f32;
                    self.ctx.pointer_drag(dx, dy);
                }
                self.last_cursor = Some(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 50.0) as f32,
                };
                self.ctx.scroll(amount);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn load_config(cli: &Cli) -> Result<SceneConfig> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(assets) = &cli.assets {
        config.assets_dir = assets.clone();
    }
    if let Some(text) = &cli.text {
        config.text = text.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("bubbletext-desktop starting");
    let config = load_config(&cli)?;
    if let Some(path) = &cli.save_config {
        config
            .save(path)
            .with_context(|| format!("save config {}", path.display()))?;
        tracing::info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let proxy: Mutex<EventLoopProxy<UserEvent>> = Mutex::new(event_loop.create_proxy());
    let loader = AssetLoader::new(move |event| {
        let Ok(proxy) = proxy.lock() else {
            return;
        };
        if proxy.send_event(UserEvent::Asset(event)).is_err() {
            tracing::debug!("event loop closed, asset dropped");
        }
    });

    let mut ctx = AppContext::new(config);
    loader.request_all(ctx.initial_requests());

    let mut app = GpuApp::new(ctx, loader);
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
