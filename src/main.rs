use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use grid_raycaster::{
    Action, Camera, Cli, GridMap, Motion, RenderParams, ScaleLut, Settings, blit_nearest_stretch,
    build_scale_lut, render,
};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    grid: GridMap,
    camera: Camera,
    params: RenderParams,
    motion: Motion,

    scale_lut: ScaleLut,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // First fatal error raised inside the event loop
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            window: None,
            surface: None,
            grid: settings.grid,
            camera: settings.camera,
            params: settings.params,
            motion: Motion::default(),
            scale_lut: ScaleLut::empty(),
            frame_counter: 0,
            last_fps_print: Instant::now(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Raycaster")
            .with_inner_size(LogicalSize::new(
                self.params.width as f64,
                self.params.height as f64,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );

        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        self.rebuild_scale_lut(size.width as usize, size.height as usize);
        tracing::info!(width = size.width, height = size.height, "window created");

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, id: WindowId) -> anyhow::Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface
            .resize(dw, dh)
            .map_err(|e| anyhow!("resize surface: {e}"))?;

        let frame = render(&self.camera, &self.grid, &self.params);

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("surface buffer: {e}"))?;
        blit_nearest_stretch(&mut buf, dw.get() as usize, &frame, &self.scale_lut);
        buf.present().map_err(|e| anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            tracing::debug!("FPS: {:.1}", fps);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        if code == KeyCode::Escape {
            tracing::info!("escape pressed; stopping");
            event_loop.exit();
            return;
        }
        let Some(action) = Action::from_key(code) else {
            return;
        };
        action.apply(&mut self.camera, &self.motion);
        tracing::trace!(
            ?action,
            x = self.camera.pos[0],
            y = self.camera.pos[1],
            dir = self.camera.dir,
            "camera moved"
        );
    }

    fn rebuild_scale_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.params.width, self.params.height);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_scale_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let settings = cli.into_settings().context("invalid configuration")?;

    if settings.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build_global()
            .context("configure render thread pool")?;
    }

    if !settings.grid.is_enclosed() {
        tracing::warn!("grid border is not fully walled; rays may escape and leave black columns");
    }
    let [x, y] = settings.camera.pos;
    if !settings.grid.is_open_at(x, y) {
        tracing::warn!(x, y, "camera starts outside an open cell");
    }
    tracing::info!(
        width = settings.params.width,
        height = settings.params.height,
        fov = settings.camera.fov,
        color = %settings.params.base_color,
        "starting renderer"
    );

    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(settings);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
