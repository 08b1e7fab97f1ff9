use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::args::CmdLine;
use crate::coords::Resolution;
use crate::core::{App, AppControl, Engine, EngineConfig, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::translate::translate_window_event;
use crate::input::InputState;
use crate::render::{FrameOutcome, WgpuPresenter};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// `engine.window` is replaced by the real drawable size at startup.
    pub engine: EngineConfig,
    /// `gpu.present_mode` follows `engine.vsync`.
    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            engine: EngineConfig::default(),
            gpu: GpuInit::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: InputState,

    window: Window,

    // Invariant in 'this through the backend's texture type.
    #[borrows(window)]
    #[not_covariant]
    engine: Engine<WgpuPresenter<'this>>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            entry: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let mut engine_config = self.config.engine.clone();
        engine_config.window = Resolution::from(window.inner_size());
        let gpu_init = self.config.gpu.clone().with_vsync(engine_config.vsync);

        WindowEntryTryBuilder {
            input: InputState::default(),
            window,
            engine_builder: |w| build_engine(w, gpu_init, engine_config),
        }
        .try_build()
    }

    fn resize(entry: &mut WindowEntry, size: PhysicalSize<u32>) {
        entry.with_engine_mut(|engine| {
            engine
                .pipeline_mut()
                .backend_mut()
                .resize_surface(Resolution::from(size));
            engine.on_window_resize(size.width, size.height);
        });
        entry.with_window(|w| w.request_redraw());
    }

    /// Runs one app frame and presents it. Returns `false` to stop.
    fn frame(&mut self) -> bool {
        let Some(entry) = self.entry.as_mut() else {
            return true;
        };
        let app = &mut self.app;

        entry.with_mut(|fields| {
            if !fields.engine.window_size().is_valid() {
                // Minimized: nothing to present.
                return true;
            }

            let time = fields.engine.tick();
            let control = {
                let mut ctx = FrameCtx {
                    engine: &mut *fields.engine,
                    input: &*fields.input,
                    time,
                };
                app.on_frame(&mut ctx)
            };
            fields.input.end_frame();

            if control == AppControl::Exit {
                return false;
            }

            match fields.engine.draw_2d() {
                FrameOutcome::Fatal => {
                    log::error!("surface lost beyond recovery; exiting");
                    false
                }
                FrameOutcome::Presented | FrameOutcome::Skipped => true,
            }
        })
    }
}

fn build_engine(
    window: &Window,
    gpu_init: GpuInit,
    config: EngineConfig,
) -> Result<Engine<WgpuPresenter<'_>>> {
    let gpu = pollster::block_on(Gpu::new(window, gpu_init)).context("GPU initialization failed")?;
    let mut engine =
        Engine::new(WgpuPresenter::new(gpu), config).context("engine initialization failed")?;
    engine.set_cmd_line(CmdLine::from_env());
    Ok(engine)
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let mut entry = match self.create_entry(event_loop) {
            Ok(e) => e,
            Err(e) => {
                self.fail(event_loop, e.context("failed to create the window"));
                return;
            }
        };

        let app = &mut self.app;
        entry.with_mut(|fields| {
            let time = fields.engine.tick();
            let mut ctx = FrameCtx {
                engine: &mut *fields.engine,
                input: &*fields.input,
                time,
            };
            app.on_init(&mut ctx);
        });

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; vsync paces the loop.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            let size = fields.window.inner_size();
            if let Some(ev) = translate_window_event(size, &event) {
                fields.input.apply_event(&ev);
            }
        });

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    Self::resize(entry, *new_size);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    Self::resize(entry, new_size);
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.frame() {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
