use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, InitCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::paint::Color;
use crate::time::{FrameClock, FramePacer, FramePacing};

use super::size::drawable_size;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Color every frame is cleared to.
    pub background: Color,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "hollow".to_string(),
            width: 512,
            height: 512,
            background: Color::WHITE,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until the window closes, the app asks
    /// to exit, or the frame budget in `pacing` is spent.
    ///
    /// The window is created hidden and only shown once `App::on_init` succeeded;
    /// an init error is returned from here without the window ever appearing.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, pacing: FramePacing, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, pacing, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.fatal.take() {
            return Err(err);
        }

        if let Some(pacer) = state.pacer.as_ref() {
            log::info!("runtime finished after {} frames", pacer.frames());
        }
        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    pacing: FramePacing,
    app: A,

    entry: Option<WindowEntry>,
    pacer: Option<FramePacer>,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, pacing: FramePacing, app: A) -> Self {
        Self {
            config,
            gpu_init,
            pacing,
            app,
            entry: None,
            pacer: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Creates the hidden window and GPU, runs `on_init` + the first `on_resize`,
    /// then shows the window.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ))
            .with_visible(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry.with_mut(|fields| -> Result<()> {
            let mut ctx = InitCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
            };

            app.on_init(&mut ctx).context("application init failed")?;

            let size = fields.window.inner_size();
            if size != ctx.gpu.size() {
                ctx.gpu.resize(size);
            }
            if let Some((width, height)) = drawable_size(size) {
                app.on_resize(&mut ctx, width, height);
            }

            Ok(())
        })?;

        let now = Instant::now();
        entry.with_mut(|fields| {
            fields.clock.reset(now);
            fields.window.set_visible(true);
            fields.window.request_redraw();
        });

        log::info!(
            "window ready; pacing {:?} fps, {:?} frames",
            self.pacing.frame_rate,
            self.pacing.frame_count
        );

        self.pacer = Some(FramePacer::new(self.pacing, now));
        self.entry = Some(entry);
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let app = &mut self.app;

        entry.with_mut(|fields| {
            fields.gpu.resize(new_size);

            let Some((width, height)) = drawable_size(new_size) else {
                log::debug!("ignoring zero-area resize {new_size:?}");
                return;
            };

            let mut ctx = InitCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            app.on_resize(&mut ctx, width, height);
        });
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(pacer)) = (self.entry.as_mut(), self.pacer.as_mut()) else {
            return;
        };
        // Only paced frames draw; early OS redraws (expose, live resize) are dropped.
        if !pacer.is_due(Instant::now()) {
            log::trace!("redraw before deadline ignored");
            return;
        }

        let app = &mut self.app;
        let background = self.config.background;

        let control = entry.with_mut(|fields| {
            let time = fields.clock.tick();
            log::trace!("frame {} dt {:.4}s", time.frame_index, time.dt);

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                time,
                background,
            };
            app.on_draw(&mut ctx, time.dt)
        });

        pacer.record_frame(Instant::now());
        let frames = pacer.frames();
        let finished = pacer.finished();

        if control == AppControl::Exit {
            log::info!("application requested exit after {frames} frames");
            self.request_exit(event_loop);
        } else if finished {
            log::info!("frame budget of {frames} frames reached");
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("startup failed: {e:#}");
            self.fatal = Some(e);
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let (Some(entry), Some(pacer)) = (self.entry.as_ref(), self.pacer.as_ref()) else {
            return;
        };

        let now = Instant::now();
        match pacer.deadline() {
            Some(deadline) if !pacer.is_due(now) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Wait);
                entry.with_window(|w| w.request_redraw());
            }
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

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.entry = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
