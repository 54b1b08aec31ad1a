use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::projection::Palette;
use crate::session::Session;

use super::clock::{non_zero_or, FramePacer, TickClock};
use super::input::InputCollector;
use super::metrics::MetricsAccumulator;
use super::Renderer;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Urban Game".to_string(),
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Opens a window sized to the session's viewport and drives the session at
/// a fixed tick rate until the window closes or Escape is pressed.
pub fn run_app(config: LoopConfig, session: Session, palette: Palette) -> Result<(), AppError> {
    let viewport = session.camera().viewport();
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                viewport.width() as f64,
                viewport.height() as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer =
        Renderer::new(Arc::clone(&window), viewport).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = LoopState::new(&config, session, palette, Arc::clone(&window), renderer);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                if state.on_window_event(event) == Flow::Exit {
                    window_target.exit();
                }
            }
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                info!(ticks = state.session.tick_count(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Everything the event loop closure owns between callbacks.
struct LoopState {
    session: Session,
    palette: Palette,
    window: Arc<Window>,
    renderer: Renderer,
    input: InputCollector,
    clock: TickClock,
    pacer: FramePacer,
    metrics: MetricsAccumulator,
}

impl LoopState {
    fn new(
        config: &LoopConfig,
        session: Session,
        palette: Palette,
        window: Arc<Window>,
        renderer: Renderer,
    ) -> Self {
        let now = Instant::now();
        let clock = TickClock::new(
            config.target_tps,
            config.max_frame_delta,
            config.max_ticks_per_frame,
            now,
        );
        let pacer = FramePacer::new(config.max_render_fps, now);
        let metrics_interval = non_zero_or(config.metrics_log_interval, Duration::from_secs(1));

        info!(
            target_tps = config.target_tps.max(1),
            max_frame_delta_ms = config.max_frame_delta.as_millis() as u64,
            max_ticks_per_frame = config.max_ticks_per_frame.max(1),
            metrics_log_interval_ms = metrics_interval.as_millis() as u64,
            render_fps_cap = %pacer.cap_label(),
            "loop_config"
        );

        Self {
            session,
            palette,
            window,
            renderer,
            input: InputCollector::default(),
            clock,
            pacer,
            metrics: MetricsAccumulator::new(metrics_interval),
        }
    }

    fn on_window_event(&mut self, event: WindowEvent) -> Flow {
        match event {
            WindowEvent::CloseRequested => {
                self.input.request_quit();
                info!(reason = "window_close", "shutdown_requested");
                Flow::Exit
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.window.inner_size();
                self.resize(size.width, size.height)
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.handle_key(event.physical_key, event.state);
                if self.input.quit_requested() {
                    info!(reason = "escape_key", "shutdown_requested");
                    Flow::Exit
                } else {
                    Flow::Continue
                }
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => Flow::Continue,
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Flow {
        match self.renderer.resize(width, height) {
            Ok(()) => Flow::Continue,
            Err(error) => {
                warn!(error = %error, "renderer_resize_failed");
                Flow::Exit
            }
        }
    }

    fn frame(&mut self) -> Flow {
        let now = Instant::now();
        let (frame_dt, plan) = self.clock.advance(now);

        for _ in 0..plan.ticks {
            let snapshot = self.input.take_snapshot();
            let report = self.session.tick(&snapshot);
            self.metrics.record_tick(&report);
        }
        if plan.dropped > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped.as_millis() as u64,
                ticks = plan.ticks,
                "sim_clamp_triggered"
            );
        }

        let wait = self.pacer.wait_before_present(Instant::now());
        if wait > Duration::ZERO {
            thread::sleep(wait);
        }

        let commands = self.session.draw_list(&self.palette);
        if let Err(error) = self.renderer.render(&commands, self.palette.background) {
            warn!(error = %error, "renderer_draw_failed");
            return Flow::Exit;
        }
        self.pacer.presented(Instant::now());
        self.metrics.record_frame(frame_dt);

        if let Some(snapshot) = self.metrics.maybe_snapshot(now) {
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                detected_ratio = snapshot.detected_ratio,
                toggles = snapshot.toggles,
                tick = self.session.tick_count(),
                "loop_metrics"
            );
        }
        Flow::Continue
    }
}
