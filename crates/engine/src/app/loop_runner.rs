use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use super::frame_clock::{non_zero_or, FrameClock, RenderPacer};
use super::input::InputCollector;
use super::metrics::MetricsAccumulator;
use super::{AudioSink, Canvas, InputSnapshot, RenderSettings, Renderer};

pub type GameError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Stage".to_string(),
            window_width: 640,
            window_height: 360,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
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
    #[error("game update failed: {0}")]
    Game(#[source] GameError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// What the runner should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Continue,
    Exit,
}

pub struct GameContext<'a> {
    pub input: &'a InputSnapshot,
    /// Global tick counter, incremented once per simulation tick.
    pub frame: u64,
    pub audio: &'a mut dyn AudioSink,
}

/// The game driven by the runner: a fixed-rate `update` and one `render`
/// per redraw.
pub trait Game {
    fn load(&mut self, _audio: &mut dyn AudioSink) {}
    fn update(&mut self, ctx: &mut GameContext<'_>) -> Result<LoopCommand, GameError>;
    fn render(&mut self, canvas: &mut Canvas<'_>, frame: u64);
    fn unload(&mut self, _audio: &mut dyn AudioSink) {}
}

/// Opens the window and drives `game` until it asks to exit, the window is
/// closed, or a tick fails. Ticks run at a fixed rate; rendering happens
/// once per redraw after the due ticks.
pub fn run_app(
    config: LoopConfig,
    render_settings: RenderSettings,
    images_dir: PathBuf,
    mut audio: Box<dyn AudioSink>,
    mut game: Box<dyn Game>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window), render_settings, images_dir)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let started = Instant::now();
    let mut clock = FrameClock::new(
        config.target_tps,
        config.max_frame_delta,
        config.max_ticks_per_frame,
        started,
    );
    let mut pacer = RenderPacer::new(config.max_render_fps, started);
    let mut metrics = MetricsAccumulator::new(
        non_zero_or(config.metrics_log_interval, Duration::from_secs(5)),
        started,
    );

    info!(
        target_tps = config.target_tps.max(1),
        max_frame_delta_ms = clock.max_frame_delta().as_millis() as u64,
        max_ticks_per_frame = clock.max_ticks_per_frame(),
        viewport_width = render_settings.viewport.width,
        viewport_height = render_settings.viewport.height,
        render_fps_cap = %pacer.describe(),
        "loop_config"
    );

    game.load(audio.as_mut());

    let failure: Rc<RefCell<Option<AppError>>> = Rc::new(RefCell::new(None));
    let failure_in_loop = Rc::clone(&failure);
    let mut input = InputCollector::default();
    let mut frame: u64 = 0;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.handle_key(event.physical_key, event.state);
                    if input.quit_requested() {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let advance = clock.advance(now);
                    for _ in 0..advance.ticks {
                        let snapshot = input.snapshot_for_tick();
                        let result = game.update(&mut GameContext {
                            input: &snapshot,
                            frame,
                            audio: audio.as_mut(),
                        });
                        frame = frame.saturating_add(1);
                        metrics.record_tick();
                        match result {
                            Ok(LoopCommand::Continue) => {}
                            Ok(LoopCommand::Exit) => {
                                info!(reason = "game_finished", frame, "shutdown_requested");
                                window_target.exit();
                                return;
                            }
                            Err(game_error) => {
                                error!(error = %game_error, frame, "game_update_failed");
                                *failure_in_loop.borrow_mut() = Some(AppError::Game(game_error));
                                window_target.exit();
                                return;
                            }
                        }
                    }

                    if advance.dropped_backlog > Duration::ZERO {
                        metrics.record_dropped_backlog(advance.dropped_backlog);
                        warn!(
                            dropped_backlog_ms = advance.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame = clock.max_ticks_per_frame(),
                            "sim_clamp_triggered"
                        );
                    }

                    let wait = pacer.wait_before_present(Instant::now());
                    if wait > Duration::ZERO {
                        thread::sleep(wait);
                    }
                    if let Err(error) = renderer.render_frame(|canvas| game.render(canvas, frame)) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    pacer.presented(Instant::now());
                    metrics.record_frame(advance.raw_dt);

                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            worst_frame_ms = snapshot.worst_frame_ms,
                            dropped_backlog_ms = snapshot.dropped_backlog_ms,
                            frame,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                game.unload(audio.as_mut());
                info!(frame, "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    let outcome = failure.borrow_mut().take();
    match outcome {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_runs_sixty_ticks_uncapped() {
        let config = LoopConfig::default();
        assert_eq!(config.target_tps, 60);
        assert_eq!(config.max_render_fps, None);
        assert_eq!((config.window_width, config.window_height), (640, 360));
    }
}
