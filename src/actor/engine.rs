//! Engine: Main coordinator that ties actors together.
//!
//! The Engine is the entry point for interactive applications. It
//! enters a terminal [`Session`], spawns the input and render actors,
//! and hands the application a small loop-facing API: read input,
//! submit a fresh node tree, repeat.

use super::messages::{InputEvent, RenderCommand};
use super::{InputActor, RendererActor};
use crate::node::Node;
use crate::terminal::{Session, SessionOptions};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::io;
use std::time::{Duration, Instant};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target frames per second for [`Engine::end_frame`] pacing.
    pub target_fps: u32,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Render commands that may queue before `submit` blocks.
    pub frame_queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            input_poll_timeout: Duration::from_millis(10),
            enable_mouse: false,
            alternate_screen: true,
            frame_queue_depth: 4,
        }
    }
}

impl EngineConfig {
    /// Terminal modes implied by this configuration.
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            alternate_screen: self.alternate_screen,
            mouse: self.enable_mouse,
        }
    }

    /// Time budget of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

/// The interactive engine.
///
/// This coordinates between the input and render actors, providing
/// a simple interface for applications.
#[derive(Debug)]
pub struct Engine {
    /// Configuration.
    config: EngineConfig,
    /// Input event receiver.
    input_rx: Receiver<InputEvent>,
    /// Render command sender.
    render_tx: Sender<RenderCommand>,
    /// Input actor handle.
    input_actor: Option<InputActor>,
    /// Renderer actor handle.
    renderer_actor: Option<RendererActor>,
    /// Terminal mode guard; restored after both actors stop.
    session: Option<Session>,
    /// Terminal width.
    width: u16,
    /// Terminal height.
    height: u16,
    /// Frame timing.
    frame_start: Instant,
    frame_count: u64,
    /// Whether the engine is running.
    running: bool,
}

impl Engine {
    /// Create a new engine with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate screen, etc.).
    pub fn new() -> io::Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create a new engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails or an actor thread
    /// cannot be spawned. The terminal is restored in either case.
    pub fn with_config(config: EngineConfig) -> io::Result<Self> {
        let (width, height) = Session::size()?;
        let session = Session::enter(config.session_options())?;

        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let (render_tx, render_rx) = bounded::<RenderCommand>(config.frame_queue_depth.max(1));

        let input_actor = InputActor::spawn(input_tx, config.input_poll_timeout)?;
        let renderer_actor = RendererActor::spawn(render_rx, io::stdout())?;

        tracing::info!(width, height, ?config, "engine started");

        Ok(Self {
            config,
            input_rx,
            render_tx,
            input_actor: Some(input_actor),
            renderer_actor: Some(renderer_actor),
            session: Some(session),
            width,
            height,
            frame_start: Instant::now(),
            frame_count: 0,
            running: true,
        })
    }

    /// Get the terminal width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the terminal height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The configuration the engine was started with.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the input receiver for event-driven loops.
    pub const fn input_receiver(&self) -> &Receiver<InputEvent> {
        &self.input_rx
    }

    /// Check if the engine is still running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the engine.
    pub fn stop(&mut self) {
        tracing::debug!("engine stop requested");
        self.running = false;
    }

    /// Poll for the next input event (non-blocking).
    ///
    /// Returns `None` if no event is available.
    pub fn poll_input(&self) -> Option<InputEvent> {
        match self.input_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(InputEvent::Error("Input channel disconnected".to_string()))
            }
        }
    }

    /// Wait for the next input event (blocking with timeout).
    pub fn wait_input(&self, timeout: Duration) -> Option<InputEvent> {
        self.input_rx.recv_timeout(timeout).ok()
    }

    /// Drain all pending input events.
    pub fn drain_input(&self) -> Vec<InputEvent> {
        self.input_rx.try_iter().collect()
    }

    /// Queue `root` for display at the current terminal size.
    ///
    /// Blocks only while the render queue is full. Returns `false` if the
    /// render thread has stopped.
    pub fn submit(&self, root: Node) -> bool {
        let command = RenderCommand::Frame {
            root,
            width: self.width,
            height: self.height,
        };
        self.render_tx.send(command).is_ok()
    }

    /// Redraw every row on the next frame.
    pub fn invalidate(&self) {
        let _ = self.render_tx.send(RenderCommand::Invalidate);
    }

    /// Handle a resize event.
    ///
    /// The terminal may have reflowed what was on screen, so the next
    /// frame redraws everything.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "terminal resized");
        self.width = width;
        self.height = height;
        self.invalidate();
    }

    /// Begin a new frame.
    ///
    /// Call this at the start of your render loop.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Submit `root` and sleep out the rest of the frame budget.
    pub fn end_frame(&mut self, root: Node) -> bool {
        self.frame_count += 1;
        let accepted = self.submit(root);

        // Frame rate limiting
        let elapsed = self.frame_start.elapsed();
        let budget = self.config.frame_duration();
        if elapsed < budget {
            std::thread::sleep(budget - elapsed);
        }
        accepted
    }

    /// Get the current frame count.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }

        // Let the renderer finish the frame it is on before the screen mode changes.
        let _ = self.render_tx.send(RenderCommand::Shutdown);
        if let Some(stats) = self.renderer_actor.take().and_then(RendererActor::join) {
            tracing::info!(
                frames = stats.frames,
                superseded = stats.superseded,
                bytes = stats.bytes_written,
                avg_render_us = stats.avg_render_us,
                "engine stopped"
            );
        }

        drop(self.session.take());
    }
}
