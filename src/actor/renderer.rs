//! Renderer Actor: Dedicated thread for rendering to the terminal.
//!
//! This actor owns the [`Compositor`] and the output sink. Each time it
//! wakes up it drains the whole command queue and keeps only the newest
//! frame, so a slow terminal never makes it render stale trees. One frame
//! is always written completely before the next one is looked at.

use super::messages::RenderCommand;
use crate::compositor::{Compositor, FrameStats};
use crate::node::Node;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the thread sleeps on an empty queue before rechecking shutdown.
const IDLE_WAIT: Duration = Duration::from_millis(16);

/// Renderer actor that handles terminal output.
#[derive(Debug)]
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<RenderStats>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames rendered.
    pub frames: u64,
    /// Frames dropped because a newer one was already queued.
    pub superseded: u64,
    /// Total cells changed across all frames.
    pub cells_changed: u64,
    /// Total bytes written to the sink.
    pub bytes_written: u64,
    /// Average render time in microseconds.
    pub avg_render_us: u64,
    /// Last render time in microseconds.
    pub last_render_us: u64,
}

impl RenderStats {
    fn record(&mut self, frame: &FrameStats, elapsed: Duration) {
        self.frames += 1;
        self.cells_changed += frame.cells as u64;
        self.bytes_written += frame.bytes as u64;
        self.last_render_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        // Smoothed average
        if self.avg_render_us == 0 {
            self.avg_render_us = self.last_render_us;
        } else {
            self.avg_render_us = (self.avg_render_us * 15 + self.last_render_us) / 16;
        }
    }
}

/// What one drain of the queue asked for.
#[derive(Default)]
struct Batch {
    frame: Option<(Node, u16, u16)>,
    superseded: u64,
    invalidate: bool,
    shutdown: bool,
}

impl Batch {
    fn collect(first: RenderCommand, rest: impl Iterator<Item = RenderCommand>) -> Self {
        let mut batch = Self::default();
        for command in std::iter::once(first).chain(rest) {
            match command {
                RenderCommand::Frame {
                    root,
                    width,
                    height,
                } => {
                    if batch.frame.replace((root, width, height)).is_some() {
                        batch.superseded += 1;
                    }
                }
                RenderCommand::Invalidate => batch.invalidate = true,
                RenderCommand::Shutdown => {
                    batch.shutdown = true;
                    break;
                }
            }
        }
        batch
    }
}

impl RendererActor {
    /// Spawn the renderer actor thread writing to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn<W>(receiver: Receiver<RenderCommand>, sink: W) -> io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("tessel-render".to_string())
            .spawn(move || {
                tracing::debug!("render thread started");
                let mut sink = sink;
                let mut stats = RenderStats::default();
                if let Err(err) =
                    Self::run_loop(&receiver, &shutdown_clone, &mut sink, &mut stats)
                {
                    tracing::error!(%err, "render thread stopped on write failure");
                }
                tracing::debug!(
                    frames = stats.frames,
                    superseded = stats.superseded,
                    "render thread stopped"
                );
                stats
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the render thread to shutdown.
    ///
    /// Frames still queued are not rendered.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the render thread to finish and collect its statistics.
    ///
    /// Returns `None` if the thread panicked.
    pub fn join(mut self) -> Option<RenderStats> {
        self.handle.take().and_then(|handle| handle.join().ok())
    }

    /// Main render loop.
    fn run_loop<W: Write>(
        receiver: &Receiver<RenderCommand>,
        shutdown: &AtomicBool,
        sink: &mut W,
        stats: &mut RenderStats,
    ) -> io::Result<()> {
        let mut compositor = Compositor::new();

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let first = match receiver.recv_timeout(IDLE_WAIT) {
                Ok(command) => command,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let batch = Batch::collect(first, receiver.try_iter());
            if batch.superseded > 0 {
                tracing::debug!(count = batch.superseded, "dropped superseded frames");
                stats.superseded += batch.superseded;
            }
            if batch.invalidate {
                compositor.invalidate();
            }
            if let Some((root, width, height)) = batch.frame {
                let start = Instant::now();
                let frame = compositor.frame(&root, width, height, sink)?;
                stats.record(&frame, start.elapsed());
            }
            if batch.shutdown {
                break;
            }
        }

        Ok(())
    }
}

impl Drop for RendererActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedSink {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn frame(text: &str) -> RenderCommand {
        RenderCommand::Frame {
            root: Node::text(text),
            width: 4,
            height: 1,
        }
    }

    #[test]
    fn test_renders_queued_frame() {
        let (tx, rx) = bounded(4);
        let sink = SharedSink::default();
        let actor = RendererActor::spawn(rx, sink.clone()).unwrap();

        tx.send(frame("ab")).unwrap();
        tx.send(RenderCommand::Shutdown).unwrap();
        let stats = actor.join().unwrap();

        assert_eq!(stats.frames, 1);
        assert_eq!(sink.text(), "\x1b[1;1Hab  ");
    }

    #[test]
    fn test_latest_frame_wins() {
        let (tx, rx) = bounded(8);
        for text in ["one", "two", "six"] {
            tx.send(frame(text)).unwrap();
        }
        tx.send(RenderCommand::Shutdown).unwrap();

        let sink = SharedSink::default();
        let stats = RendererActor::spawn(rx, sink.clone()).unwrap().join().unwrap();

        assert_eq!(stats.frames, 1);
        assert_eq!(stats.superseded, 2);
        assert_eq!(sink.text(), "\x1b[1;1Hsix ");
    }

    #[test]
    fn test_batch_collects_until_shutdown() {
        let batch = Batch::collect(
            RenderCommand::Invalidate,
            vec![frame("ab"), RenderCommand::Shutdown, frame("never")].into_iter(),
        );
        assert!(batch.invalidate);
        assert!(batch.shutdown);
        assert_eq!(batch.superseded, 0);
        assert!(matches!(batch.frame, Some((ref root, 4, 1)) if root.props.text == "ab"));
    }

    #[test]
    fn test_identical_frames_write_once() {
        let (tx, rx) = bounded(8);
        let sink = SharedSink::default();
        let actor = RendererActor::spawn(rx, sink.clone()).unwrap();

        tx.send(frame("ab")).unwrap();
        // Wait for the first frame so the second is not superseded.
        while sink.text().is_empty() {
            thread::yield_now();
        }
        tx.send(frame("ab")).unwrap();
        tx.send(RenderCommand::Shutdown).unwrap();
        let stats = actor.join().unwrap();

        assert_eq!(stats.frames + stats.superseded, 2);
        assert_eq!(stats.cells_changed, 4);
        assert_eq!(sink.text(), "\x1b[1;1Hab  ");
    }

    #[test]
    fn test_disconnect_stops_thread() {
        let (tx, rx) = bounded::<RenderCommand>(1);
        let actor = RendererActor::spawn(rx, io::sink()).unwrap();
        drop(tx);
        assert_eq!(actor.join(), Some(RenderStats::default()));
    }

    #[test]
    fn test_write_failure_stops_thread() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let (tx, rx) = bounded(4);
        tx.send(frame("x")).unwrap();
        let stats = RendererActor::spawn(rx, Broken).unwrap().join().unwrap();
        assert_eq!(stats.frames, 0);
    }
}
