//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture keyboard, scroll, paste and resize events without blocking
//! the main application. Decoding is crossterm's; the actor only maps
//! its events onto [`InputEvent`].

use super::messages::{InputEvent, KeyCode, KeyModifiers};
use crossbeam_channel::{SendTimeoutError, Sender};
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
#[derive(Debug)]
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long the thread waits for an event
    /// before checking the shutdown flag again.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("tessel-input".to_string())
            .spawn(move || {
                tracing::debug!("input thread started");
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
                tracing::debug!("input thread stopped");
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                // The receiver may have stopped reading; never block here.
                let _ = sender.try_send(InputEvent::Shutdown);
                break;
            }

            let event = match event::poll(poll_timeout) {
                Ok(true) => event::read().map(Self::convert_event),
                Ok(false) => continue,
                Err(err) => Err(err),
            };

            let message = match event {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%err, "terminal event read failed");
                    InputEvent::Error(err.to_string())
                }
            };

            if !Self::forward(sender, shutdown, message, poll_timeout) {
                break;
            }
        }
    }

    /// Queue `message`, retrying while the channel is full.
    ///
    /// Returns `false` once the receiver is gone or shutdown was
    /// requested while waiting for room.
    fn forward(
        sender: &Sender<InputEvent>,
        shutdown: &AtomicBool,
        mut message: InputEvent,
        poll_timeout: Duration,
    ) -> bool {
        loop {
            match sender.send_timeout(message, poll_timeout) {
                Ok(()) => return true,
                Err(SendTimeoutError::Disconnected(_)) => return false,
                Err(SendTimeoutError::Timeout(pending)) => {
                    if shutdown.load(Ordering::Relaxed) {
                        return false;
                    }
                    message = pending;
                }
            }
        }
    }

    /// Convert a crossterm event to our [`InputEvent`].
    ///
    /// Returns `None` for events the pipeline does not consume.
    pub fn convert_event(event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (not release or repeat)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(InputEvent::Key {
                    code: Self::convert_key_code(key_event.code)?,
                    modifiers: Self::convert_modifiers(key_event.modifiers),
                })
            }

            Event::Mouse(mouse) => {
                let delta = match mouse.kind {
                    MouseEventKind::ScrollUp => 1,
                    MouseEventKind::ScrollDown => -1,
                    _ => return None,
                };
                Some(InputEvent::Scroll {
                    x: mouse.column,
                    y: mouse.row,
                    delta,
                })
            }

            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),

            Event::Paste(text) => Some(InputEvent::Paste(text)),

            Event::FocusGained | Event::FocusLost => None,
        }
    }

    /// Convert crossterm `KeyCode` to our [`KeyCode`].
    fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
        Some(match code {
            event::KeyCode::Char(c) => KeyCode::Char(c),
            event::KeyCode::F(n) => KeyCode::F(n),
            event::KeyCode::Backspace => KeyCode::Backspace,
            event::KeyCode::Enter => KeyCode::Enter,
            event::KeyCode::Left => KeyCode::Left,
            event::KeyCode::Right => KeyCode::Right,
            event::KeyCode::Up => KeyCode::Up,
            event::KeyCode::Down => KeyCode::Down,
            event::KeyCode::Home => KeyCode::Home,
            event::KeyCode::End => KeyCode::End,
            event::KeyCode::PageUp => KeyCode::PageUp,
            event::KeyCode::PageDown => KeyCode::PageDown,
            event::KeyCode::Tab => KeyCode::Tab,
            event::KeyCode::BackTab => KeyCode::BackTab,
            event::KeyCode::Delete => KeyCode::Delete,
            event::KeyCode::Insert => KeyCode::Insert,
            event::KeyCode::Esc => KeyCode::Esc,
            _ => return None,
        })
    }

    /// Convert crossterm `KeyModifiers` to our [`KeyModifiers`].
    fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
        KeyModifiers {
            shift: mods.contains(event::KeyModifiers::SHIFT),
            control: mods.contains(event::KeyModifiers::CONTROL),
            alt: mods.contains(event::KeyModifiers::ALT),
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEvent};
    use std::time::Instant;

    fn press(code: event::KeyCode, modifiers: event::KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_convert_key_press() {
        let event =
            InputActor::convert_event(press(event::KeyCode::Char('q'), event::KeyModifiers::NONE));
        assert_eq!(event, Some(InputEvent::key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_convert_modifiers() {
        let event = InputActor::convert_event(press(
            event::KeyCode::Char('c'),
            event::KeyModifiers::CONTROL | event::KeyModifiers::SHIFT,
        ));
        assert_eq!(
            event,
            Some(InputEvent::Key {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers {
                    shift: true,
                    control: true,
                    alt: false,
                },
            })
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: event::KeyCode::Enter,
            modifiers: event::KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(InputActor::convert_event(release), None);
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let event =
            InputActor::convert_event(press(event::KeyCode::CapsLock, event::KeyModifiers::NONE));
        assert_eq!(event, None);
    }

    #[test]
    fn test_convert_scroll() {
        let scroll = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 4,
                row: 7,
                modifiers: event::KeyModifiers::NONE,
            })
        };
        assert_eq!(
            InputActor::convert_event(scroll(MouseEventKind::ScrollDown)),
            Some(InputEvent::Scroll { x: 4, y: 7, delta: -1 })
        );
        assert_eq!(
            InputActor::convert_event(scroll(MouseEventKind::ScrollUp)),
            Some(InputEvent::Scroll { x: 4, y: 7, delta: 1 })
        );
        assert_eq!(InputActor::convert_event(scroll(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_convert_resize_and_paste() {
        assert_eq!(
            InputActor::convert_event(Event::Resize(100, 40)),
            Some(InputEvent::Resize {
                width: 100,
                height: 40
            })
        );
        assert_eq!(
            InputActor::convert_event(Event::Paste("hi".into())),
            Some(InputEvent::Paste("hi".into()))
        );
        assert_eq!(InputActor::convert_event(Event::FocusLost), None);
    }

    #[test]
    fn test_shutdown_with_full_queue_does_not_block() {
        let (tx, rx) = bounded(1);
        tx.send(InputEvent::key(KeyCode::Enter)).unwrap();
        let shutdown = Arc::new(AtomicBool::new(true));

        let (done_tx, done_rx) = bounded(1);
        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            InputActor::run_loop(&tx, &flag, Duration::from_millis(5));
            let _ = done_tx.send(());
        });

        assert!(done_rx.recv_timeout(Duration::from_secs(2)).is_ok());
        handle.join().unwrap();
        // The queued event is still there; the shutdown notice was dropped.
        assert_eq!(rx.try_recv(), Ok(InputEvent::key(KeyCode::Enter)));
    }

    #[test]
    fn test_forward_gives_up_on_shutdown() {
        let (tx, _rx) = bounded(1);
        tx.send(InputEvent::key(KeyCode::Up)).unwrap();
        let shutdown = AtomicBool::new(true);

        let start = Instant::now();
        let sent = InputActor::forward(
            &tx,
            &shutdown,
            InputEvent::key(KeyCode::Down),
            Duration::from_millis(5),
        );
        assert!(!sent);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_forward_waits_for_room() {
        let (tx, rx) = bounded(1);
        tx.send(InputEvent::key(KeyCode::Up)).unwrap();
        let shutdown = AtomicBool::new(false);

        let reader = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            let first = rx.recv().unwrap();
            let second = rx.recv().unwrap();
            (first, second)
        });

        let sent = InputActor::forward(
            &tx,
            &shutdown,
            InputEvent::key(KeyCode::Down),
            Duration::from_millis(5),
        );
        assert!(sent);
        let (first, second) = reader.join().unwrap();
        assert_eq!(first, InputEvent::key(KeyCode::Up));
        assert_eq!(second, InputEvent::key(KeyCode::Down));
    }

    #[test]
    fn test_forward_stops_when_receiver_dropped() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let shutdown = AtomicBool::new(false);
        assert!(!InputActor::forward(
            &tx,
            &shutdown,
            InputEvent::key(KeyCode::Esc),
            Duration::from_millis(5),
        ));
    }
}
