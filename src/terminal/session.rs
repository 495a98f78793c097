//! Session: terminal mode guard.
//!
//! Entering a session switches the terminal into raw mode, optionally
//! onto the alternate screen with mouse reporting, and hides the
//! cursor. Dropping the guard undoes all of it, including when setup
//! fails halfway or the caller unwinds.

use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

/// Terminal modes requested for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer.
    pub alternate_screen: bool,
    /// Report mouse events.
    pub mouse: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse: false,
        }
    }
}

/// RAII guard over raw mode and screen modes.
#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    active: bool,
}

impl Session {
    /// Enter raw mode and apply `options` on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal rejects any mode change. Modes
    /// already applied are restored before returning.
    pub fn enter(options: SessionOptions) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, dropping the guard restores the terminal.
        let session = Self {
            options,
            active: true,
        };

        let mut stdout = io::stdout();
        if options.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if options.mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, EnableBracketedPaste, cursor::Hide, Clear(ClearType::All))?;

        tracing::debug!(?options, "terminal session entered");
        Ok(session)
    }

    /// Current terminal size as (columns, rows).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// The options this session was entered with.
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    /// Restore the terminal now instead of on drop.
    ///
    /// Calling this more than once is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while restoring; every step is still
    /// attempted.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut stdout = io::stdout();
        let mut results = vec![execute!(stdout, cursor::Show, DisableBracketedPaste)];
        if self.options.mouse {
            results.push(execute!(stdout, DisableMouseCapture));
        }
        if self.options.alternate_screen {
            results.push(execute!(stdout, LeaveAlternateScreen));
        }
        results.push(terminal::disable_raw_mode());
        results.push(stdout.flush());

        tracing::debug!("terminal session restored");
        results.into_iter().collect()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}
