//! Terminal backend seam.
//!
//! Everything the engine needs from the physical terminal goes through the
//! [`Backend`] trait: output bytes, size, input events, cooked line input and
//! raw mode switching. [`CrosstermBackend`] is the real implementation; tests
//! substitute a scripted one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::{self, Event};
use crossterm::terminal;
use crossterm::tty::IsTty;
use tracing::{debug, warn};

use super::error::{Result, TermError};

/// Set while a stdout-backed session exists (there is one physical terminal)
static STDOUT_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Access to a terminal
pub trait Backend: Write {
    /// Current (columns, rows), or `None` if the size cannot be probed
    fn size(&self) -> Option<(u16, u16)>;

    /// Whether raw keyboard input is possible
    fn is_interactive(&self) -> bool;

    /// Block until the next input event. `Ok(None)` means the input is gone.
    fn read_event(&mut self) -> io::Result<Option<Event>>;

    /// Read one cooked line without its terminator. `Ok(None)` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn enable_raw_mode(&mut self) -> io::Result<()>;

    fn disable_raw_mode(&mut self) -> io::Result<()>;
}

/// Backend over the process stdin/stdout using crossterm
pub struct CrosstermBackend {
    stdout: io::Stdout,
    interactive: bool,
    raw: bool,
}

impl CrosstermBackend {
    /// Claim the process terminal. Fails if it is already claimed.
    pub fn new() -> Result<Self> {
        if STDOUT_CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(TermError::SessionActive);
        }
        let interactive = io::stdin().is_tty() && io::stdout().is_tty();
        if !interactive {
            warn!("stdin/stdout is not a terminal, using line-based input");
        }
        Ok(Self {
            stdout: io::stdout(),
            interactive,
            raw: false,
        })
    }
}

impl Write for CrosstermBackend {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Backend for CrosstermBackend {
    fn size(&self) -> Option<(u16, u16)> {
        if !self.interactive {
            return None;
        }
        terminal::size().ok()
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        if !self.interactive {
            return Ok(None);
        }
        event::read().map(Some)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.stdout.flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !self.raw {
            terminal::enable_raw_mode()?;
            self.raw = true;
            debug!("raw mode on");
        }
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if self.raw {
            terminal::disable_raw_mode()?;
            self.raw = false;
            debug!("raw mode off");
        }
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.disable_raw_mode();
        let _ = self.stdout.flush();
        STDOUT_CLAIMED.store(false, Ordering::SeqCst);
    }
}
