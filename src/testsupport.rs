//! Shared test fixtures for session and widget test modules.
//!
//! [`ScriptedBackend`] replays a fixed queue of input events and cooked
//! lines, and records every byte written plus raw mode transitions so tests
//! can assert on what reached the "terminal".

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::core::backend::Backend;
use crate::core::session::TerminalSession;

/// What the scripted terminal observed
#[derive(Debug, Default)]
pub struct Recorded {
    output: Vec<u8>,
    raw: bool,
    raw_enables: usize,
    raw_disables: usize,
}

/// Test-side view of a [`ScriptedBackend`]
#[derive(Debug, Clone)]
pub struct ScriptHandle(Rc<RefCell<Recorded>>);

impl ScriptHandle {
    /// Everything written so far
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow().output).into_owned()
    }

    /// Everything written since the last call
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut self.0.borrow_mut().output);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_raw(&self) -> bool {
        self.0.borrow().raw
    }

    pub fn raw_enables(&self) -> usize {
        self.0.borrow().raw_enables
    }

    pub fn raw_disables(&self) -> usize {
        self.0.borrow().raw_disables
    }
}

/// Backend driven by a fixed script
#[derive(Debug)]
pub struct ScriptedBackend {
    events: VecDeque<Event>,
    lines: VecDeque<String>,
    size: Option<(u16, u16)>,
    interactive: bool,
    recorded: Rc<RefCell<Recorded>>,
}

impl ScriptedBackend {
    /// Interactive terminal of the given size
    pub fn new(width: u16, height: u16) -> (Self, ScriptHandle) {
        Self::build(Some((width, height)), true)
    }

    /// Piped stdin/stdout: no size, no raw mode
    pub fn non_interactive() -> (Self, ScriptHandle) {
        Self::build(None, false)
    }

    fn build(size: Option<(u16, u16)>, interactive: bool) -> (Self, ScriptHandle) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let backend = Self {
            events: VecDeque::new(),
            lines: VecDeque::new(),
            size,
            interactive,
            recorded: Rc::clone(&recorded),
        };
        (backend, ScriptHandle(recorded))
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn with_lines<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }
}

impl Write for ScriptedBackend {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.recorded.borrow_mut().output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Backend for ScriptedBackend {
    fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        let event = self.events.pop_front();
        if let Some(Event::Resize(cols, rows)) = event {
            self.size = Some((cols, rows));
        }
        Ok(event)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let mut recorded = self.recorded.borrow_mut();
        assert!(!recorded.raw, "raw mode acquired twice");
        recorded.raw = true;
        recorded.raw_enables += 1;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        let mut recorded = self.recorded.borrow_mut();
        if recorded.raw {
            recorded.raw = false;
            recorded.raw_disables += 1;
        }
        Ok(())
    }
}

/// Interactive session of the given size with a scripted event queue
pub fn session(width: u16, height: u16, events: Vec<Event>) -> (TerminalSession, ScriptHandle) {
    let (backend, handle) = ScriptedBackend::new(width, height);
    let backend = backend.with_events(events);
    (TerminalSession::new(Box::new(backend), Config::default()), handle)
}

/// Non-interactive session fed with cooked lines
pub fn piped_session<S: Into<String>>(lines: Vec<S>) -> (TerminalSession, ScriptHandle) {
    let (backend, handle) = ScriptedBackend::non_interactive();
    let backend = backend.with_lines(lines);
    (TerminalSession::new(Box::new(backend), Config::default()), handle)
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn ctrl(ch: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

pub fn chars(text: &str) -> Vec<Event> {
    text.chars().map(|c| key(KeyCode::Char(c))).collect()
}

pub fn resize(width: u16, height: u16) -> Event {
    Event::Resize(width, height)
}
