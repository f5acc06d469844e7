//! Terminal session
//!
//! Owns the terminal for the lifetime of the program: output, the persisted
//! content buffer, size tracking and the minimum-size guard. Every input
//! event passes through [`TerminalSession::next_event`], so a resize is
//! handled exactly once no matter which widget is waiting for keys.

use std::io::Write;
use std::ops::{Deref, DerefMut};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, KeyEvent};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tracing::{debug, info, warn};

use super::backend::{Backend, CrosstermBackend};
use super::buffer::{ContentBuffer, ContentLine};
use super::error::{Result, TermError};
use super::layout::{self, LayoutMetrics};
use super::size::{Dimensions, SizeProbe};
use crate::config::{Config, Theme};
use crate::ui::keys::{Chord, KeyMapper};
use crate::ui::style::{dim, paint_bold};

/// Exit code used when the user interrupts an editor
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Input delivered to widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press (resize handling already happened)
    Key(KeyEvent),
    /// The terminal was resized and the session has reacted to it
    Resize(Dimensions),
}

/// The terminal session
pub struct TerminalSession {
    backend: Box<dyn Backend>,
    config: Config,
    theme: Theme,
    keys: KeyMapper,
    probe: SizeProbe,
    metrics: LayoutMetrics,
    buffer: ContentBuffer,
    /// Size warning is on screen; content output is suppressed
    showing_warning: bool,
    /// Rows written since the last full clear
    rows_emitted: usize,
}

impl TerminalSession {
    /// Create a session over any backend
    pub fn new(backend: Box<dyn Backend>, config: Config) -> Self {
        let probe = SizeProbe::detect(backend.as_ref());
        let dims = probe.current();
        let metrics = LayoutMetrics::compute(
            dims.width,
            config.layout.max_content_width,
            config.layout.side_margin,
        );
        let submit = Chord::parse(&config.submit_key).unwrap_or_else(|| {
            warn!("Invalid submit_key {:?}, using Ctrl+S", config.submit_key);
            Chord::default()
        });
        let theme = config.theme();

        info!(
            "Session started: {}x{} (size probe {}), content width {}, theme {}",
            dims.width,
            dims.height,
            if probe.is_available() { "ok" } else { "unavailable" },
            metrics.content_width,
            theme.name
        );

        Self {
            backend,
            config,
            theme,
            keys: KeyMapper::new(submit),
            probe,
            metrics,
            buffer: ContentBuffer::new(),
            showing_warning: false,
            rows_emitted: 0,
        }
    }

    /// Create the session on the process stdin/stdout
    pub fn stdout(config: Config) -> Result<Self> {
        let backend = CrosstermBackend::new()?;
        Ok(Self::new(Box::new(backend), config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn keys(&self) -> &KeyMapper {
        &self.keys
    }

    pub fn dimensions(&self) -> Dimensions {
        self.probe.current()
    }

    pub fn width(&self) -> u16 {
        self.dimensions().width
    }

    pub fn height(&self) -> u16 {
        self.dimensions().height
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn content_width(&self) -> u16 {
        self.metrics.content_width
    }

    pub fn left_padding(&self) -> u16 {
        self.metrics.left_padding
    }

    pub fn is_interactive(&self) -> bool {
        self.backend.is_interactive()
    }

    /// Current size meets the configured minimum
    pub fn is_size_valid(&self) -> bool {
        let layout = self.config.layout;
        self.dimensions().fits(layout.min_width, layout.min_height)
    }

    pub fn is_showing_warning(&self) -> bool {
        self.showing_warning
    }

    /// Row where the next line of output will land
    pub fn cursor_row(&self) -> u16 {
        let last = self.height().saturating_sub(1) as usize;
        self.rows_emitted.min(last) as u16
    }

    // ---- content output ----

    /// Write text. Each `\n`-separated line is wrapped to the content width,
    /// padded and emitted; with `persist` it is also recorded for replay.
    /// Nothing is emitted while the size warning is showing.
    pub fn write(&mut self, text: &str, persist: bool) -> Result<()> {
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if persist {
                self.buffer.push_text(line);
            }
            if self.showing_warning {
                continue;
            }
            for placed in self.metrics.place(line) {
                self.emit(&placed)?;
            }
        }
        self.flush()
    }

    /// Write one persisted line
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write(text, true)
    }

    /// Write bytes as-is: no wrapping, padding or persistence
    pub fn write_raw(&mut self, text: &str) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        self.backend.write_all(text.as_bytes()).map_err(TermError::Write)?;
        self.flush()
    }

    /// Center text inside the content column
    pub fn center_text(&self, text: &str) -> String {
        layout::center(text, self.metrics.content_width as usize)
    }

    /// Blank line, optional bold title, dim rule across the content column, blank line
    pub fn write_header(&mut self, title: Option<&str>) -> Result<()> {
        self.write_line("")?;
        if let Some(title) = title {
            let centered = self.center_text(title);
            let styled = paint_bold(&centered, self.theme.title);
            self.write_line(&styled)?;
        }
        let rule = "\u{2013}".repeat(self.metrics.content_width as usize);
        self.write_line(&dim(&rule))?;
        self.write_line("")
    }

    /// Clear the screen and the content buffer, hiding the cursor
    pub fn clear(&mut self) -> Result<()> {
        self.buffer.clear();
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, Clear(ClearType::All), MoveTo(0, 0), Hide).map_err(TermError::Write)?;
        self.rows_emitted = 0;
        self.flush()
    }

    /// Forget persisted content without touching the screen
    pub fn clear_content(&mut self) {
        self.buffer.clear();
    }

    /// Copy of the persisted content
    pub fn content(&self) -> Vec<ContentLine> {
        self.buffer.snapshot()
    }

    /// Replace the persisted content and redraw it
    pub fn restore_content(&mut self, lines: Vec<ContentLine>) -> Result<()> {
        self.buffer.replace(lines);
        if self.showing_warning {
            return Ok(());
        }
        self.replay()
    }

    /// The persisted content laid out for the current metrics
    pub fn rendered_lines(&self) -> Vec<String> {
        self.buffer
            .lines()
            .iter()
            .flat_map(|line| self.metrics.place(&line.text))
            .collect()
    }

    /// Clear the screen and re-emit the persisted content
    pub(crate) fn replay(&mut self) -> Result<()> {
        queue!(self.backend, Clear(ClearType::All), MoveTo(0, 0)).map_err(TermError::Write)?;
        self.rows_emitted = 0;
        for line in self.rendered_lines() {
            self.emit(&line)?;
        }
        self.flush()
    }

    // ---- cursor and positioned output ----

    pub fn show_cursor(&mut self) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, Show).map_err(TermError::Write)?;
        self.flush()
    }

    pub fn hide_cursor(&mut self) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, Hide).map_err(TermError::Write)?;
        self.flush()
    }

    /// Move the cursor to a zero-based column and row
    pub fn move_cursor(&mut self, col: u16, row: u16) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, MoveTo(col, row)).map_err(TermError::Write)?;
        self.flush()
    }

    /// First row of a block of `rows` rows placed below the content.
    ///
    /// When the block would run off the bottom, the screen is scrolled up to
    /// make room and the content anchor moves with it.
    pub(crate) fn reserve_rows(&mut self, rows: u16) -> Result<u16> {
        let height = self.height();
        let rows = rows.min(height);
        let row = self.cursor_row();
        if self.showing_warning || row + rows <= height {
            return Ok(row);
        }
        let scroll = row + rows - height;
        queue!(self.backend, MoveTo(0, height - 1)).map_err(TermError::Write)?;
        for _ in 0..scroll {
            self.backend.write_all(b"\r\n").map_err(TermError::Write)?;
        }
        self.flush()?;
        let anchor = height - rows;
        self.rows_emitted = anchor as usize;
        Ok(anchor)
    }

    /// Park the cursor at `row` and make it the next content row
    pub(crate) fn settle_at(&mut self, row: u16) -> Result<()> {
        self.rows_emitted = row as usize;
        self.move_cursor(0, row)
    }

    /// Keep `row` on screen and continue content below it
    pub(crate) fn finish_row(&mut self, row: u16) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, MoveTo(0, row)).map_err(TermError::Write)?;
        self.backend.write_all(b"\r\n").map_err(TermError::Write)?;
        self.rows_emitted = row as usize + 1;
        self.flush()
    }

    /// Draw lines starting at `row`, erasing everything below. Not persisted.
    pub fn render_block(&mut self, row: u16, lines: &[String]) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, MoveTo(0, row), Clear(ClearType::FromCursorDown))
            .map_err(TermError::Write)?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.backend.write_all(b"\r\n").map_err(TermError::Write)?;
            }
            self.backend.write_all(line.as_bytes()).map_err(TermError::Write)?;
        }
        self.flush()
    }

    /// Redraw a single row in place. Not persisted.
    pub fn render_row(&mut self, row: u16, line: &str) -> Result<()> {
        if self.showing_warning {
            return Ok(());
        }
        queue!(self.backend, MoveTo(0, row), Clear(ClearType::CurrentLine))
            .map_err(TermError::Write)?;
        self.backend.write_all(line.as_bytes()).map_err(TermError::Write)?;
        self.flush()
    }

    // ---- input and resize ----

    /// Block until the terminal meets the minimum size, showing the warning
    /// meanwhile. Returns at once when the size is already valid.
    pub fn wait_for_valid_size(&mut self) -> Result<()> {
        if self.is_size_valid() {
            return Ok(());
        }
        let dims = self.dimensions();
        info!("Terminal too small ({}x{}), waiting for resize", dims.width, dims.height);
        self.showing_warning = true;
        self.show_size_warning()?;
        while !self.is_size_valid() {
            self.next_event()?;
        }
        Ok(())
    }

    /// Next key or resize. Resizes are applied before they are returned.
    pub fn next_event(&mut self) -> Result<InputEvent> {
        loop {
            let event = self
                .backend
                .read_event()
                .map_err(TermError::Read)?
                .ok_or(TermError::InputClosed)?;
            if let Some(input) = self.on_event(event)? {
                return Ok(input);
            }
        }
    }

    /// Route one raw event. Returns `None` for events widgets don't care about.
    pub(crate) fn on_event(&mut self, event: Event) -> Result<Option<InputEvent>> {
        if let Some(dims) = self.probe.observe(&event) {
            self.apply_size()?;
            return Ok(Some(InputEvent::Resize(dims)));
        }
        match event {
            Event::Key(key) => Ok(Some(InputEvent::Key(key))),
            _ => Ok(None),
        }
    }

    /// React to the current terminal size
    fn apply_size(&mut self) -> Result<()> {
        let dims = self.dimensions();
        let previous = self.metrics;
        self.metrics = LayoutMetrics::compute(
            dims.width,
            self.config.layout.max_content_width,
            self.config.layout.side_margin,
        );

        if !self.is_size_valid() {
            if !self.showing_warning {
                info!("Terminal shrank below minimum: {}x{}", dims.width, dims.height);
                self.showing_warning = true;
            }
            return self.show_size_warning();
        }

        if self.showing_warning {
            info!("Terminal size valid again: {}x{}", dims.width, dims.height);
            self.showing_warning = false;
            return self.replay();
        }

        if self.metrics != previous {
            debug!(
                "Reflowing {} lines: content width {} -> {}",
                self.buffer.len(),
                previous.content_width,
                self.metrics.content_width
            );
            return self.replay();
        }
        Ok(())
    }

    fn show_size_warning(&mut self) -> Result<()> {
        let dims = self.dimensions();
        let layout = self.config.layout;
        let lines = [
            paint_bold("\u{26a0}\u{fe0f}  Terminal too small!", self.theme.warning),
            String::new(),
            format!("Minimum size: {}x{}", layout.min_width, layout.min_height),
            format!("Current: {}x{}", dims.width, dims.height),
            String::new(),
            "Please resize your terminal to continue.".to_string(),
        ];

        queue!(self.backend, Clear(ClearType::All), MoveTo(0, 0)).map_err(TermError::Write)?;
        let top = dims.height.saturating_sub(lines.len() as u16) / 2;
        for _ in 0..top {
            self.backend.write_all(b"\r\n").map_err(TermError::Write)?;
        }
        for line in &lines {
            let centered = layout::center_left(line, dims.width as usize);
            self.backend.write_all(centered.as_bytes()).map_err(TermError::Write)?;
            self.backend.write_all(b"\r\n").map_err(TermError::Write)?;
        }
        self.flush()
    }

    /// Read a cooked line (non-interactive fallbacks)
    pub(crate) fn read_line(&mut self) -> Result<Option<String>> {
        self.flush()?;
        self.backend.read_line().map_err(TermError::Read)
    }

    /// Switch to raw keyboard input until the guard is dropped
    pub fn raw_input(&mut self) -> Result<RawInput<'_>> {
        self.backend.enable_raw_mode().map_err(TermError::RawMode)?;
        Ok(RawInput { session: self })
    }

    /// Restore the terminal and exit the process
    pub fn abort(&mut self, code: i32) -> ! {
        info!("Interrupted, exiting with code {}", code);
        let _ = queue!(self.backend, Show);
        let _ = self.backend.write_all(b"\r\n");
        let _ = self.backend.disable_raw_mode();
        let _ = self.backend.flush();
        std::process::exit(code)
    }

    fn emit(&mut self, line: &str) -> Result<()> {
        self.backend.write_all(line.as_bytes()).map_err(TermError::Write)?;
        self.backend.write_all(b"\r\n").map_err(TermError::Write)?;
        self.rows_emitted += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.backend.flush().map_err(TermError::Write)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.backend.disable_raw_mode();
        let _ = queue!(self.backend, Show);
        let _ = self.backend.flush();
    }
}

/// Raw keyboard mode held for the lifetime of the guard.
///
/// The guard borrows the session mutably, so raw mode cannot be acquired a
/// second time while one is alive.
pub struct RawInput<'a> {
    session: &'a mut TerminalSession,
}

impl Deref for RawInput<'_> {
    type Target = TerminalSession;

    fn deref(&self) -> &TerminalSession {
        self.session
    }
}

impl DerefMut for RawInput<'_> {
    fn deref_mut(&mut self) -> &mut TerminalSession {
        self.session
    }
}

impl Drop for RawInput<'_> {
    fn drop(&mut self) {
        let _ = self.session.backend.disable_raw_mode();
        let _ = self.session.backend.flush();
    }
}
