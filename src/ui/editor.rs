//! Multi-line text editor
//!
//! [`LineEditor`] holds the rows and a 2-D cursor and applies keys to them.
//! Columns count characters, not bytes. The cursor always satisfies
//! `row < lines.len()` and `col <= chars in lines[row]`.
//!
//! [`TerminalSession::prompt_multiline_text`] runs the editor below the current
//! content. Buffer rows are soft-wrapped to the content width; single-row
//! edits redraw only that row's screen rows, anything else repaints the
//! visible block.

use tracing::debug;

use crate::core::error::Result;
use crate::core::layout::char_width;
use crate::core::session::{InputEvent, TerminalSession, INTERRUPT_EXIT_CODE};
use crate::ui::keys::Key;
use crate::ui::style::dim;

/// Spaces inserted for Tab
const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Editing,
    Resolved,
}

/// What the screen needs after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    Ignored,
    /// Cursor moved within the row
    Cursor,
    /// Current row changed
    Line,
    /// Rows were added, removed or the cursor changed row
    Repaint,
    /// Submit chord: joined and trimmed text
    Submitted(String),
    /// Ctrl+C
    Interrupted,
}

/// Editor buffer with cursor
#[derive(Debug, Clone)]
pub struct LineEditor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    phase: EditorPhase,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    /// One empty row, cursor at the origin
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            phase: EditorPhase::Editing,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    /// Rows joined by newlines, trimmed
    pub fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    /// Current row up to the cursor
    pub fn before_cursor(&self) -> &str {
        let line = &self.lines[self.row];
        &line[..byte_index(line, self.col)]
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    /// Feed one key
    pub fn handle_key(&mut self, key: Key) -> EditStep {
        if self.phase == EditorPhase::Resolved {
            return EditStep::Ignored;
        }
        match key {
            Key::Char(ch) => {
                self.insert_char(ch);
                EditStep::Line
            }
            Key::Tab => {
                for _ in 0..TAB_WIDTH {
                    self.insert_char(' ');
                }
                EditStep::Line
            }
            Key::Enter => {
                self.split_line();
                EditStep::Repaint
            }
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::Left => self.left(),
            Key::Right => self.right(),
            Key::Up => self.vertical(-1),
            Key::Down => self.vertical(1),
            Key::Home => {
                self.col = 0;
                EditStep::Cursor
            }
            Key::End => {
                self.col = self.line_len(self.row);
                EditStep::Cursor
            }
            Key::Submit => {
                self.phase = EditorPhase::Resolved;
                EditStep::Submitted(self.text())
            }
            Key::Interrupt => {
                self.phase = EditorPhase::Resolved;
                EditStep::Interrupted
            }
            Key::Escape | Key::Other => EditStep::Ignored,
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, ch);
        self.col += 1;
    }

    /// Split the row at the cursor; cursor goes to the start of the new row
    pub fn split_line(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    fn backspace(&mut self) -> EditStep {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
            EditStep::Line
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
            EditStep::Repaint
        } else {
            EditStep::Ignored
        }
    }

    fn delete(&mut self) -> EditStep {
        if self.col < self.line_len(self.row) {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
            EditStep::Line
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            EditStep::Repaint
        } else {
            EditStep::Ignored
        }
    }

    fn left(&mut self) -> EditStep {
        if self.col > 0 {
            self.col -= 1;
            EditStep::Cursor
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
            EditStep::Repaint
        } else {
            EditStep::Ignored
        }
    }

    fn right(&mut self) -> EditStep {
        if self.col < self.line_len(self.row) {
            self.col += 1;
            EditStep::Cursor
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
            EditStep::Repaint
        } else {
            EditStep::Ignored
        }
    }

    fn vertical(&mut self, delta: isize) -> EditStep {
        let target = self.row as isize + delta;
        if target < 0 || target as usize >= self.lines.len() {
            return EditStep::Ignored;
        }
        self.row = target as usize;
        self.col = self.col.min(self.line_len(self.row));
        EditStep::Repaint
    }
}

/// Byte offset of the `col`-th character (or the end)
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// Characters `start..end` of `line`
fn char_slice(line: &str, start: usize, end: usize) -> &str {
    &line[byte_index(line, start)..byte_index(line, end)]
}

/// One screen row of a soft-wrapped buffer row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Buffer row
    pub row: usize,
    /// Character range of the row shown on this screen row
    pub start: usize,
    pub end: usize,
}

/// Cut buffer rows into segments at most `width` cells wide.
///
/// A row whose last segment is exactly full gets an empty segment after it,
/// where the cursor goes when it sits at the end of that row.
pub fn wrap_rows(lines: &[String], width: usize) -> Vec<Segment> {
    let width = width.max(1);
    let mut segments = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let mut start = 0;
        let mut used = 0;
        let mut len = 0;
        for (i, ch) in line.chars().enumerate() {
            let w = char_width(ch);
            if used + w > width && i > start {
                segments.push(Segment { row, start, end: i });
                start = i;
                used = 0;
            }
            used += w;
            len = i + 1;
        }
        segments.push(Segment { row, start, end: len });
        if used >= width {
            segments.push(Segment { row, start: len, end: len });
        }
    }
    segments
}

/// Index of the segment holding the cursor at (`row`, `col`)
pub fn locate(segments: &[Segment], row: usize, col: usize) -> usize {
    segments
        .iter()
        .rposition(|s| s.row == row && s.start <= col)
        .unwrap_or(0)
}

/// Which segments are on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorView {
    /// Screen row of the first visible segment
    pub top: u16,
    /// First visible segment
    pub scroll: usize,
    /// Screen rows available
    pub rows: usize,
    /// Segment count at the last full paint
    pub painted: usize,
}

impl EditorView {
    pub fn new(top: u16, screen_height: u16) -> Self {
        Self {
            top,
            scroll: 0,
            rows: (screen_height.saturating_sub(top) as usize).max(1),
            painted: 0,
        }
    }

    /// Scroll so `segment` is visible. True if the view moved.
    pub fn follow(&mut self, segment: usize) -> bool {
        let before = self.scroll;
        if segment < self.scroll {
            self.scroll = segment;
        } else if segment >= self.scroll + self.rows {
            self.scroll = segment + 1 - self.rows;
        }
        self.scroll != before
    }

    pub fn shows(&self, segment: usize) -> bool {
        segment >= self.scroll && segment < self.scroll + self.rows
    }

    /// Screen row of a visible segment
    pub fn screen_row(&self, segment: usize) -> u16 {
        self.top + (segment - self.scroll) as u16
    }
}

/// Rows kept free below the content for the editor
const EDITOR_MIN_ROWS: u16 = 3;

impl TerminalSession {
    /// Collect free-form multi-line text. Enter starts a new row; the submit
    /// chord (Ctrl+S by default) finishes. Ctrl+C exits the process.
    pub fn prompt_multiline_text(&mut self) -> Result<String> {
        if !self.is_interactive() {
            return self.multiline_fallback();
        }

        let label = self.keys().submit_chord().label();
        let hint = format!("Your answer (Enter for new line, {} to submit):", label);
        self.write_line(&dim(&hint))?;

        let mut editor = LineEditor::new();
        let mut raw = self.raw_input()?;
        let top = raw.reserve_rows(EDITOR_MIN_ROWS)?;
        let mut view = EditorView::new(top, raw.height());
        raw.show_cursor()?;
        raw.update_editor(&editor, &mut view, &EditStep::Repaint)?;

        let text = loop {
            match raw.next_event()? {
                InputEvent::Resize(dims) => {
                    if raw.is_showing_warning() {
                        continue;
                    }
                    let top = raw.reserve_rows(EDITOR_MIN_ROWS)?;
                    view = EditorView {
                        scroll: view.scroll,
                        ..EditorView::new(top, dims.height)
                    };
                    raw.show_cursor()?;
                    raw.update_editor(&editor, &mut view, &EditStep::Repaint)?;
                }
                InputEvent::Key(event) => {
                    let Some(key) = raw.keys().decode(&event) else {
                        continue;
                    };
                    if raw.is_showing_warning() && key != Key::Interrupt {
                        continue;
                    }
                    match editor.handle_key(key) {
                        EditStep::Ignored => {}
                        EditStep::Submitted(text) => break text,
                        EditStep::Interrupted => raw.abort(INTERRUPT_EXIT_CODE),
                        step => raw.update_editor(&editor, &mut view, &step)?,
                    }
                }
            }
        };

        debug!("Editor submitted {} rows", editor.lines().len());
        raw.render_block(view.top, &[])?;
        raw.settle_at(view.top)?;
        raw.hide_cursor()?;
        Ok(text)
    }

    /// Bring the screen up to date after `step` and place the cursor
    fn update_editor(
        &mut self,
        editor: &LineEditor,
        view: &mut EditorView,
        step: &EditStep,
    ) -> Result<()> {
        if self.is_showing_warning() {
            return Ok(());
        }
        let segments = wrap_rows(editor.lines(), self.content_width() as usize);
        let (row, col) = editor.cursor();
        let at = locate(&segments, row, col);
        let pad = " ".repeat(self.left_padding() as usize);

        let scrolled = view.follow(at);
        if scrolled || *step == EditStep::Repaint || segments.len() != view.painted {
            let rows: Vec<String> = segments
                .iter()
                .skip(view.scroll)
                .take(view.rows)
                .map(|seg| {
                    let line = &editor.lines()[seg.row];
                    format!("{}{}", pad, char_slice(line, seg.start, seg.end))
                })
                .collect();
            self.render_block(view.top, &rows)?;
            view.painted = segments.len();
        } else if *step == EditStep::Line {
            let line = &editor.lines()[row];
            for (i, seg) in segments.iter().enumerate() {
                if seg.row == row && view.shows(i) {
                    let text = format!("{}{}", pad, char_slice(line, seg.start, seg.end));
                    self.render_row(view.screen_row(i), &text)?;
                }
            }
        }

        let seg = segments[at];
        let offset: usize = char_slice(&editor.lines()[row], seg.start, col)
            .chars()
            .map(char_width)
            .sum();
        let x = (pad.len() + offset).min(self.width().saturating_sub(1) as usize);
        self.move_cursor(x as u16, view.screen_row(at))
    }

    /// Read cooked lines until end of input
    fn multiline_fallback(&mut self) -> Result<String> {
        self.write("Your answer (press Ctrl+D when done):", false)?;
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            lines.push(line);
        }
        Ok(lines.join("\n").trim().to_string())
    }
}
