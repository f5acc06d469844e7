//! Line-based prompts
//!
//! Free text, yes/no, and "press Enter" questions. On a terminal the answer
//! is read key by key through the session's event loop so a resize while a
//! prompt is waiting reflows the screen like it does for the widgets.
//! Piped input is read as cooked lines.

use tracing::debug;

use super::keys::Key;
use crate::core::error::{Result, TermError};
use crate::core::layout::{self, char_width};
use crate::core::session::{InputEvent, TerminalSession, INTERRUPT_EXIT_CODE};

/// Longest suffix of `text` that fits in `room` cells
fn tail_fitting(text: &str, room: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices().rev() {
        used += char_width(ch);
        if used > room {
            return &text[idx + ch.len_utf8()..];
        }
    }
    text
}

/// Interpret a yes/no answer. `None` for anything unrecognised.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl TerminalSession {
    /// Ask a question and return the trimmed answer (empty at end of input)
    pub fn ask_line(&mut self, question: &str) -> Result<String> {
        let answer = self.prompt_line(question)?;
        Ok(answer.unwrap_or_default().trim().to_string())
    }

    /// Show a message and wait for Enter
    pub fn press_enter(&mut self, message: &str) -> Result<()> {
        self.prompt_line(message)?;
        Ok(())
    }

    /// Yes/no question; empty or unrecognised answers give `default`
    pub fn ask_yes_no(&mut self, question: &str, default: bool) -> Result<bool> {
        let suffix = if default { " (Y/n): " } else { " (y/N): " };
        let answer = self.ask_line(&format!("{}{}", question, suffix))?;
        Ok(parse_yes_no(&answer).unwrap_or(default))
    }

    /// Write `prompt` at the content column and read one line.
    /// Nothing is persisted; `None` at end of input.
    pub(crate) fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = if self.is_interactive() {
            self.read_prompt_keys(prompt)?
        } else {
            let padded = format!("{}{}", " ".repeat(self.left_padding() as usize), prompt);
            self.write_raw(&padded)?;
            let line = self.read_line()?;
            // piped input is not echoed
            self.write_raw("\r\n")?;
            line
        };
        if line.is_none() {
            debug!("Input closed at prompt {:?}", prompt.trim());
        }
        Ok(line)
    }

    /// Raw-mode line entry: printable keys, Backspace, Enter
    fn read_prompt_keys(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut raw = self.raw_input()?;
        let mut answer = String::new();
        let mut row = raw.reserve_rows(1)?;
        raw.show_cursor()?;
        raw.draw_prompt(row, prompt, &answer)?;

        loop {
            let event = match raw.next_event() {
                Ok(event) => event,
                Err(TermError::InputClosed) => {
                    raw.finish_row(row)?;
                    raw.hide_cursor()?;
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };
            match event {
                InputEvent::Resize(_) => {
                    if raw.is_showing_warning() {
                        continue;
                    }
                    row = raw.reserve_rows(1)?;
                    raw.show_cursor()?;
                }
                InputEvent::Key(event) => {
                    let Some(key) = raw.keys().decode(&event) else {
                        continue;
                    };
                    if key == Key::Interrupt {
                        raw.abort(INTERRUPT_EXIT_CODE);
                    }
                    if raw.is_showing_warning() {
                        continue;
                    }
                    match key {
                        Key::Enter => break,
                        Key::Char(ch) => answer.push(ch),
                        Key::Backspace => {
                            answer.pop();
                        }
                        _ => continue,
                    }
                }
            }
            raw.draw_prompt(row, prompt, &answer)?;
        }

        raw.finish_row(row)?;
        raw.hide_cursor()?;
        Ok(Some(answer))
    }

    /// Draw prompt and answer on `row`, keeping the end of the answer visible
    fn draw_prompt(&mut self, row: u16, prompt: &str, answer: &str) -> Result<()> {
        let lead = format!("{}{}", " ".repeat(self.left_padding() as usize), prompt);
        let width = self.width() as usize;
        let room = width.saturating_sub(layout::visible_width(&lead) + 1);
        let line = format!("{}{}", lead, tail_fitting(answer, room));
        let col = layout::visible_width(&line).min(width.saturating_sub(1));
        self.render_row(row, &line)?;
        self.move_cursor(col as u16, row)
    }
}
