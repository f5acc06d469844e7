//! Single-choice select menu.
//!
//! A keyboard-driven list: the highlighted row moves with ↑/↓ (or k/j) and
//! wraps at both ends, Enter picks the highlighted option, and Esc or Ctrl+C
//! takes the escape hatch (the configured fallback value, else the first
//! option).
//!
//! [`SelectMenu`] is the pure state machine; [`TerminalSession::prompt_select`]
//! and [`TerminalSession::show_select_menu`] drive it with live input.
//!
//! # Example
//!
//! ```ignore
//! let options = vec![
//!     SelectOption::new("Play", "play"),
//!     SelectOption::new("Quit", "home").with_description("back to the shell"),
//! ];
//! let choice = session.show_select_menu("Main menu", options)?;
//! ```

use tracing::debug;

use crate::config::Theme;
use crate::core::error::{Result, TermError};
use crate::core::layout::{self, visible_width};
use crate::core::session::{InputEvent, TerminalSession};
use crate::ui::keys::Key;
use crate::ui::style::{bold, dim, paint, paint_bold};

/// Hint line shown under the options
pub const MENU_HINT: &str = "\u{2191}\u{2193} Navigate \u{2022} Enter Select \u{2022} Esc/Ctrl+C Exit";

/// Widest the option box gets, in cells
const MAX_BOX_WIDTH: usize = 80;

/// A single entry in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Display label.
    pub label: String,
    /// Value handed back when the option is chosen.
    pub value: String,
    /// Optional dimmed text shown next to non-highlighted rows.
    pub description: Option<String>,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Label plus description, as measured for the box width
    fn full_text(&self) -> String {
        match &self.description {
            Some(d) => format!("{} {}", self.label, d),
            None => self.label.clone(),
        }
    }
}

/// Where the menu is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    /// Needs a full draw
    Rendering,
    /// Drawn, waiting for input
    AwaitingKey,
    /// Selection moved, needs a redraw
    Navigating,
    /// A value was produced; further keys are ignored
    Resolved,
}

/// Outcome of feeding one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuStep {
    /// Selection changed, draw again
    Redraw,
    /// Nothing happened
    Ignored,
    /// The menu finished with this value
    Resolved(String),
}

/// Select menu state.
#[derive(Debug, Clone)]
pub struct SelectMenu {
    options: Vec<SelectOption>,
    selected: usize,
    phase: MenuPhase,
    fallback: String,
}

impl SelectMenu {
    /// Creates a menu with the first option highlighted.
    ///
    /// `fallback` is the value the escape hatch looks for.
    pub fn new(options: Vec<SelectOption>, fallback: &str) -> Result<Self> {
        if options.is_empty() {
            return Err(TermError::EmptyMenu);
        }
        Ok(Self {
            options,
            selected: 0,
            phase: MenuPhase::Rendering,
            fallback: fallback.to_string(),
        })
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Index of the highlighted option
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != MenuPhase::Resolved
    }

    /// The menu has been drawn
    pub fn mark_rendered(&mut self) {
        if self.is_active() {
            self.phase = MenuPhase::AwaitingKey;
        }
    }

    /// Something outside the menu wiped it from the screen
    pub fn invalidate(&mut self) {
        if self.is_active() {
            self.phase = MenuPhase::Rendering;
        }
    }

    /// Move selection up, wrapping to the last option
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.options.len() - 1;
        }
    }

    /// Move selection down, wrapping to the first option
    pub fn down(&mut self) {
        if self.selected < self.options.len() - 1 {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Value of the fallback option if present, else the first option
    pub fn escape_value(&self) -> String {
        self.options
            .iter()
            .find(|opt| opt.value == self.fallback)
            .unwrap_or(&self.options[0])
            .value
            .clone()
    }

    /// Feed one key
    pub fn handle_key(&mut self, key: Key) -> MenuStep {
        if !self.is_active() {
            return MenuStep::Ignored;
        }
        match key {
            Key::Up | Key::Char('k') => {
                self.up();
                self.phase = MenuPhase::Navigating;
                MenuStep::Redraw
            }
            Key::Down | Key::Char('j') => {
                self.down();
                self.phase = MenuPhase::Navigating;
                MenuStep::Redraw
            }
            Key::Enter => self.resolve(self.options[self.selected].value.clone()),
            Key::Escape | Key::Interrupt => self.resolve(self.escape_value()),
            _ => MenuStep::Ignored,
        }
    }

    fn resolve(&mut self, value: String) -> MenuStep {
        self.phase = MenuPhase::Resolved;
        MenuStep::Resolved(value)
    }

    /// Box width: widest label/description plus room for the marker
    pub fn box_width(&self) -> usize {
        let widest = self
            .options
            .iter()
            .map(|opt| visible_width(&opt.full_text()))
            .max()
            .unwrap_or(0);
        (widest + 6).min(MAX_BOX_WIDTH)
    }

    /// Lines for the option list and hint, laid out for a terminal `width` wide
    pub fn frame(&self, width: u16, theme: &Theme) -> Vec<String> {
        let width = width as usize;
        let pad = " ".repeat(width.saturating_sub(self.box_width()) / 2);

        let mut lines: Vec<String> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, opt)| {
                if i == self.selected {
                    let marked = format!("\u{276f} {}", opt.label);
                    format!("{}{}", pad, paint_bold(&marked, theme.accent))
                } else {
                    let mut line = format!("{}  {}", pad, opt.label);
                    if let Some(description) = &opt.description {
                        line.push(' ');
                        line.push_str(&paint(description, theme.muted));
                    }
                    line
                }
            })
            .collect();

        lines.push(String::new());
        lines.push(layout::center_left(&dim(MENU_HINT), width));
        lines
    }
}

/// How a running menu positions itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Below the last written content
    Inline,
    /// Vertically centered under a title, on a cleared screen
    Centered,
}

impl TerminalSession {
    /// Show a select menu below the current content and return the chosen value
    pub fn prompt_select(&mut self, options: Vec<SelectOption>) -> Result<String> {
        let menu = SelectMenu::new(options, &self.config().fallback_value)?;
        self.run_menu(menu, None, Placement::Inline)
    }

    /// Clear the screen and show `message` above a vertically centered menu
    pub fn show_select_menu(&mut self, message: &str, options: Vec<SelectOption>) -> Result<String> {
        let menu = SelectMenu::new(options, &self.config().fallback_value)?;
        self.clear()?;
        self.run_menu(menu, Some(message), Placement::Centered)
    }

    fn run_menu(
        &mut self,
        mut menu: SelectMenu,
        title: Option<&str>,
        placement: Placement,
    ) -> Result<String> {
        if !self.is_interactive() {
            return self.select_fallback(&menu, title);
        }

        let mut raw = self.raw_input()?;
        raw.hide_cursor()?;
        let mut row = 0;

        let value = loop {
            if menu.phase() != MenuPhase::AwaitingKey {
                let mut lines = Vec::new();
                if let Some(title) = title {
                    lines.push(layout::center_left(&bold(title), raw.width() as usize));
                    lines.push(String::new());
                }
                lines.extend(menu.frame(raw.width(), raw.theme()));
                row = raw.menu_row(placement, lines.len())?;
                raw.render_block(row, &lines)?;
                menu.mark_rendered();
            }

            match raw.next_event()? {
                InputEvent::Resize(_) => menu.invalidate(),
                InputEvent::Key(event) => {
                    let Some(key) = raw.keys().decode(&event) else {
                        continue;
                    };
                    // only the escape hatch works while the size warning is up
                    if raw.is_showing_warning() && key != Key::Interrupt {
                        continue;
                    }
                    if let MenuStep::Resolved(value) = menu.handle_key(key) {
                        break value;
                    }
                }
            }
        };

        debug!("Menu resolved to {:?}", value);
        match placement {
            Placement::Inline => {
                raw.render_block(row, &[])?;
                raw.settle_at(row)?;
            }
            Placement::Centered => raw.replay()?,
        }
        Ok(value)
    }

    /// First row of a menu block `len` lines tall
    fn menu_row(&mut self, placement: Placement, len: usize) -> Result<u16> {
        let height = self.height() as usize;
        match placement {
            Placement::Inline => self.reserve_rows(len.min(height) as u16),
            // title and blank line are part of the block
            Placement::Centered => {
                let row = (height.saturating_sub(len) / 2).max(2);
                Ok(row.min(height.saturating_sub(len)) as u16)
            }
        }
    }

    /// Numbered list read from cooked input
    fn select_fallback(&mut self, menu: &SelectMenu, title: Option<&str>) -> Result<String> {
        if let Some(title) = title {
            self.write(&bold(title), false)?;
            self.write("", false)?;
        }
        for (i, opt) in menu.options().iter().enumerate() {
            let line = match &opt.description {
                Some(d) => format!("{}. {} - {}", i + 1, opt.label, d),
                None => format!("{}. {}", i + 1, opt.label),
            };
            self.write(&line, false)?;
        }

        let count = menu.options().len();
        loop {
            let prompt = format!("Enter your choice (1-{}): ", count);
            let Some(answer) = self.prompt_line(&prompt)? else {
                debug!("Input closed during menu, taking escape value");
                return Ok(menu.escape_value());
            };
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(menu.options()[n - 1].value.clone()),
                _ => self.write("\u{274c} Invalid choice. Please try again.", false)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::strip_ansi;
    use crate::testsupport::{ctrl, key, piped_session, resize, session};
    use crossterm::event::KeyCode;

    fn abc() -> Vec<SelectOption> {
        vec![
            SelectOption::new("A", "a"),
            SelectOption::new("B", "b"),
            SelectOption::new("C", "c"),
        ]
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = SelectMenu::new(abc(), "home").unwrap();
        for _ in 0..3 {
            assert_eq!(menu.handle_key(Key::Down), MenuStep::Redraw);
        }
        assert_eq!(menu.selected(), 0);

        menu.handle_key(Key::Up);
        assert_eq!(menu.selected(), 2);
        menu.handle_key(Key::Char('j'));
        assert_eq!(menu.selected(), 0);
        menu.handle_key(Key::Char('k'));
        assert_eq!(menu.selected(), 2);
        assert_eq!(menu.phase(), MenuPhase::Navigating);
    }

    #[test]
    fn test_enter_resolves_once() {
        let mut menu = SelectMenu::new(abc(), "home").unwrap();
        assert_eq!(menu.phase(), MenuPhase::Rendering);
        menu.mark_rendered();
        assert_eq!(menu.phase(), MenuPhase::AwaitingKey);

        menu.handle_key(Key::Down);
        assert_eq!(menu.handle_key(Key::Enter), MenuStep::Resolved("b".to_string()));
        assert!(!menu.is_active());
        assert_eq!(menu.handle_key(Key::Down), MenuStep::Ignored);
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_escape_hatch() {
        let mut menu = SelectMenu::new(abc(), "home").unwrap();
        menu.handle_key(Key::Down);
        assert_eq!(menu.handle_key(Key::Escape), MenuStep::Resolved("a".to_string()));

        let mut options = abc();
        options.push(SelectOption::new("Home", "home"));
        let mut menu = SelectMenu::new(options, "home").unwrap();
        assert_eq!(menu.handle_key(Key::Interrupt), MenuStep::Resolved("home".to_string()));
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut menu = SelectMenu::new(abc(), "home").unwrap();
        assert_eq!(menu.handle_key(Key::Char('x')), MenuStep::Ignored);
        assert_eq!(menu.handle_key(Key::Left), MenuStep::Ignored);
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_empty_menu_rejected() {
        assert!(matches!(SelectMenu::new(vec![], "home"), Err(TermError::EmptyMenu)));

        let (mut session, handle) = session(80, 24, vec![]);
        assert!(matches!(session.prompt_select(vec![]), Err(TermError::EmptyMenu)));
        assert_eq!(handle.raw_enables(), 0);
    }

    #[test]
    fn test_frame_layout() {
        let options = vec![
            SelectOption::new("Apple", "apple"),
            SelectOption::new("Banana", "banana").with_description("yellow"),
        ];
        let menu = SelectMenu::new(options, "home").unwrap();
        // "Banana yellow" is 13 wide, box is 19, padding (80 - 19) / 2
        assert_eq!(menu.box_width(), 19);

        let lines = menu.frame(80, &Theme::default());
        let pad = " ".repeat(30);
        assert_eq!(strip_ansi(&lines[0]), format!("{}\u{276f} Apple", pad));
        assert_eq!(strip_ansi(&lines[1]), format!("{}  Banana yellow", pad));
        assert_eq!(lines[2], "");
        assert!(strip_ansi(&lines[3]).contains("Enter Select"));
    }

    #[test]
    fn test_box_width_capped() {
        let menu = SelectMenu::new(vec![SelectOption::new("x".repeat(120), "x")], "home").unwrap();
        assert_eq!(menu.box_width(), 80);
    }

    #[test]
    fn test_prompt_select_down_down_enter() {
        let events = vec![key(KeyCode::Down), key(KeyCode::Down), key(KeyCode::Enter)];
        let (mut session, handle) = session(80, 24, events);
        session.write_line("Pick one").unwrap();

        assert_eq!(session.prompt_select(abc()).unwrap(), "c");
        assert!(!handle.is_raw());
        assert_eq!(handle.raw_enables(), 1);
        // menu output is never persisted
        assert_eq!(session.content().len(), 1);
    }

    #[test]
    fn test_prompt_select_ctrl_c_takes_escape_hatch() {
        let events = vec![key(KeyCode::Down), ctrl('c')];
        let (mut session, handle) = session(80, 24, events);
        assert_eq!(session.prompt_select(abc()).unwrap(), "a");
        assert!(!handle.is_raw());
    }

    #[test]
    fn test_menu_redraws_after_resize() {
        let events = vec![key(KeyCode::Down), resize(100, 30), key(KeyCode::Enter)];
        let (mut session, handle) = session(80, 24, events);
        session.write_line("question").unwrap();
        handle.take_output();

        assert_eq!(session.prompt_select(abc()).unwrap(), "b");
        let out = handle.output();
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("  question\r\n"));
        assert_eq!(session.width(), 100);
    }

    #[test]
    fn test_keys_ignored_while_too_small() {
        let events = vec![
            resize(50, 15),
            key(KeyCode::Down),
            key(KeyCode::Enter),
            resize(80, 24),
            key(KeyCode::Enter),
        ];
        let (mut session, _handle) = session(80, 24, events);
        assert_eq!(session.prompt_select(abc()).unwrap(), "a");
    }

    #[test]
    fn test_show_select_menu_centers_message() {
        let events = vec![key(KeyCode::Up), key(KeyCode::Enter)];
        let (mut session, handle) = session(80, 24, events);
        session.write_line("old").unwrap();

        assert_eq!(session.show_select_menu("Main menu", abc()).unwrap(), "c");
        assert!(handle.output().contains("Main menu"));
        assert!(session.content().is_empty());
    }

    #[test]
    fn test_input_closed_releases_raw_mode() {
        let (mut session, handle) = session(80, 24, vec![key(KeyCode::Down)]);
        assert!(matches!(session.prompt_select(abc()), Err(TermError::InputClosed)));
        assert!(!handle.is_raw());
    }

    #[test]
    fn test_fallback_numbered_choice() {
        let (mut session, handle) = piped_session(vec!["x", "5", "2"]);
        assert_eq!(session.prompt_select(abc()).unwrap(), "b");
        let out = handle.output();
        assert!(out.contains("1. A"));
        assert!(out.contains("Enter your choice (1-3): "));
        assert_eq!(out.matches("Invalid choice").count(), 2);
        assert_eq!(handle.raw_enables(), 0);
    }

    #[test]
    fn test_fallback_end_of_input() {
        let (mut session, _handle) = piped_session::<String>(vec![]);
        let mut options = abc();
        options.push(SelectOption::new("Home", "home"));
        assert_eq!(session.prompt_select(options).unwrap(), "home");
    }

    #[test]
    fn test_inline_menu_scrolls_instead_of_overlapping() {
        let (mut session, handle) = session(80, 24, vec![key(KeyCode::Enter)]);
        for i in 0..20 {
            session.write_line(&format!("line {}", i)).unwrap();
        }
        handle.take_output();

        assert_eq!(session.prompt_select(abc()).unwrap(), "a");
        let out = handle.output();
        // five rows needed below row 20: one line scrolls away first
        assert!(out.starts_with("\x1b[?25l\x1b[24;1H\r\n\x1b[20;1H\x1b[J"));
        assert_eq!(session.cursor_row(), 19);

        session.write_line("after").unwrap();
        assert!(handle.output().ends_with("\x1b[20;1H  after\r\n"));
        assert_eq!(session.cursor_row(), 20);
    }

    #[test]
    fn test_inline_menu_with_room_stays_put() {
        let (mut session, handle) = session(80, 24, vec![key(KeyCode::Enter)]);
        session.write_line("question").unwrap();
        handle.take_output();

        session.prompt_select(abc()).unwrap();
        assert!(handle.output().starts_with("\x1b[?25l\x1b[2;1H\x1b[J"));
        assert_eq!(session.cursor_row(), 1);
    }
}
