//! questterm - a resize-aware terminal session engine
//!
//! questterm owns the terminal for an interactive command-line program. It
//! lays text out in a centered content column, remembers what was written so
//! it can reflow everything when the window is resized, refuses to draw below
//! a minimum size, and provides two raw-keyboard widgets: a single-choice
//! menu and a multi-line text editor.
//!
//! # Quick Start
//!
//! ```no_run
//! use questterm::{Config, SelectOption, TerminalSession};
//!
//! # fn main() -> questterm::Result<()> {
//! let mut session = TerminalSession::stdout(Config::load())?;
//! session.wait_for_valid_size()?;
//! session.write_header(Some("Welcome"))?;
//! session.write_line("Pick something to do.")?;
//!
//! let choice = session.prompt_select(vec![
//!     SelectOption::new("Write an answer", "answer"),
//!     SelectOption::new("Quit", "home"),
//! ])?;
//! if choice == "answer" {
//!     let text = session.prompt_multiline_text()?;
//!     session.write_line(&text)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Keys
//!
//! | Widget | Key | Action |
//! |--------|-----|--------|
//! | menu | ↑/↓, k/j | Move highlight (wraps) |
//! | menu | Enter | Choose |
//! | menu | Esc, Ctrl+C | Fallback option |
//! | editor | Enter | New row |
//! | editor | Ctrl+S | Submit (configurable) |
//! | editor | Ctrl+C | Exit the program |

pub mod config;
pub mod core;
#[cfg(test)]
pub mod testsupport;
pub mod ui;

pub use crate::config::{Config, Theme};
pub use crate::core::buffer::ContentLine;
pub use crate::core::layout::LayoutMetrics;
pub use crate::core::screens::ScreenStack;
pub use crate::core::size::Dimensions;
pub use crate::core::{InputEvent, RawInput, Result, TermError, TerminalSession};
pub use crate::ui::select::SelectOption;
