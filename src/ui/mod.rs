//! Interactive widgets and input handling.
//!
//! - **keys**: crossterm key events to widget keys
//! - **style**: colored / bold / dim text
//! - **select**: single-choice menu
//! - **editor**: multi-line text editor
//! - **external**: answers written in `$VISUAL` / `$EDITOR`
//! - **input**: line prompts and non-interactive fallbacks
//!
//! Widgets are state machines fed one [`keys::Key`] at a time; the drivers
//! on [`crate::core::TerminalSession`] own raw mode for the duration of one
//! interaction.

pub mod editor;
pub mod external;
pub mod input;
pub mod keys;
pub mod select;
pub mod style;

pub use editor::{EditStep, LineEditor};
pub use keys::{Chord, Key, KeyMapper, Modifiers};
pub use select::{MenuPhase, MenuStep, SelectMenu, SelectOption};
