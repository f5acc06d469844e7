//! Core terminal session components.
//!
//! - **backend**: access to the physical terminal (crossterm) behind a trait
//! - **size**: size probing and resize tracking
//! - **layout**: content column metrics, wrapping and centering
//! - **buffer**: persisted lines replayed after a resize
//! - **session**: the session tying these together
//! - **screens**: named content snapshots
//!
//! # Architecture
//!
//! ```text
//! TerminalSession
//! ├── Backend (output, events, raw mode)
//! ├── SizeProbe -> LayoutMetrics
//! └── ContentBuffer (replayed on reflow)
//! ```

pub mod backend;
pub mod buffer;
pub mod error;
pub mod layout;
pub mod screens;
pub mod session;
pub mod size;

pub use error::{Result, TermError};
pub use session::{InputEvent, RawInput, TerminalSession};
