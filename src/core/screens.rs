//! Named screens
//!
//! A screen is a named snapshot of the session's persisted content. Starting
//! a new screen stashes the current one so it can be brought back later.

use std::collections::HashMap;

use tracing::debug;

use super::buffer::ContentLine;
use super::error::Result;
use super::session::TerminalSession;

#[derive(Debug, Default)]
pub struct ScreenStack {
    saved: HashMap<String, Vec<ContentLine>>,
    current: Option<String>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the active screen
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains_key(id)
    }

    /// Stash the active screen, then start `id` with empty content
    pub fn begin_screen(&mut self, session: &mut TerminalSession, id: &str) {
        self.save_current_screen(session);
        debug!("Begin screen {}", id);
        self.current = Some(id.to_string());
        session.clear_content();
    }

    /// Leave the active screen and drop its snapshot
    pub fn end_screen(&mut self) {
        if let Some(id) = self.current.take() {
            debug!("End screen {}", id);
            self.saved.remove(&id);
        }
    }

    /// Snapshot the active screen's content
    pub fn save_current_screen(&mut self, session: &TerminalSession) {
        if let Some(id) = &self.current {
            self.saved.insert(id.clone(), session.content());
        }
    }

    /// Make `id` active and redraw its snapshot. `Ok(false)` if unknown.
    pub fn restore_screen(&mut self, session: &mut TerminalSession, id: &str) -> Result<bool> {
        let Some(content) = self.saved.get(id) else {
            return Ok(false);
        };
        debug!("Restore screen {} ({} lines)", id, content.len());
        session.restore_content(content.clone())?;
        self.current = Some(id.to_string());
        Ok(true)
    }

    /// Redraw the active screen from the session's content
    pub fn refresh_current_screen(&self, session: &mut TerminalSession) -> Result<()> {
        if self.current.is_some() {
            let content = session.content();
            session.restore_content(content)?;
        }
        Ok(())
    }
}
