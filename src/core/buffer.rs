//! Persistent content log replayed on reflow.

/// One logical line written through the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub text: String,
    pub persist: bool,
}

impl ContentLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persist: true,
        }
    }
}

/// Ordered log of persisted lines. Insertion order is render order.
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    lines: Vec<ContentLine>,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Lines not flagged persistent are dropped.
    pub fn push(&mut self, line: ContentLine) {
        if line.persist {
            self.lines.push(line);
        }
    }

    pub fn push_text(&mut self, text: &str) {
        self.push(ContentLine::new(text));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[ContentLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Copy of the current lines
    pub fn snapshot(&self) -> Vec<ContentLine> {
        self.lines.clone()
    }

    /// Replace the whole log
    pub fn replace(&mut self, lines: Vec<ContentLine>) {
        self.lines = lines.into_iter().filter(|l| l.persist).collect();
    }
}
