//! Terminal size probing.
//!
//! `SizeProbe` answers "how big is the terminal right now" and turns
//! resize events coming out of the backend into fresh [`Dimensions`].
//! When the output is not an interactive terminal there is nothing to
//! probe, so a fixed 80x24 default is used and resize events are ignored.

use crossterm::event::Event;

use super::backend::Backend;

/// Width used when the size cannot be probed
pub const DEFAULT_WIDTH: u16 = 80;
/// Height used when the size cannot be probed
pub const DEFAULT_HEIGHT: u16 = 24;

/// Terminal size in character cells. Both sides are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Dimensions {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Check against a minimum size
    pub fn fits(&self, min_width: u16, min_height: u16) -> bool {
        self.width >= min_width && self.height >= min_height
    }
}

/// Reads the current terminal size and tracks resize events
#[derive(Debug, Clone)]
pub struct SizeProbe {
    current: Dimensions,
    available: bool,
}

impl SizeProbe {
    /// Probe the backend once. Falls back to 80x24 when no size is reported.
    pub fn detect(backend: &dyn Backend) -> Self {
        match backend.size() {
            Some((cols, rows)) if cols > 0 && rows > 0 => Self {
                current: Dimensions::new(cols, rows),
                available: true,
            },
            _ => Self {
                current: Dimensions::default(),
                available: false,
            },
        }
    }

    pub fn current(&self) -> Dimensions {
        self.current
    }

    /// Whether resize events are honoured
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Feed an input event. Returns the new size for every resize event,
    /// including ones that report the size we already had.
    pub fn observe(&mut self, event: &Event) -> Option<Dimensions> {
        if !self.available {
            return None;
        }
        match event {
            Event::Resize(cols, rows) => {
                self.current = Dimensions::new(*cols, *rows);
                Some(self.current)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptedBackend;

    #[test]
    fn test_detect_reports_backend_size() {
        let (backend, _handle) = ScriptedBackend::new(120, 40);
        let probe = SizeProbe::detect(&backend);
        assert!(probe.is_available());
        assert_eq!(probe.current(), Dimensions::new(120, 40));
    }

    #[test]
    fn test_detect_falls_back_without_tty() {
        let (backend, _handle) = ScriptedBackend::non_interactive();
        let mut probe = SizeProbe::detect(&backend);
        assert!(!probe.is_available());
        assert_eq!(probe.current(), Dimensions::new(80, 24));

        // Resize events are ignored when reflow is disabled
        assert_eq!(probe.observe(&Event::Resize(100, 50)), None);
        assert_eq!(probe.current(), Dimensions::new(80, 24));
    }

    #[test]
    fn test_observe_resize() {
        let (backend, _handle) = ScriptedBackend::new(80, 24);
        let mut probe = SizeProbe::detect(&backend);
        assert_eq!(probe.observe(&Event::Resize(50, 15)), Some(Dimensions::new(50, 15)));
        assert_eq!(probe.observe(&Event::Resize(50, 15)), Some(Dimensions::new(50, 15)));
        assert_eq!(probe.observe(&Event::FocusGained), None);
    }

    #[test]
    fn test_dimensions_never_zero() {
        let dims = Dimensions::new(0, 0);
        assert_eq!(dims.width, 1);
        assert_eq!(dims.height, 1);
        assert!(!dims.fits(60, 20));
        assert!(Dimensions::new(60, 20).fits(60, 20));
    }
}
