//! Key decoding for the interactive widgets
//!
//! Converts crossterm key events into the small [`Key`] vocabulary the
//! widget state machines understand.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// A decoded keypress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    /// Ctrl+C
    Interrupt,
    /// The configured submit chord
    Submit,
    /// Printable character
    Char(char),
    /// Anything else (function keys, unbound chords)
    Other,
}

/// A modifier + character chord such as Ctrl+S
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub ch: char,
}

impl Default for Chord {
    fn default() -> Self {
        Self {
            modifiers: Modifiers::CTRL,
            ch: 's',
        }
    }
}

impl Chord {
    /// Parse strings like "ctrl+s", "Ctrl+Alt+D". Requires at least one modifier.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = Modifiers::empty();
        let mut ch = None;
        for part in s.split('+').map(|p| p.trim().to_lowercase()) {
            match part.as_str() {
                "ctrl" | "control" => modifiers |= Modifiers::CTRL,
                "alt" | "meta" => modifiers |= Modifiers::ALT,
                "shift" => modifiers |= Modifiers::SHIFT,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) if ch.is_none() => ch = Some(c),
                        _ => return None,
                    }
                }
            }
        }
        // Ctrl+C is reserved for interrupt
        match ch {
            Some(c) if !modifiers.is_empty() && !(modifiers == Modifiers::CTRL && c == 'c') => {
                Some(Self { modifiers, ch: c })
            }
            _ => None,
        }
    }

    /// Human readable label, e.g. "Ctrl+S"
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.contains(Modifiers::CTRL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(Modifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        parts.push(self.ch.to_ascii_uppercase().to_string());
        parts.join("+")
    }

    fn matches(&self, ch: char, mods: Modifiers) -> bool {
        // Shift is implied by the case of the character for letters
        let mods = if self.modifiers.contains(Modifiers::SHIFT) {
            mods
        } else {
            mods - Modifiers::SHIFT
        };
        mods == self.modifiers && ch.to_ascii_lowercase() == self.ch
    }
}

/// Key mapper for converting key events to widget keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMapper {
    submit: Chord,
}

impl KeyMapper {
    pub fn new(submit: Chord) -> Self {
        Self { submit }
    }

    pub fn submit_chord(&self) -> Chord {
        self.submit
    }

    /// Map a crossterm KeyEvent. Release events produce `None`.
    pub fn decode(&self, event: &KeyEvent) -> Option<Key> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let mods = Modifiers::from(event.modifiers);

        let key = match event.code {
            KeyCode::Char(ch) => self.map_char(ch, mods),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Other,
        };
        Some(key)
    }

    /// Map a character with modifiers
    fn map_char(&self, ch: char, mods: Modifiers) -> Key {
        if mods.contains(Modifiers::CTRL) && !mods.contains(Modifiers::ALT) && ch.eq_ignore_ascii_case(&'c') {
            return Key::Interrupt;
        }
        if self.submit.matches(ch, mods) {
            return Key::Submit;
        }
        if mods.intersects(Modifiers::CTRL | Modifiers::ALT) || ch.is_control() {
            return Key::Other;
        }
        Key::Char(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let mapper = KeyMapper::default();

        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(mapper.decode(&event), Some(Key::Char('a')));

        let event = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(mapper.decode(&event), Some(Key::Char('A')));

        // Ctrl+C is always an interrupt
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(mapper.decode(&event), Some(Key::Interrupt));

        // Alt+x is not text
        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(mapper.decode(&event), Some(Key::Other));
    }

    #[test]
    fn test_submit_chord() {
        let mapper = KeyMapper::default();
        let event = key_event(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(mapper.decode(&event), Some(Key::Submit));

        let mapper = KeyMapper::new(Chord::parse("ctrl+d").unwrap());
        let event = key_event(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(mapper.decode(&event), Some(Key::Other));
        let event = key_event(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(mapper.decode(&event), Some(Key::Submit));
    }

    #[test]
    fn test_navigation_keys() {
        let mapper = KeyMapper::default();
        assert_eq!(mapper.decode(&key_event(KeyCode::Up, KeyModifiers::NONE)), Some(Key::Up));
        assert_eq!(mapper.decode(&key_event(KeyCode::End, KeyModifiers::NONE)), Some(Key::End));
        assert_eq!(mapper.decode(&key_event(KeyCode::Esc, KeyModifiers::NONE)), Some(Key::Escape));
        assert_eq!(mapper.decode(&key_event(KeyCode::F(5), KeyModifiers::NONE)), Some(Key::Other));
    }

    #[test]
    fn test_release_events_dropped() {
        let mapper = KeyMapper::default();
        let mut event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(mapper.decode(&event), None);
    }

    #[test]
    fn test_chord_parse() {
        assert_eq!(Chord::parse("ctrl+s"), Some(Chord::default()));
        assert_eq!(
            Chord::parse("Ctrl+Alt+D"),
            Some(Chord { modifiers: Modifiers::CTRL | Modifiers::ALT, ch: 'd' })
        );
        assert_eq!(Chord::parse("s"), None);
        assert_eq!(Chord::parse("ctrl+c"), None);
        assert_eq!(Chord::parse("ctrl+enter"), None);
        assert_eq!(Chord::default().label(), "Ctrl+S");
    }
}
