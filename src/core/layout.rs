//! Layout engine: content width, centering and word wrap.
//!
//! All functions here are pure. Widths are measured in terminal cells:
//! ANSI escape sequences count as zero, codepoints outside the basic
//! multilingual plane (emoji) count as two, everything else uses
//! `unicode-width`.
//!
//! ```text
//! |<-- left_padding -->|<------ content_width ------>|
//! ```

use unicode_width::UnicodeWidthChar;

/// Default cap on the content column
pub const MAX_CONTENT_WIDTH: u16 = 100;
/// Columns reserved around the content column
pub const SIDE_MARGIN: u16 = 4;

/// Derived placement of the content column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub content_width: u16,
    pub left_padding: u16,
}

impl LayoutMetrics {
    /// content_width = min(max_content, width - margin), left_padding centers it
    pub fn compute(width: u16, max_content: u16, margin: u16) -> Self {
        let width = width.max(1);
        let content_width = max_content.min(width.saturating_sub(margin)).max(1);
        let left_padding = (width - content_width.min(width)) / 2;
        Self {
            content_width,
            left_padding,
        }
    }

    /// Metrics with the default cap and margin
    pub fn for_width(width: u16) -> Self {
        Self::compute(width, MAX_CONTENT_WIDTH, SIDE_MARGIN)
    }

    /// Wrap a line to the content column and prefix each piece with the padding
    pub fn place(&self, line: &str) -> Vec<String> {
        let pad = " ".repeat(self.left_padding as usize);
        wrap(line, self.content_width as usize)
            .into_iter()
            .map(|piece| format!("{}{}", pad, piece))
            .collect()
    }
}

/// Cell width of a single character
pub fn char_width(ch: char) -> usize {
    if ch as u32 > 0xFFFF {
        2
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }
}

/// Remove ANSI escape sequences (CSI, OSC and two-byte escapes)
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            // CSI: parameters then a final byte in 0x40..=0x7E
            Some('[') => {
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: terminated by BEL or ESC \
            Some(']') => {
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Visible width of text in terminal cells
pub fn visible_width(text: &str) -> usize {
    strip_ansi(text).chars().map(char_width).sum()
}

/// Greedy word wrap.
///
/// Lines that already fit are returned untouched. Longer lines are split on
/// spaces; runs of spaces collapse to one. A single word wider than `width`
/// is emitted on its own line without being split, so escape sequences and
/// emoji are never cut in half.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if visible_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ').filter(|w| !w.is_empty()) {
        let word_width = visible_width(word);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            wrapped.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// Center text in a field of `width` cells.
///
/// Leading pad is floor((width - visible)/2); the remainder goes on the right
/// so plain text fills the field exactly. Never truncates; text wider than the
/// field comes back unchanged. Color codes are kept but do not count.
pub fn center(text: &str, width: usize) -> String {
    let visible = visible_width(text);
    let slack = width.saturating_sub(visible);
    let left = slack / 2;
    let right = slack - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Left pad only, for centering against a wider field without trailing spaces
pub fn center_left(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(line: &str) -> String {
        line.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_metrics_80x24() {
        let m = LayoutMetrics::for_width(80);
        assert_eq!(m.content_width, 76);
        assert_eq!(m.left_padding, 2);
    }

    #[test]
    fn test_metrics_wide_terminal_caps_content() {
        let m = LayoutMetrics::for_width(200);
        assert_eq!(m.content_width, 100);
        assert_eq!(m.left_padding, 50);

        let m = LayoutMetrics::for_width(105);
        assert_eq!(m.content_width, 100);
        assert_eq!(m.left_padding, 2);
    }

    #[test]
    fn test_metrics_tiny_terminal() {
        let m = LayoutMetrics::for_width(3);
        assert_eq!(m.content_width, 1);
        assert_eq!(m.left_padding, 1);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[1m\x1b[36mhello\x1b[0m"), "hello");
        assert_eq!(strip_ansi("\x1b[38;2;255;0;0mred\x1b[39m"), "red");
        assert_eq!(strip_ansi("\x1b]0;title\x07text"), "text");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_visible_width() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width("\x1b[1mhello\x1b[0m"), 5);
        assert_eq!(visible_width("🎯 go"), 5);
        assert_eq!(visible_width("日本"), 4);
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap("hello  world", 76), vec!["hello  world".to_string()]);
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_wrap_greedy() {
        let wrapped = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            wrapped,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
    }

    #[test]
    fn test_wrap_long_word_passes_through() {
        let wrapped = wrap("a supercalifragilistic b", 8);
        assert_eq!(wrapped, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_ignores_escape_codes_when_measuring() {
        let line = "\x1b[1mbold\x1b[0m words here";
        // Visible width is 15
        assert_eq!(wrap(line, 15), vec![line.to_string()]);
        let wrapped = wrap(line, 10);
        assert_eq!(wrapped.len(), 2);
        assert_eq!(strip_ansi(&wrapped[0]), "bold words");
    }

    #[test]
    fn test_wrap_properties_across_widths() {
        let samples = [
            "lorem ipsum dolor sit amet consectetur adipiscing elit sed do",
            "one  two   three    four five six seven eight nine ten",
            "emoji 🎯 heavy 🚀 text 🔥 with 🎮 some 🟢 icons",
            "x",
            "averyveryverylongtokenwithoutspaces and more",
        ];
        for line in samples {
            for width in 1..=40 {
                let wrapped = wrap(line, width);
                for piece in &wrapped {
                    let is_single_word = !piece.contains(' ');
                    assert!(
                        visible_width(piece) <= width || is_single_word,
                        "{:?} too wide at {}",
                        piece,
                        width
                    );
                }
                if visible_width(line) > width {
                    assert_eq!(wrapped.join(" "), normalize(line));
                }
            }
        }
    }

    #[test]
    fn test_center_fills_field() {
        for width in 0..30usize {
            for text in ["", "a", "hello", "centered text"] {
                if text.len() > width {
                    continue;
                }
                let result = center(text, width);
                let leading = result.len() - result.trim_start().len();
                if !text.is_empty() {
                    assert_eq!(leading, (width - text.len()) / 2);
                }
                assert_eq!(result.len(), width);
            }
        }
    }

    #[test]
    fn test_center_never_truncates() {
        assert_eq!(center("too long", 4), "too long");
        assert_eq!(center_left("too long", 4), "too long");
    }

    #[test]
    fn test_center_keeps_color_codes_out_of_padding() {
        let colored = "\x1b[36mhi\x1b[0m";
        let result = center_left(colored, 10);
        assert_eq!(result, format!("    {}", colored));
    }
}
