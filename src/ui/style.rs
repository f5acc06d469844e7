//! Styled text helpers.
//!
//! These produce strings with embedded SGR sequences so styled text can flow
//! through the session's wrap/pad pipeline like any other line.

use crossterm::style::{Attribute, Stylize};

use crate::config::Color;

/// Foreground color
pub fn paint(text: &str, color: Color) -> String {
    text.with(color.to_crossterm()).to_string()
}

/// Foreground color plus bold
pub fn paint_bold(text: &str, color: Color) -> String {
    text.with(color.to_crossterm())
        .attribute(Attribute::Bold)
        .to_string()
}

pub fn bold(text: &str) -> String {
    text.attribute(Attribute::Bold).to_string()
}

pub fn dim(text: &str) -> String {
    text.attribute(Attribute::Dim).to_string()
}
