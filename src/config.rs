//! Configuration and color theme management for questterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.questterm/config.toml`
//! - Built-in color themes (default, nord, dracula, gruvbox-dark, tokyo-night)
//! - Per-color overrides in `#rrggbb` form
//!
//! # Configuration File
//!
//! ```toml
//! # Theme: default, nord, dracula, gruvbox-dark, tokyo-night
//! theme = "tokyo-night"
//!
//! # Chord that submits the multi-line editor
//! submit_key = "ctrl+s"
//!
//! # Menu value chosen on Esc / Ctrl+C (first option if absent)
//! fallback_value = "home"
//!
//! [layout]
//! max_content_width = 100
//! side_margin = 4
//! min_width = 60
//! min_height = 20
//!
//! [colors]
//! accent = "#7aa2f7"
//! ```

use std::fs;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::core::layout::{MAX_CONTENT_WIDTH, SIDE_MARGIN};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name
    pub theme: String,
    /// Editor submit chord, e.g. "ctrl+s"
    pub submit_key: String,
    /// Menu value used by the escape hatch
    pub fallback_value: String,
    /// Layout settings
    pub layout: LayoutConfig,
    /// Color overrides
    pub colors: ColorOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            submit_key: "ctrl+s".to_string(),
            fallback_value: "home".to_string(),
            layout: LayoutConfig::default(),
            colors: ColorOverrides::default(),
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub max_content_width: u16,
    pub side_margin: u16,
    pub min_width: u16,
    pub min_height: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_content_width: MAX_CONTENT_WIDTH,
            side_margin: SIDE_MARGIN,
            min_width: 60,
            min_height: 20,
        }
    }
}

/// Optional hex overrides applied on top of the theme
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    pub accent: Option<String>,
    pub muted: Option<String>,
    pub warning: Option<String>,
    pub title: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    match Self::from_toml_str(&content) {
                        Ok(config) => return config,
                        Err(e) => tracing::warn!("Ignoring malformed {}: {}", path.display(), e),
                    }
                }
            }
        }
        Self::default()
    }

    /// Parse configuration text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Log file path next to the config file
    pub fn log_path() -> PathBuf {
        config_dir()
            .map(|dir| dir.join("questterm.log"))
            .unwrap_or_else(|| PathBuf::from("questterm.log"))
    }

    /// Resolve the theme with overrides applied
    pub fn theme(&self) -> Theme {
        let mut theme = Theme::by_name(&self.theme);
        let apply = |slot: &mut Color, value: &Option<String>| {
            if let Some(color) = value.as_deref().and_then(Color::from_hex) {
                *slot = color;
            }
        };
        apply(&mut theme.accent, &self.colors.accent);
        apply(&mut theme.muted, &self.colors.muted);
        apply(&mut theme.warning, &self.colors.warning);
        apply(&mut theme.title, &self.colors.title);
        theme
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Theme definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    /// Selected menu row
    pub accent: Color,
    /// Menu descriptions and hints
    pub muted: Color,
    /// Size warning banner
    pub warning: Color,
    /// Headers and menu titles
    pub title: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Default theme
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::new(0, 205, 205),
            muted: Color::new(128, 128, 128),
            warning: Color::new(230, 180, 0),
            title: Color::new(255, 255, 255),
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::new(136, 192, 208),
            muted: Color::new(76, 86, 106),
            warning: Color::new(235, 203, 139),
            title: Color::new(236, 239, 244),
        }
    }

    /// Dracula theme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            accent: Color::new(189, 147, 249),
            muted: Color::new(98, 114, 164),
            warning: Color::new(255, 184, 108),
            title: Color::new(248, 248, 242),
        }
    }

    /// Gruvbox Dark theme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            accent: Color::new(215, 153, 33),
            muted: Color::new(146, 131, 116),
            warning: Color::new(251, 73, 52),
            title: Color::new(235, 219, 178),
        }
    }

    /// Tokyo Night theme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night".to_string(),
            accent: Color::new(122, 162, 247),
            muted: Color::new(86, 95, 137),
            warning: Color::new(224, 175, 104),
            title: Color::new(192, 202, 245),
        }
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            "gruvbox-dark" | "gruvbox_dark" | "gruvbox" => Self::gruvbox_dark(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            _ => Self::default_theme(),
        }
    }

    /// List available themes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "nord", "dracula", "gruvbox-dark", "tokyo-night"]
    }
}

/// `~/.questterm`, created on first use
fn config_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".questterm");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.theme, "default");
        assert_eq!(config.submit_key, "ctrl+s");
        assert_eq!(config.fallback_value, "home");
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_partial_layout_section() {
        let config = Config::from_toml_str(
            r#"
            theme = "nord"

            [layout]
            min_width = 70
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.min_width, 70);
        assert_eq!(config.layout.min_height, 20);
        assert_eq!(config.layout.max_content_width, 100);
        assert_eq!(config.theme().name, "nord");
    }

    #[test]
    fn test_color_overrides() {
        let config = Config::from_toml_str(
            r##"
            [colors]
            accent = "#ff0080"
            muted = "not-a-color"
            "##,
        )
        .unwrap();
        let theme = config.theme();
        assert_eq!(theme.accent, Color::new(255, 0, 128));
        assert_eq!(theme.muted, Theme::default_theme().muted);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#7aa2f7"), Some(Color::new(122, 162, 247)));
        assert_eq!(Color::from_hex("000000"), Some(Color::new(0, 0, 0)));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(Theme::by_name("neon").name, "default");
        assert_eq!(Theme::by_name("Tokyo-Night").name, "tokyo-night");
        assert_eq!(Theme::list().len(), 5);
    }
}
