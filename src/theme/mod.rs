//! Theming for the dashboard

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,

    // UI elements
    pub border: Color,
}

impl Theme {
    /// Look up a built-in theme by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tokyo night" | "tokyo-night" | "tokyonight" => Some(Theme::tokyo_night()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}
