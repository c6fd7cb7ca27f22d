use std::fs;
use std::path::Path;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

/// Built once at startup and only ever lent out by reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dim: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub selection_bg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in `<config_dir>/powerhell/themes/` win over bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_dir = config_dir.join("powerhell").join("themes");
            if let Some(theme) = Self::load_from_dir(&user_dir, name) {
                return Some(theme);
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn load_from_dir(dir: &Path, name: &str) -> Option<Self> {
        let content = fs::read_to_string(dir.join(format!("{name}.toml"))).ok()?;
        toml::from_str::<Theme>(&content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("powerhell").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#012456".to_string(),
            fg: "#eeedf0".to_string(),
            text_dim: "#8a93a8".to_string(),
            accent: "#f9f1a5".to_string(),
            accent_dim: "#3a5a8c".to_string(),
            border: "#3a5a8c".to_string(),
            border_focused: "#f9f1a5".to_string(),
            header_bg: "#0b3470".to_string(),
            header_fg: "#eeedf0".to_string(),
            selection_bg: "#1f4f96".to_string(),
            bar_filled: "#3fb950".to_string(),
            bar_empty: "#0b3470".to_string(),
            error: "#ff6b6b".to_string(),
            warning: "#ffb347".to_string(),
            success: "#3fb950".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && hex.is_ascii()
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn selection_bg(&self) -> Color { Self::parse_color(&self.selection_bg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.iter().any(|n| n == "powerhell"));
        for name in names {
            assert!(Theme::load(&name).is_some(), "{name}");
        }
    }

    #[test]
    fn unknown_theme_is_none() {
        assert!(Theme::load("no-such-theme").is_none());
    }

    #[test]
    fn user_dir_theme_loads() {
        let dir = TempDir::new().unwrap();
        let theme = Theme {
            name: "mine".to_string(),
            colors: ThemeColors::default(),
        };
        fs::write(dir.path().join("mine.toml"), toml::to_string(&theme).unwrap()).unwrap();
        let loaded = Theme::load_from_dir(dir.path(), "mine").unwrap();
        assert_eq!(loaded.name, "mine");
    }

    #[test]
    fn parse_color_falls_back_to_white() {
        assert_eq!(ThemeColors::parse_color("#0a0b0c"), Color::Rgb(10, 11, 12));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
        assert_eq!(ThemeColors::parse_color("#aééb"), Color::White);
    }
}
