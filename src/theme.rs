//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::shape::{self, ColorToken};
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// UI colours plus the terminal colour for every stone colour token.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Stone colour per shape colour token.
    stones: HashMap<ColorToken, Color>,
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (controls help).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

/// Saturated replacements, catalog order (I, J, L, T, S, Z, O).
const HIGH_CONTRAST: [&str; 7] = [
    "#FF0000", "#FF8800", "#FFFF00", "#FF00FF", "#00FFFF", "#00FF00", "#FFFFFF",
];
const COLORBLIND: [&str; 7] = [
    "#0077BB", "#EE7733", "#BBBB00", "#EE3377", "#33BBEE", "#009988", "#BBBBBB",
];

impl Theme {
    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Keys: `main_bg`, `div_line`, `main_fg`, `title`, `inactive_fg` and `piece_<name>`
    /// (e.g. `piece_T`). Missing keys keep the defaults; no path means all defaults.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            None => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override stone colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        let table = match palette {
            crate::Palette::Normal => return,
            crate::Palette::HighContrast => &HIGH_CONTRAST,
            crate::Palette::Colorblind => &COLORBLIND,
        };
        for (shape, hex) in shape::catalog().iter().zip(table) {
            if let Ok(color) = parse_hex(hex) {
                self.stones.insert(shape.color, color);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let stones = shape::catalog()
            .iter()
            .map(|s| {
                let color = get(&format!("piece_{}", s.name))
                    .or_else(|| parse_hex(s.color).ok())
                    .unwrap_or(Color::White);
                (s.color, color)
            })
            .collect();
        Self {
            stones,
            bg: get("main_bg").unwrap_or(Color::Rgb(0x28, 0x2C, 0x34)),
            div_line: get("div_line").unwrap_or(Color::Rgb(0x3F, 0x44, 0x4F)),
            main_fg: get("main_fg").unwrap_or(Color::Rgb(0xAB, 0xB2, 0xBF)),
            title: get("title").unwrap_or(Color::Rgb(0xE5, 0xC0, 0x7B)),
            inactive_fg: get("inactive_fg").unwrap_or(Color::Rgb(0x5C, 0x63, 0x70)),
        }
    }

    /// Terminal colour for a stone; tokens outside the catalog are read as hex.
    pub fn stone_color(&self, token: ColorToken) -> Color {
        self.stones
            .get(token)
            .copied()
            .or_else(|| parse_hex(token).ok())
            .unwrap_or(self.main_fg)
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
