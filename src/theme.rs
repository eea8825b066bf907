//! Theme loading: btop-style `theme[key]="value"` files with hex colours.

use crate::Palette;
use crate::matrix::BlockColor;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

// One Dark (onedark.theme).
const ONEDARK_RED: Color = Color::from_u32(0x00E0_6C75);
const ONEDARK_GREEN: Color = Color::from_u32(0x0098_C379);
const ONEDARK_BLUE: Color = Color::from_u32(0x0061_AFEF);
const ONEDARK_YELLOW: Color = Color::from_u32(0x00E5_C07B);
const ONEDARK_BG: Color = Color::from_u32(0x0031_353F);
const ONEDARK_DIV: Color = Color::from_u32(0x003F_444F);
const ONEDARK_FG: Color = Color::from_u32(0x00AB_B2BF);
const ONEDARK_INACTIVE: Color = Color::from_u32(0x005C_6370);

/// Block and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Block colours, in `BlockColor::palette_index` order: red, green, blue, yellow.
    pub blocks: [Color; 4],
    /// Board and popup background.
    pub bg: Color,
    /// Grid dots and borders.
    pub div_line: Color,
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text, dropped slots.
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
        Self {
            blocks: [ONEDARK_RED, ONEDARK_GREEN, ONEDARK_BLUE, ONEDARK_YELLOW],
            bg: ONEDARK_BG,
            div_line: ONEDARK_DIV,
            main_fg: ONEDARK_FG,
            title: ONEDARK_YELLOW,
            inactive_fg: ONEDARK_INACTIVE,
        }
    }
}

impl Theme {
    /// Load a theme file, then apply `palette` on top.
    /// One Dark when `path` is None or does not exist.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override block colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.blocks = [
                    Color::from_u32(0x00FF_0000),
                    Color::from_u32(0x0000_FF00),
                    Color::from_u32(0x0000_88FF),
                    Color::from_u32(0x00FF_FF00),
                ];
            }
            Palette::Colorblind => {
                // Red/green pair replaced by orange/teal
                self.blocks = [
                    Color::from_u32(0x00EE_7733),
                    Color::from_u32(0x0000_9988),
                    Color::from_u32(0x0000_77BB),
                    Color::from_u32(0x00BB_BB00),
                ];
            }
        }
    }

    /// First key in `keys` with a valid colour wins; otherwise the One Dark value.
    fn from_map(map: &HashMap<String, String>) -> Self {
        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(|v| parse_hex(v).ok()))
                .unwrap_or(fallback)
        };
        Self {
            blocks: [
                pick(&["cpu_end", "temp_end"], ONEDARK_RED),
                pick(&["mem_box", "cpu_start"], ONEDARK_GREEN),
                pick(&["cpu_box"], ONEDARK_BLUE),
                pick(&["cpu_mid", "title"], ONEDARK_YELLOW),
            ],
            bg: pick(&["meter_bg", "main_bg"], ONEDARK_BG),
            div_line: pick(&["div_line"], ONEDARK_DIV),
            main_fg: pick(&["main_fg"], ONEDARK_FG),
            title: pick(&["title"], ONEDARK_YELLOW),
            inactive_fg: pick(&["inactive_fg"], ONEDARK_INACTIVE),
        }
    }

    /// Screen colour of a block; background for empty cells.
    #[inline]
    pub fn block_color(&self, color: BlockColor) -> Color {
        match color.palette_index() {
            Some(i) => self.blocks[i],
            None if color == BlockColor::Marker => self.inactive_fg,
            None => self.bg,
        }
    }
}

/// `theme[key]="value"` (or single-quoted) lines into a key -> value map.
/// Blank lines, comments and anything else are skipped.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    s.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("theme[")?;
            let (key, rest) = rest.split_once(']')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse "#RRGGBB" or "#RGB".
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let hex = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => Ok(Color::Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        _ => Err(invalid()),
    }
}
