//! Theme palette table
//!
//! This table is the only place theme colors live. Everything that renders a
//! theme-dependent color looks it up here.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::SceneError;
use crate::math::Color;

/// Material theme selectable from the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Emerald,
    Sapphire,
    Ruby,
    Obsidian,
}

/// Three-color palette consumed by every animated layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    /// Dominant foliage color
    pub body: Color,
    /// Ornament metal color
    pub ornament: Color,
    /// Secondary foliage and sparkle color
    pub glow: Color,
}

/// Red gift color used for the heavy ornaments on the emerald tree
pub const GIFT_RED: Color = Color::from_u32(0x7f1d1d);

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Emerald, Theme::Sapphire, Theme::Ruby, Theme::Obsidian];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Emerald => "emerald",
            Theme::Sapphire => "sapphire",
            Theme::Ruby => "ruby",
            Theme::Obsidian => "obsidian",
        }
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Emerald => ThemePalette {
                body: Color::from_u32(0x022c22),
                ornament: Color::from_u32(0xFFD700),
                glow: Color::from_u32(0x10b981),
            },
            Theme::Sapphire => ThemePalette {
                body: Color::from_u32(0x0f172a),
                ornament: Color::from_u32(0xe2e8f0),
                glow: Color::from_u32(0x3b82f6),
            },
            Theme::Ruby => ThemePalette {
                body: Color::from_u32(0x450a0a),
                ornament: Color::from_u32(0xfbbf24),
                glow: Color::from_u32(0xef4444),
            },
            Theme::Obsidian => ThemePalette {
                body: Color::from_u32(0x000000),
                ornament: Color::from_u32(0xFCD34D),
                glow: Color::from_u32(0xffffff),
            },
        }
    }

    /// Color of the heavy (box) ornament population.
    ///
    /// The emerald tree carries red gifts; every other theme uses its own
    /// ornament color.
    pub fn gift_color(&self) -> Color {
        match self {
            Theme::Emerald => GIFT_RED,
            _ => self.palette().ornament,
        }
    }

    /// Center color of the radial backdrop gradient behind the canvas
    pub fn backdrop(&self) -> Color {
        match self {
            Theme::Emerald => Color::from_u32(0x064e3b),
            Theme::Sapphire => Color::from_u32(0x1e3a8a),
            Theme::Ruby => Color::from_u32(0x7f1d1d),
            Theme::Obsidian => Color::from_u32(0x1f2937),
        }
    }

    /// Fill color of the theme picker button
    pub fn swatch(&self) -> Color {
        match self {
            Theme::Obsidian => Color::from_u32(0x111827),
            other => other.backdrop(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = SceneError;

    /// Exact lowercase match; anything else is an error rather than a fallback
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == s)
            .ok_or_else(|| SceneError::UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_table() {
        assert_eq!(Theme::Emerald.palette().body.to_hex(), "#022c22");
        assert_eq!(Theme::Sapphire.palette().body.to_hex(), "#0f172a");
        assert_eq!(Theme::Ruby.palette().glow.to_hex(), "#ef4444");
        assert_eq!(Theme::Obsidian.palette().ornament.to_hex(), "#fcd34d");
    }

    #[test]
    fn test_gift_color_override_only_on_emerald() {
        assert_eq!(Theme::Emerald.gift_color(), GIFT_RED);
        for theme in [Theme::Sapphire, Theme::Ruby, Theme::Obsidian] {
            assert_eq!(theme.gift_color(), theme.palette().ornament);
        }
    }

    #[test]
    fn test_parse_round_trip_names() {
        for theme in Theme::ALL {
            assert_eq!(theme.name().parse::<Theme>().unwrap(), theme);
        }
    }

    #[test]
    fn test_unknown_theme_fails_fast() {
        let err = "jade".parse::<Theme>().unwrap_err();
        assert!(matches!(err, SceneError::UnknownTheme(ref name) if name == "jade"));
        assert!("Emerald".parse::<Theme>().is_err());
    }

    #[test]
    fn test_swatch_differs_from_backdrop_for_obsidian() {
        assert_eq!(Theme::Ruby.swatch(), Theme::Ruby.backdrop());
        assert_ne!(Theme::Obsidian.swatch(), Theme::Obsidian.backdrop());
    }
}
