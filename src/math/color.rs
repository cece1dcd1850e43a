use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{Result, SceneError};

/// 8-bit sRGB color, serialized as a `#rrggbb` hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb8(0, 0, 0);
    pub const WHITE: Color = Color::rgb8(0xff, 0xff, 0xff);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` (the leading `#` is optional, case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(SceneError::InvalidColor(s.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| SceneError::InvalidColor(s.to_string()))?;
        Ok(Self::from_u32(packed))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Normalized channels for shader uniforms
    pub fn to_rgb_f32(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let c = Color::from_hex("#FFD700").unwrap();
        assert_eq!(c, Color::rgb8(0xff, 0xd7, 0x00));
        assert_eq!(Color::from_hex("022c22").unwrap(), Color::from_u32(0x022c22));
    }

    #[test]
    fn test_hex_is_lowercase() {
        assert_eq!(Color::from_u32(0xFCD34D).to_hex(), "#fcd34d");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_float_channels() {
        let [r, g, b] = Color::WHITE.to_rgb_f32();
        assert_eq!((r, g, b), (1.0, 1.0, 1.0));
        assert_eq!(Color::BLACK.to_rgb_f32(), [0.0, 0.0, 0.0]);
    }
}
