use std::fmt;
use std::str::FromStr;

use egui::Color32;
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// An opaque RGB color. Serialized as a `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Fully opaque pixel value.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Per-channel match on R, G and B; alpha is not looked at.
    pub fn matches(self, pixel: Rgba<u8>, tolerance: u8) -> bool {
        let [r, g, b, _] = pixel.0;
        r.abs_diff(self.r) < tolerance && g.abs_diff(self.g) < tolerance && b.abs_diff(self.b) < tolerance
    }
}

impl From<Rgba<u8>> for Rgb {
    fn from(pixel: Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self::new(r, g, b)
    }
}

impl From<Rgb> for Color32 {
    fn from(color: Rgb) -> Self {
        Color32::from_rgb(color.r, color.g, color.b)
    }
}

impl From<Color32> for Rgb {
    fn from(color: Color32) -> Self {
        Self::new(color.r(), color.g(), color.b())
    }
}

impl FromStr for Rgb {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim()).ok_or_else(|| SurfaceError::InvalidColor(s.to_owned()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = SurfaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Swatches offered next to the color picker.
pub const PRESETS: [Rgb; 6] = [
    Rgb::new(0x00, 0xD9, 0xFF),
    Rgb::new(0xA8, 0x55, 0xF7),
    Rgb::new(0x22, 0xC5, 0x5E),
    Rgb::new(0xF9, 0x73, 0x16),
    Rgb::new(0xEF, 0x44, 0x44),
    Rgb::WHITE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#00D9FF"), Some(Rgb::new(0x00, 0xD9, 0xFF)));
        assert_eq!(Rgb::from_hex("0f172a"), Some(Rgb::new(0x0F, 0x17, 0x2A)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        assert!("not a color".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_hex_is_uppercase() {
        assert_eq!(Rgb::new(0xa8, 0x55, 0xf7).to_hex(), "#A855F7");
    }

    #[test]
    fn test_match_ignores_alpha() {
        let target = Rgb::new(100, 100, 100);
        assert!(target.matches(Rgba([109, 91, 100, 0]), 10));
        assert!(!target.matches(Rgba([110, 100, 100, 255]), 10));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#FF0000\"");
        let back: Rgb = serde_json::from_str("\"#ff0000\"").unwrap();
        assert_eq!(back, Rgb::new(255, 0, 0));
        assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
    }
}
