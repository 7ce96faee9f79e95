use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The palette a surface starts with when no colors are configured
pub const DEFAULT_COLOR_PALETTE: [&str; 12] = [
    "#000000", "#ffffff", "#9e9e9e", "#f44336", "#ff9800", "#ffeb3b",
    "#4caf50", "#00bcd4", "#2196f3", "#3f51b5", "#9c27b0", "#e91e63",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid hex color {input:?}: expected #rgb or #rrggbb")]
pub struct ColorParseError {
    pub input: String,
}

/// An opaque sRGB color in `#rrggbb` form, always lowercase.
///
/// `#rgb` shorthand is accepted on parse and expanded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const BLACK: Self = Self([0, 0, 0]);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            input: input.to_owned(),
        };

        let digits = input.trim().strip_prefix('#').ok_or_else(err)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let nibble = |c: u8| -> u8 {
            match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                _ => c - b'A' + 10,
            }
        };
        let bytes = digits.as_bytes();

        match bytes.len() {
            3 => Ok(Self([
                nibble(bytes[0]) * 17,
                nibble(bytes[1]) * 17,
                nibble(bytes[2]) * 17,
            ])),
            6 => Ok(Self([
                nibble(bytes[0]) << 4 | nibble(bytes[1]),
                nibble(bytes[2]) << 4 | nibble(bytes[3]),
                nibble(bytes[4]) << 4 | nibble(bytes[5]),
            ])),
            _ => Err(err()),
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.0
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b] = self.0;
        Color32::from_rgb(r, g, b)
    }

    /// Drops alpha: the pen only paints opaque colors.
    pub fn from_color32(color: Color32) -> Self {
        Self([color.r(), color.g(), color.b()])
    }
}

pub fn default_palette() -> Vec<HexColor> {
    DEFAULT_COLOR_PALETTE
        .iter()
        .filter_map(|hex| HexColor::parse(hex).ok())
        .collect()
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexColor({self})")
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}
