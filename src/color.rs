use std::fmt;
use std::str::FromStr;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiplies every channel by `factor`, truncating toward zero.
    /// Out-of-range products saturate at the channel bounds.
    pub fn scale(self, factor: f32) -> Self {
        let ch = |c: u8| (c as f32 * factor) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Packs into the `0x00RRGGBB` word softbuffer expects.
    #[inline]
    pub fn pack(self) -> u32 {
        // Alpha at 0
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("expected 3 components, got {0}")]
    ComponentCount(usize),
    #[error("invalid channel value {0:?} (expected 0-255)")]
    Channel(String),
    #[error("invalid hex color {0:?}")]
    Hex(String),
    #[error("unknown color name {0:?}")]
    UnknownName(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `r,g,b`, `#rrggbb`, or one of the named constants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(ColorParseError::Hex(s.to_string()));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| ColorParseError::Hex(s.to_string()))
            };
            return Ok(Color::new(channel(0)?, channel(2)?, channel(4)?));
        }

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(ColorParseError::ComponentCount(parts.len()));
            }
            let channel = |p: &str| {
                p.parse::<u8>()
                    .map_err(|_| ColorParseError::Channel(p.to_string()))
            };
            return Ok(Color::new(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
            ));
        }

        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::BLACK),
            "red" => Ok(Color::RED),
            "green" => Ok(Color::GREEN),
            "blue" => Ok(Color::BLUE),
            "white" => Ok(Color::WHITE),
            _ => Err(ColorParseError::UnknownName(s.to_string())),
        }
    }
}
