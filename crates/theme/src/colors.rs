/// RGB colour with 16-bit channels (`0..=65535`).
///
/// Preferences are parsed at this precision so gradient interpolation does
/// not accumulate 8-bit rounding; [`Color::to_rgb8`] narrows for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Color {
    pub const BLACK:   Self = Self::new(0x0000, 0x0000, 0x0000);
    pub const WHITE:   Self = Self::new(0xffff, 0xffff, 0xffff);
    pub const RED:     Self = Self::new(0xffff, 0x0000, 0x0000);
    pub const GREEN:   Self = Self::new(0x0000, 0xffff, 0x0000);
    pub const BLUE:    Self = Self::new(0x0000, 0x0000, 0xffff);
    pub const YELLOW:  Self = Self::new(0xffff, 0xffff, 0x0000);
    pub const CYAN:    Self = Self::new(0x0000, 0xffff, 0xffff);
    pub const MAGENTA: Self = Self::new(0xffff, 0x0000, 0xffff);
    pub const GRAY:    Self = Self::new(0xbebe, 0xbebe, 0xbebe);

    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Widen an 8-bit-per-channel colour (`0xab` becomes `0xabab`).
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as u16 * 0x101, g as u16 * 0x101, b as u16 * 0x101)
    }

    /// Parse a hex colour: `#rgb`, `#rrggbb` or `#rrrrggggbbbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }

        let digits = match hex.len() {
            3 | 6 | 12 => hex.len() / 3,
            _ => return None,
        };
        let channel = |i: usize| -> Option<u16> {
            let v = u16::from_str_radix(&hex[i * digits..(i + 1) * digits], 16).ok()?;
            // Replicate the digits up to 16 bits, so `f` == `ff` == `ffff`.
            Some(match digits {
                1 => v * 0x1111,
                2 => v * 0x101,
                _ => v,
            })
        };

        Some(Self::new(channel(0)?, channel(1)?, channel(2)?))
    }

    /// Look up one of the preset colour names.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "cyan" => Self::CYAN,
            "magenta" => Self::MAGENTA,
            "gray" | "grey" => Self::GRAY,
            _ => return None,
        };
        Some(color)
    }

    /// Parse either a hex string or a preset name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_name(s)
        }
    }

    /// Parse `s`, falling back to `fallback` with a warning.
    pub fn parse_or(s: &str, fallback: Self, what: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!("invalid {what} colour '{s}'; using default");
            fallback
        })
    }

    /// Narrow to 8-bit channels.
    #[inline]
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        [(self.r >> 8) as u8, (self.g >> 8) as u8, (self.b >> 8) as u8]
    }
}
