// Deterministic key coloring
//
// Every distinct IP, location and ISP gets a stable tint derived from a
// polynomial string hash, so the same value is recognisable across rows,
// users and sessions. Collisions are possible and accepted.

use ratatui::style::Color;
use std::fmt;

/// Saturation applied to every key color, in percent
pub const KEY_SATURATION: u8 = 55;

/// Lightness applied to every key color, in percent
pub const KEY_LIGHTNESS: u8 = 32;

/// An HSL color with hue in degrees and saturation/lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    /// Convert to 8-bit RGB
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = f64::from(self.hue % 360) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }

    /// Terminal color for this tint
    pub fn to_color(self) -> Color {
        let (r, g, b) = self.to_rgb();
        Color::Rgb(r, g, b)
    }
}

impl fmt::Display for Hsl {
    /// CSS notation, e.g. `hsl(210, 55%, 32%)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Category a colored value belongs to
///
/// The category prefix is part of the hashed key, so an IP and a location
/// with the same literal text do not share a color by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKey<'a> {
    Ip(&'a str),
    Location(&'a str),
    Isp(&'a str),
}

impl ColorKey<'_> {
    /// Namespaced key string, e.g. `ip:1.1.1.1`
    pub fn namespaced(&self) -> String {
        match self {
            ColorKey::Ip(value) => format!("ip:{}", value),
            ColorKey::Location(value) => format!("loc:{}", value),
            ColorKey::Isp(value) => format!("isp:{}", value),
        }
    }

    pub fn color(&self) -> Hsl {
        color_for(&self.namespaced())
    }
}

/// 32-bit string hash: `hash = hash * 31 + unit` over UTF-16 code units
/// with two's-complement wraparound
pub fn key_hash(key: &str) -> i32 {
    key.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Map an arbitrary key to its display color
pub fn color_for(key: &str) -> Hsl {
    // Widen first: |i32::MIN| does not fit in an i32
    let hue = (i64::from(key_hash(key)).abs() % 360) as u16;
    Hsl {
        hue,
        saturation: KEY_SATURATION,
        lightness: KEY_LIGHTNESS,
    }
}
