// Ordinal colour scale for the "colorize by" mode

use crate::crossfilter::Key;
use serde::{Serialize, Serializer};
use std::fmt;

/// 24-bit colour, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Colour of points outside any colorized domain
pub const BASE_COLOR: Rgb = Rgb(0x2c, 0x7b, 0xb6);

pub const PALETTE: [Rgb; 10] = [
    Rgb(0x00, 0x96, 0x88), // teal
    Rgb(0x8b, 0xc3, 0x4a), // light green
    Rgb(0xff, 0xeb, 0x3b), // yellow
    Rgb(0xff, 0x98, 0x00), // orange
    Rgb(0xf4, 0x43, 0x36), // red
    Rgb(0xff, 0x66, 0xcc), // pink
    Rgb(0x9c, 0x27, 0xb0), // purple
    Rgb(0x67, 0x3a, 0xb7), // deep purple
    Rgb(0x70, 0x48, 0x80), // plum
    Rgb(0x79, 0x55, 0x48), // brown
];

/// Keys mapped to palette entries in domain order, cycling after ten
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorScale {
    domain: Vec<Key>,
}

impl ColorScale {
    pub fn new(domain: Vec<Key>) -> Self {
        Self { domain }
    }

    /// Palette colour of `key`, or `None` when it is outside the domain
    pub fn color_of(&self, key: &Key) -> Option<Rgb> {
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|i| PALETTE[i % PALETTE.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let scale = ColorScale::new((0..12).map(Key::Int).collect());
        assert_eq!(scale.color_of(&Key::Int(0)), Some(PALETTE[0]));
        assert_eq!(scale.color_of(&Key::Int(10)), Some(PALETTE[0]));
        assert_eq!(scale.color_of(&Key::Int(11)), Some(PALETTE[1]));
        assert_eq!(scale.color_of(&Key::Int(99)), None);
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(BASE_COLOR.to_string(), "#2c7bb6");
        assert_eq!(PALETTE[8].to_string(), "#704880");
    }
}
