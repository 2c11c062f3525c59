/// RGBA color, 8 bits per channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 0 {
            return f.write_str("transparent");
        }
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Width stays constant in screen pixels regardless of ancestor scale.
    pub non_scaling: bool,
}

/// Paint attributes. A `None` fill is not painted and does not receive hits;
/// a transparent fill does.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl Style {
    pub fn filled(fill: Color) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_parse_and_format() {
        let c = Color::from_hex("#fecaca").unwrap();
        assert_eq!(c, Color::rgb(0xfe, 0xca, 0xca));
        assert_eq!(c.to_string(), "#fecaca");
        assert_eq!(Color::TRANSPARENT.to_string(), "transparent");
        assert_eq!(Color::from_hex("fecaca"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }
}
