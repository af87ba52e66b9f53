use crate::color::Rgb;

/// Channel order expected by the LEDs on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorFormat {
    /// Red, green, blue
    #[default]
    Rgb,
    /// Green, red, blue (WS2812 and most clones)
    Grb,
}

impl ColorFormat {
    /// Convert a logical color into the wire order
    pub const fn convert(self, color: Rgb) -> Rgb {
        match self {
            Self::Rgb => color,
            Self::Grb => Rgb {
                r: color.g,
                g: color.r,
                b: color.b,
            },
        }
    }
}
