mod format;

pub use format::ColorFormat;
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use smart_leds::hsv::hsv2rgb;

pub type Rgb = RGB8;
pub type Hsv = HSV;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };
pub const ORANGE: Rgb = Rgb { r: 255, g: 165, b: 0 };
pub const PURPLE: Rgb = Rgb { r: 128, g: 0, b: 128 };

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
