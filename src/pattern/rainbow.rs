//! Rotating rainbow
//!
//! The full hue circle is spread across the buffer and shifted a few steps
//! backwards on every frame.

use embassy_time::Instant;

use super::Pattern;
use crate::{
    buffer::SegmentBuffer,
    color::{Hsv, hsv2rgb},
};

const HUE_STEP: u8 = 4;
const SATURATION: u8 = 255;
const VALUE: u8 = 128;

/// Double rainbow all the way across the sky
#[derive(Debug, Clone, Default)]
pub struct RainbowRoad {
    first_hue: u8,
}

impl RainbowRoad {
    pub const fn new() -> Self {
        Self { first_hue: 0 }
    }

    /// Hue of the first pixel for the next frame
    pub const fn first_hue(&self) -> u8 {
        self.first_hue
    }

    /// Hue of pixel `index` on a buffer of `len` pixels
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hue_at(&self, index: usize, len: usize) -> u8 {
        if len == 0 {
            return self.first_hue;
        }
        self.first_hue.wrapping_add(((index * 256) / len) as u8)
    }
}

impl Pattern for RainbowRoad {
    fn initialize(&mut self, _now: Instant, _buffer: &mut SegmentBuffer<'_>) {
        self.first_hue = 0;
    }

    fn update(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
        let len = buffer.len();
        for i in 0..len {
            buffer.set(
                i,
                hsv2rgb(Hsv {
                    hue: self.hue_at(i, len),
                    sat: SATURATION,
                    val: VALUE,
                }),
            );
        }
        self.first_hue = self.first_hue.wrapping_sub(HUE_STEP);
    }
}
