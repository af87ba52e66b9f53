//! Static color fill pattern
//!
//! Fills the whole buffer once on activation and then leaves it alone.

use embassy_time::Instant;

use super::Pattern;
use crate::{buffer::SegmentBuffer, color::Rgb};

/// Solid color pattern - fills all LEDs with one color
#[derive(Debug, Clone)]
pub struct SolidColorPattern {
    color: Rgb,
}

impl SolidColorPattern {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Pattern for SolidColorPattern {
    fn initialize(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
        buffer.set_all(self.color);
    }
}
