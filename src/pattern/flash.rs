use super::{Animated, Animation};
use crate::{
    buffer::SegmentBuffer,
    color::{BLACK, Rgb},
};
use embassy_time::Duration;

/// Toggles between a color and black on every animation frame
#[derive(Debug, Clone)]
pub struct FlashPattern {
    color: Rgb,
    is_on: bool,
}

impl FlashPattern {
    pub const fn new(color: Rgb) -> Self {
        Self { color, is_on: true }
    }

    /// Wrap the pattern so it toggles every `interval`
    pub const fn every(self, interval: Duration) -> Animated<Self> {
        Animated::new(self, interval)
    }

    pub const fn is_on(&self) -> bool {
        self.is_on
    }

    fn paint(&self, buffer: &mut SegmentBuffer<'_>) {
        buffer.set_all(if self.is_on { self.color } else { BLACK });
    }
}

impl Animation for FlashPattern {
    fn start(&mut self, buffer: &mut SegmentBuffer<'_>) {
        self.is_on = true;
        self.paint(buffer);
    }

    fn animate(&mut self, buffer: &mut SegmentBuffer<'_>) {
        self.is_on = !self.is_on;
        self.paint(buffer);
    }
}
