use super::{Animated, Animation, DEFAULT_INTERVAL};
use crate::{
    buffer::SegmentBuffer,
    color::{BLACK, GREEN, Rgb},
};

/// A dot running along the buffer, wrapping back to the start
#[derive(Debug, Clone)]
pub struct SpinPattern {
    color: Rgb,
    position: usize,
}

impl Default for SpinPattern {
    fn default() -> Self {
        Self::new(GREEN)
    }
}

impl SpinPattern {
    pub const fn new(color: Rgb) -> Self {
        Self { color, position: 0 }
    }

    /// Wrap the pattern with the default 20 Hz cadence
    pub const fn animated(self) -> Animated<Self> {
        Animated::new(self, DEFAULT_INTERVAL)
    }

    pub const fn position(&self) -> usize {
        self.position
    }
}

impl Animation for SpinPattern {
    fn start(&mut self, _buffer: &mut SegmentBuffer<'_>) {
        self.position = 0;
    }

    fn animate(&mut self, buffer: &mut SegmentBuffer<'_>) {
        self.position += 1;
        if self.position >= buffer.len() {
            self.position = 0;
        }
        buffer.set_all(BLACK);
        buffer.set(self.position, self.color);
    }
}
