use super::{Animated, Animation, DEFAULT_INTERVAL};
use crate::{
    buffer::SegmentBuffer,
    color::{BLACK, RED, Rgb},
};

/// A dot bouncing from one end of the buffer to the other
///
/// The dot turns around on the end pixels, so the strip is never blank
/// and each end is lit for a single frame per bounce.
#[derive(Debug, Clone)]
pub struct CylonPattern {
    color: Rgb,
    position: usize,
    is_reversed: bool,
}

impl Default for CylonPattern {
    fn default() -> Self {
        Self::new(RED)
    }
}

impl CylonPattern {
    pub const fn new(color: Rgb) -> Self {
        Self {
            color,
            position: 0,
            is_reversed: false,
        }
    }

    /// Wrap the pattern with the default 20 Hz cadence
    pub const fn animated(self) -> Animated<Self> {
        Animated::new(self, DEFAULT_INTERVAL)
    }

    pub const fn position(&self) -> usize {
        self.position
    }
}

impl Animation for CylonPattern {
    fn start(&mut self, _buffer: &mut SegmentBuffer<'_>) {
        self.position = 0;
        self.is_reversed = false;
    }

    fn animate(&mut self, buffer: &mut SegmentBuffer<'_>) {
        let last = buffer.len().saturating_sub(1);
        if self.is_reversed {
            self.position = self.position.saturating_sub(1);
        } else {
            self.position += 1;
        }
        if self.position >= last {
            self.position = last;
            self.is_reversed = true;
        } else if self.position == 0 {
            self.is_reversed = false;
        }
        buffer.set_all(BLACK);
        buffer.set(self.position, self.color);
    }
}
