use super::{Animated, Animation, DEFAULT_INTERVAL, LevelSource};
use crate::{
    buffer::SegmentBuffer,
    color::{BLACK, Rgb},
};

/// Bar graph of a level between 0 and 1
///
/// Pixels are lit from index 0; a partially covered pixel counts as lit.
#[derive(Debug, Clone)]
pub struct MeterPattern {
    color: Rgb,
    source: LevelSource,
}

impl MeterPattern {
    pub const fn new(color: Rgb, source: LevelSource) -> Self {
        Self { color, source }
    }

    /// Wrap the pattern with the default 20 Hz cadence
    pub const fn animated(self) -> Animated<Self> {
        Animated::new(self, DEFAULT_INTERVAL)
    }

    /// Number of lit pixels for `level` on a buffer of `len` pixels
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn lit_count(level: f32, len: usize) -> usize {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        let lit = libm::ceilf(level * len as f32) as usize;
        lit.min(len)
    }
}

impl Animation for MeterPattern {
    fn animate(&mut self, buffer: &mut SegmentBuffer<'_>) {
        buffer.set_all(BLACK);
        let lit = Self::lit_count((self.source)(), buffer.len());
        for i in 0..lit {
            buffer.set(i, self.color);
        }
    }
}
