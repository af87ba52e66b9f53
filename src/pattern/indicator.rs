//! Patterns driven by external state

use embassy_time::Instant;

use super::{AllianceSource, BoolSource, ColorSource, Pattern};
use crate::{
    buffer::SegmentBuffer,
    color::{BLACK, BLUE, RED, Rgb},
};

/// Shows one color while a state is true and another while it is false
#[derive(Debug, Clone)]
pub struct IndicatorPattern {
    true_color: Rgb,
    false_color: Rgb,
    source: BoolSource,
}

impl IndicatorPattern {
    pub const fn new(true_color: Rgb, false_color: Rgb, source: BoolSource) -> Self {
        Self {
            true_color,
            false_color,
            source,
        }
    }
}

impl Pattern for IndicatorPattern {
    fn initialize(&mut self, _now: Instant, _buffer: &mut SegmentBuffer<'_>) {}

    fn update(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
        let color = if (self.source)() {
            self.true_color
        } else {
            self.false_color
        };
        buffer.set_all(color);
    }
}

/// Fills the buffer with whatever color the source reports
#[derive(Debug, Clone)]
pub struct SupplierPattern {
    source: ColorSource,
}

impl SupplierPattern {
    pub const fn new(source: ColorSource) -> Self {
        Self { source }
    }
}

impl Pattern for SupplierPattern {
    fn initialize(&mut self, _now: Instant, _buffer: &mut SegmentBuffer<'_>) {}

    fn update(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
        buffer.set_all((self.source)());
    }
}

/// Match alliance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alliance {
    Red,
    Blue,
}

/// Shows the alliance color at activation time, black while it is unknown
#[derive(Debug, Clone)]
pub struct AlliancePattern {
    source: AllianceSource,
}

impl AlliancePattern {
    pub const fn new(source: AllianceSource) -> Self {
        Self { source }
    }
}

impl Pattern for AlliancePattern {
    fn initialize(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
        let color = match (self.source)() {
            Some(Alliance::Blue) => BLUE,
            Some(Alliance::Red) => RED,
            None => BLACK,
        };
        buffer.set_all(color);
    }
}
