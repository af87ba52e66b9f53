//! Pattern system
//!
//! A pattern paints a [`SegmentBuffer`]. The strip calls
//! [`Pattern::initialize`] once after each assignment and
//! [`Pattern::update`] on every render tick.
//!
//! Built-in patterns are collected in [`PatternSlot`] so a strip can hold
//! any of them without heap allocation.

mod animated;
mod cylon;
mod fire;
mod flash;
mod indicator;
mod meter;
mod rainbow;
mod solid;
mod spin;

use embassy_time::{Duration, Instant};

pub use animated::{Animated, Animation};
pub use cylon::CylonPattern;
pub use fire::{DEFAULT_INTENSITY, FirePalette, FirePattern, FireRng, MAX_FIRE_LEN};
pub use flash::FlashPattern;
pub use indicator::{Alliance, AlliancePattern, IndicatorPattern, SupplierPattern};
pub use meter::MeterPattern;
pub use rainbow::RainbowRoad;
pub use solid::SolidColorPattern;
pub use spin::SpinPattern;

use crate::buffer::SegmentBuffer;
use crate::color::Rgb;

/// Default cadence of the built-in animated patterns (20 Hz)
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Source of a boolean state
pub type BoolSource = fn() -> bool;
/// Source of a level between 0 and 1
pub type LevelSource = fn() -> f32;
/// Source of a color
pub type ColorSource = fn() -> Rgb;
/// Source of the alliance, `None` while unknown
pub type AllianceSource = fn() -> Option<Alliance>;

pub trait Pattern {
    /// Paint the first frame after the pattern has been assigned
    fn initialize(&mut self, now: Instant, buffer: &mut SegmentBuffer<'_>);

    /// Paint a regular frame
    fn update(&mut self, _now: Instant, _buffer: &mut SegmentBuffer<'_>) {}
}

/// Identity of an assigned pattern instance
///
/// Every assignment issues a new id, so two equal patterns assigned
/// separately never share a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(pub(crate) u64);

/// Pattern slot - enum containing all built-in patterns
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum PatternSlot {
    /// Single static color
    Solid(SolidColorPattern),
    /// Color toggling on and off
    Flash(Animated<FlashPattern>),
    /// Dot bouncing between the ends
    Cylon(Animated<CylonPattern>),
    /// Dot running around and wrapping
    Spin(Animated<SpinPattern>),
    /// Bar graph of a live level
    Meter(Animated<MeterPattern>),
    /// Flame simulation
    Fire(FirePattern),
    /// Two colors selected by a live boolean
    Indicator(IndicatorPattern),
    /// Live color
    Supplier(SupplierPattern),
    /// Alliance color
    Alliance(AlliancePattern),
    /// Rotating hue sweep
    Rainbow(RainbowRoad),
}

impl PatternSlot {
    pub const fn solid(color: Rgb) -> Self {
        Self::Solid(SolidColorPattern::new(color))
    }

    pub const fn flash(color: Rgb, interval: Duration) -> Self {
        Self::Flash(Animated::new(FlashPattern::new(color), interval))
    }

    pub const fn cylon(color: Rgb) -> Self {
        Self::Cylon(CylonPattern::new(color).animated())
    }

    pub const fn spin(color: Rgb) -> Self {
        Self::Spin(SpinPattern::new(color).animated())
    }

    pub const fn meter(color: Rgb, source: LevelSource) -> Self {
        Self::Meter(MeterPattern::new(color, source).animated())
    }

    pub const fn fire(length: usize) -> Self {
        Self::Fire(FirePattern::new(length))
    }

    pub const fn cold_fire(length: usize) -> Self {
        Self::Fire(FirePattern::cold(length))
    }

    pub const fn indicator(true_color: Rgb, false_color: Rgb, source: BoolSource) -> Self {
        Self::Indicator(IndicatorPattern::new(true_color, false_color, source))
    }

    pub const fn supplier(source: ColorSource) -> Self {
        Self::Supplier(SupplierPattern::new(source))
    }

    pub const fn alliance(source: AllianceSource) -> Self {
        Self::Alliance(AlliancePattern::new(source))
    }

    pub const fn rainbow() -> Self {
        Self::Rainbow(RainbowRoad::new())
    }

    /// Human readable pattern name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Solid(_) => "solid",
            Self::Flash(_) => "flash",
            Self::Cylon(_) => "cylon",
            Self::Spin(_) => "spin",
            Self::Meter(_) => "meter",
            Self::Fire(fire) => match fire.palette() {
                FirePalette::Warm => "fire",
                FirePalette::Cold => "cold_fire",
            },
            Self::Indicator(_) => "indicator",
            Self::Supplier(_) => "supplier",
            Self::Alliance(_) => "alliance",
            Self::Rainbow(_) => "rainbow",
        }
    }
}

impl Pattern for PatternSlot {
    fn initialize(&mut self, now: Instant, buffer: &mut SegmentBuffer<'_>) {
        match self {
            Self::Solid(pattern) => pattern.initialize(now, buffer),
            Self::Flash(pattern) => pattern.initialize(now, buffer),
            Self::Cylon(pattern) => pattern.initialize(now, buffer),
            Self::Spin(pattern) => pattern.initialize(now, buffer),
            Self::Meter(pattern) => pattern.initialize(now, buffer),
            Self::Fire(pattern) => pattern.initialize(now, buffer),
            Self::Indicator(pattern) => pattern.initialize(now, buffer),
            Self::Supplier(pattern) => pattern.initialize(now, buffer),
            Self::Alliance(pattern) => pattern.initialize(now, buffer),
            Self::Rainbow(pattern) => pattern.initialize(now, buffer),
        }
    }

    fn update(&mut self, now: Instant, buffer: &mut SegmentBuffer<'_>) {
        match self {
            Self::Solid(pattern) => pattern.update(now, buffer),
            Self::Flash(pattern) => pattern.update(now, buffer),
            Self::Cylon(pattern) => pattern.update(now, buffer),
            Self::Spin(pattern) => pattern.update(now, buffer),
            Self::Meter(pattern) => pattern.update(now, buffer),
            Self::Fire(pattern) => pattern.update(now, buffer),
            Self::Indicator(pattern) => pattern.update(now, buffer),
            Self::Supplier(pattern) => pattern.update(now, buffer),
            Self::Alliance(pattern) => pattern.update(now, buffer),
            Self::Rainbow(pattern) => pattern.update(now, buffer),
        }
    }
}

impl From<SolidColorPattern> for PatternSlot {
    fn from(pattern: SolidColorPattern) -> Self {
        Self::Solid(pattern)
    }
}

impl From<Animated<FlashPattern>> for PatternSlot {
    fn from(pattern: Animated<FlashPattern>) -> Self {
        Self::Flash(pattern)
    }
}

impl From<Animated<CylonPattern>> for PatternSlot {
    fn from(pattern: Animated<CylonPattern>) -> Self {
        Self::Cylon(pattern)
    }
}

impl From<Animated<SpinPattern>> for PatternSlot {
    fn from(pattern: Animated<SpinPattern>) -> Self {
        Self::Spin(pattern)
    }
}

impl From<Animated<MeterPattern>> for PatternSlot {
    fn from(pattern: Animated<MeterPattern>) -> Self {
        Self::Meter(pattern)
    }
}

impl From<FirePattern> for PatternSlot {
    fn from(pattern: FirePattern) -> Self {
        Self::Fire(pattern)
    }
}

impl From<IndicatorPattern> for PatternSlot {
    fn from(pattern: IndicatorPattern) -> Self {
        Self::Indicator(pattern)
    }
}

impl From<SupplierPattern> for PatternSlot {
    fn from(pattern: SupplierPattern) -> Self {
        Self::Supplier(pattern)
    }
}

impl From<AlliancePattern> for PatternSlot {
    fn from(pattern: AlliancePattern) -> Self {
        Self::Alliance(pattern)
    }
}

impl From<RainbowRoad> for PatternSlot {
    fn from(pattern: RainbowRoad) -> Self {
        Self::Rainbow(pattern)
    }
}
