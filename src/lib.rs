#![no_std]

pub mod buffer;
pub mod color;
pub mod math8;
pub mod pattern;
pub mod request;
pub mod run_order;
pub mod scheduler;
pub mod segment;
pub mod strip;

pub use buffer::SegmentBuffer;
pub use color::{ColorFormat, Hsv, Rgb};
pub use pattern::{Animated, Animation, Pattern, PatternId, PatternSlot};
pub use request::{
    PatternRequest, RequestChannel, RequestProcessor, RequestReceiver, RequestSender, TrySendError,
};
pub use run_order::RunOrder;
pub use scheduler::{TickResult, TickScheduler};
pub use segment::{SegmentConfig, SegmentError, SegmentId, SegmentMut, SegmentTable, Tag};
pub use strip::{LedStrip, StripConfig};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The strip hands it one complete frame per render tick.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
