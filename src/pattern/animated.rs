use embassy_time::{Duration, Instant};

use super::Pattern;
use crate::buffer::SegmentBuffer;

/// A pattern that only changes on a fixed interval
pub trait Animation {
    /// Reset the animation state, called on every activation
    fn start(&mut self, _buffer: &mut SegmentBuffer<'_>) {}

    /// Show the next stage of the animation
    fn animate(&mut self, buffer: &mut SegmentBuffer<'_>);
}

/// Throttles an [`Animation`] to one frame per `interval`
///
/// When the host falls more than two intervals behind, the timer restarts
/// from the current tick instead of replaying the backlog.
#[derive(Debug, Clone)]
pub struct Animated<A> {
    animation: A,
    interval: Duration,
    last_frame: Instant,
}

impl<A: Animation> Animated<A> {
    pub const fn new(animation: A, interval: Duration) -> Self {
        Self {
            animation,
            interval,
            last_frame: Instant::from_millis(0),
        }
    }

    /// Set the animation interval
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub const fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }
}

impl<A: Animation> Pattern for Animated<A> {
    fn initialize(&mut self, now: Instant, buffer: &mut SegmentBuffer<'_>) {
        self.last_frame = now;
        self.animation.start(buffer);
    }

    fn update(&mut self, now: Instant, buffer: &mut SegmentBuffer<'_>) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        if elapsed < self.interval {
            return;
        }
        if elapsed.as_millis() > self.interval.as_millis() * 2 {
            self.last_frame = now;
        } else {
            self.last_frame += self.interval;
        }
        self.animation.animate(buffer);
    }
}
