//! Tick scheduling
//!
//! Paces the strip at the host's periodic rate without async or a platform
//! timer. The caller sleeps between ticks using the returned timing.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::pattern::{Pattern, PatternSlot};
use crate::request::RequestProcessor;
use crate::strip::LedStrip;

/// Default tick period, matching a 50 Hz robot loop.
pub const DEFAULT_TICK_DURATION: Duration = Duration::from_millis(20);

/// Result of a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives a strip into an output driver once per period.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = TickScheduler::new(strip, driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct TickScheduler<D: OutputDriver, const LEDS: usize, const SEGMENTS: usize, P = PatternSlot> {
    driver: D,
    strip: LedStrip<LEDS, SEGMENTS, P>,
    next_tick: Instant,
    tick_duration: Duration,
}

impl<D: OutputDriver, const LEDS: usize, const SEGMENTS: usize, P: Pattern>
    TickScheduler<D, LEDS, SEGMENTS, P>
{
    /// Create a scheduler ticking every [`DEFAULT_TICK_DURATION`].
    pub fn new(strip: LedStrip<LEDS, SEGMENTS, P>, driver: D) -> Self {
        Self::with_tick_duration(strip, driver, DEFAULT_TICK_DURATION)
    }

    pub fn with_tick_duration(
        strip: LedStrip<LEDS, SEGMENTS, P>,
        driver: D,
        tick_duration: Duration,
    ) -> Self {
        Self {
            driver,
            strip,
            next_tick: Instant::from_millis(0),
            tick_duration,
        }
    }

    /// Render one frame and return timing information.
    ///
    /// If the caller has fallen more than two periods behind, the schedule
    /// restarts from `now` instead of bursting to catch up.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        let max_drift_ms = self.tick_duration.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift_ms {
            self.next_tick = now;
        }

        self.strip.update(now, &mut self.driver);

        self.next_tick += self.tick_duration;
        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
        }
    }

    /// Apply pending requests, then tick.
    pub fn tick_with_requests<const SIZE: usize>(
        &mut self,
        now: Instant,
        requests: &mut RequestProcessor<'_, P, SIZE>,
    ) -> TickResult {
        requests.process_pending(&mut self.strip);
        self.tick(now)
    }

    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub const fn strip(&self) -> &LedStrip<LEDS, SEGMENTS, P> {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut LedStrip<LEDS, SEGMENTS, P> {
        &mut self.strip
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Release the strip and the driver.
    pub fn into_parts(self) -> (LedStrip<LEDS, SEGMENTS, P>, D) {
        (self.strip, self.driver)
    }
}
