//! Deferred pattern requests
//!
//! Pattern assignments may be requested from any context (button handlers,
//! other tasks, interrupts) and are applied by the render loop before the
//! next frame. The queue is a bounded `heapless::Deque` guarded by a
//! critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::pattern::{Pattern, PatternSlot};
use crate::segment::Tag;
use crate::strip::LedStrip;

/// A pattern change to apply on the render loop
#[derive(Debug, Clone)]
pub enum PatternRequest<P = PatternSlot> {
    /// Drive every segment with the pattern
    Global {
        pattern: P,
        indicator: Option<&'static str>,
    },
    /// Drive the segments tagged `tag` with the pattern
    Tagged {
        tag: Tag,
        pattern: P,
        indicator: Option<&'static str>,
    },
    /// Only record the indicator name
    Indicator(&'static str),
}

impl<P> PatternRequest<P> {
    pub fn global(pattern: impl Into<P>) -> Self {
        Self::Global {
            pattern: pattern.into(),
            indicator: None,
        }
    }

    pub fn tagged(tag: Tag, pattern: impl Into<P>) -> Self {
        Self::Tagged {
            tag,
            pattern: pattern.into(),
            indicator: None,
        }
    }

    /// Record `name` as the indicator once the request is applied
    #[must_use]
    pub fn with_indicator(self, name: &'static str) -> Self {
        match self {
            Self::Global { pattern, .. } => Self::Global {
                pattern,
                indicator: Some(name),
            },
            Self::Tagged { tag, pattern, .. } => Self::Tagged {
                tag,
                pattern,
                indicator: Some(name),
            },
            Self::Indicator(_) => Self::Indicator(name),
        }
    }
}

/// Error returned when the request queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Bounded queue of pattern requests
pub struct RequestChannel<P, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<PatternRequest<P>, SIZE>>>,
}

impl<P, const SIZE: usize> RequestChannel<P, SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this channel.
    pub const fn sender(&self) -> RequestSender<'_, P, SIZE> {
        RequestSender { channel: self }
    }

    /// Get a receiver handle for this channel.
    pub const fn receiver(&self) -> RequestReceiver<'_, P, SIZE> {
        RequestReceiver { channel: self }
    }

    /// Queue a request
    ///
    /// Returns the request back if the queue is full.
    pub fn try_send(&self, request: PatternRequest<P>) -> Result<(), TrySendError<PatternRequest<P>>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(request).map_err(|request| {
                #[cfg(feature = "esp32-log")]
                println!("[RequestChannel.try_send] queue full, dropping request");
                TrySendError(request)
            })
        })
    }

    /// Take the oldest queued request
    pub fn try_receive(&self) -> Option<PatternRequest<P>> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of requests waiting
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P, const SIZE: usize> Default for RequestChannel<P, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of a [`RequestChannel`]
pub struct RequestSender<'a, P, const SIZE: usize> {
    channel: &'a RequestChannel<P, SIZE>,
}

impl<P, const SIZE: usize> Clone for RequestSender<'_, P, SIZE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, const SIZE: usize> Copy for RequestSender<'_, P, SIZE> {}

impl<P, const SIZE: usize> RequestSender<'_, P, SIZE> {
    pub fn try_send(&self, request: PatternRequest<P>) -> Result<(), TrySendError<PatternRequest<P>>> {
        self.channel.try_send(request)
    }

    /// Queue a global assignment
    pub fn set_global_pattern(&self, pattern: impl Into<P>) -> Result<(), TrySendError<PatternRequest<P>>> {
        self.try_send(PatternRequest::global(pattern))
    }

    /// Queue a tag assignment
    pub fn set_pattern(&self, tag: Tag, pattern: impl Into<P>) -> Result<(), TrySendError<PatternRequest<P>>> {
        self.try_send(PatternRequest::tagged(tag, pattern))
    }
}

/// Receiving half of a [`RequestChannel`]
pub struct RequestReceiver<'a, P, const SIZE: usize> {
    channel: &'a RequestChannel<P, SIZE>,
}

impl<P, const SIZE: usize> RequestReceiver<'_, P, SIZE> {
    pub fn try_receive(&self) -> Option<PatternRequest<P>> {
        self.channel.try_receive()
    }
}

/// Applies queued requests to a strip
pub struct RequestProcessor<'a, P, const SIZE: usize> {
    requests: RequestReceiver<'a, P, SIZE>,
}

impl<'a, P: Pattern, const SIZE: usize> RequestProcessor<'a, P, SIZE> {
    pub const fn new(requests: RequestReceiver<'a, P, SIZE>) -> Self {
        Self { requests }
    }

    /// Apply every pending request in arrival order (non-blocking)
    ///
    /// Returns the number of requests applied.
    pub fn process_pending<const LEDS: usize, const SEGMENTS: usize>(
        &mut self,
        strip: &mut LedStrip<LEDS, SEGMENTS, P>,
    ) -> usize {
        let mut applied = 0;
        while let Some(request) = self.requests.try_receive() {
            strip.apply(request);
            applied += 1;
        }
        applied
    }
}
