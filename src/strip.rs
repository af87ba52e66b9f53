use embassy_time::Instant;
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::buffer::SegmentBuffer;
use crate::color::{ColorFormat, Rgb};
use crate::pattern::{Pattern, PatternId, PatternSlot};
use crate::request::PatternRequest;
use crate::run_order::{self, RunOrder};
use crate::segment::{SegmentConfig, SegmentError, SegmentId, SegmentMut, SegmentTable, Tag};

/// Configuration for the strip
#[derive(Debug, Clone, Copy, Default)]
pub struct StripConfig {
    /// Wire format of segments created without an explicit format
    pub format: ColorFormat,
}

#[derive(Debug, Clone)]
struct PatternEntry<P> {
    id: PatternId,
    pattern: P,
    /// Assigned since the last render, waiting for `initialize`
    is_new: bool,
}

/// LED strip - the segment and pattern orchestrator
///
/// Owns the frame, hands out non-overlapping segments, tracks which pattern
/// drives each segment and renders all patterns once per tick.
///
/// `LEDS` is the number of pixels, `SEGMENTS` the maximum number of segments
/// (mirrors included). A strip knows at most
/// [`MAX_TAGS`](crate::segment::MAX_TAGS) distinct tags. Each segment carries
/// up to [`MAX_SEGMENT_TAGS`](crate::segment::MAX_SEGMENT_TAGS) of them and
/// takes up to [`MAX_MIRRORS`](crate::segment::MAX_MIRRORS) mirrors.
pub struct LedStrip<const LEDS: usize, const SEGMENTS: usize, P = PatternSlot> {
    segments: SegmentTable<SEGMENTS>,
    assignments: [Option<PatternId>; SEGMENTS],
    patterns: Vec<PatternEntry<P>, SEGMENTS>,
    run_order: Vec<RunOrder<SEGMENTS>, SEGMENTS>,
    next_pattern: u64,
    indicator: Option<&'static str>,

    // Buffer written by the patterns
    frame: [Rgb; LEDS],
    // Snapshot handed to the driver
    raw: [Rgb; LEDS],
}

impl<const LEDS: usize, const SEGMENTS: usize, P: Pattern> Default for LedStrip<LEDS, SEGMENTS, P> {
    fn default() -> Self {
        Self::new(&StripConfig::default())
    }
}

impl<const LEDS: usize, const SEGMENTS: usize, P: Pattern> LedStrip<LEDS, SEGMENTS, P> {
    pub fn new(config: &StripConfig) -> Self {
        Self {
            segments: SegmentTable::new(LEDS, config.format),
            assignments: [None; SEGMENTS],
            patterns: Vec::new(),
            run_order: Vec::new(),
            next_pattern: 0,
            indicator: None,
            frame: [Rgb::default(); LEDS],
            raw: [Rgb::default(); LEDS],
        }
    }

    /// Number of LEDs in the strip
    pub const fn len(&self) -> usize {
        LEDS
    }

    pub const fn is_empty(&self) -> bool {
        LEDS == 0
    }

    /// Combined length of all segments carrying `tag`
    pub fn length_of_tag(&self, tag: &str) -> usize {
        self.segments.length_of_tag(tag)
    }

    pub const fn segments(&self) -> &SegmentTable<SEGMENTS> {
        &self.segments
    }

    pub fn segment_config(&self, id: SegmentId) -> Option<&SegmentConfig> {
        self.segments.get(id)
    }

    /// Allocate the next `length` LEDs as a segment
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero or does not fit in the remaining LEDs.
    pub fn segment(&mut self, length: usize) -> SegmentMut<'_, SEGMENTS> {
        let format = self.segments.default_format();
        self.segment_with_format(length, format)
    }

    /// Allocate a segment with an explicit wire format
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero or does not fit in the remaining LEDs.
    pub fn segment_with_format(
        &mut self,
        length: usize,
        format: ColorFormat,
    ) -> SegmentMut<'_, SEGMENTS> {
        match self.try_segment_with_format(length, format) {
            Ok(segment) => segment,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_segment(&mut self, length: usize) -> Result<SegmentMut<'_, SEGMENTS>, SegmentError> {
        let format = self.segments.default_format();
        self.try_segment_with_format(length, format)
    }

    pub fn try_segment_with_format(
        &mut self,
        length: usize,
        format: ColorFormat,
    ) -> Result<SegmentMut<'_, SEGMENTS>, SegmentError> {
        let id = self.segments.try_allocate(length, format)?;
        Ok(SegmentMut::new(&mut self.segments, id))
    }

    /// Allocate a segment replicating every write made to `original`
    ///
    /// # Panics
    ///
    /// Panics if the mirror does not fit, or `original` is itself a mirror.
    pub fn mirror_segment(&mut self, original: SegmentId) -> SegmentMut<'_, SEGMENTS> {
        let format = self.segments.default_format();
        self.mirror_segment_with_format(original, format)
    }

    /// Allocate a mirror with an explicit wire format
    ///
    /// # Panics
    ///
    /// Panics if the mirror does not fit, or `original` is itself a mirror.
    pub fn mirror_segment_with_format(
        &mut self,
        original: SegmentId,
        format: ColorFormat,
    ) -> SegmentMut<'_, SEGMENTS> {
        match self.try_mirror_segment_with_format(original, format) {
            Ok(segment) => segment,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_mirror_segment(
        &mut self,
        original: SegmentId,
    ) -> Result<SegmentMut<'_, SEGMENTS>, SegmentError> {
        let format = self.segments.default_format();
        self.try_mirror_segment_with_format(original, format)
    }

    pub fn try_mirror_segment_with_format(
        &mut self,
        original: SegmentId,
        format: ColorFormat,
    ) -> Result<SegmentMut<'_, SEGMENTS>, SegmentError> {
        let id = self.segments.try_allocate_mirror(original, format)?;
        Ok(SegmentMut::new(&mut self.segments, id))
    }

    /// Add tags to an existing segment
    pub fn add_tags(&mut self, id: SegmentId, tags: &[Tag]) -> Result<(), SegmentError> {
        self.segments.try_add_tags(id, tags)
    }

    /// Drive every segment with `pattern`
    ///
    /// Returns `None` if the strip has no segment the pattern could drive.
    pub fn set_global_pattern(&mut self, pattern: impl Into<P>) -> Option<PatternId> {
        let id = self.issue_pattern_id();
        let mut matched = 0;
        for (assigned, conf) in self.assignments.iter_mut().zip(self.segments.as_slice()) {
            // Mirrors follow their original
            if !conf.is_mirror() {
                *assigned = Some(id);
                matched += 1;
            }
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[LedStrip.set_global_pattern] pattern {:?} drives {} segments",
            id, matched
        );
        self.install(id, pattern.into(), matched)
    }

    /// Drive all segments currently tagged `tag` with `pattern`
    ///
    /// Segments tagged later do not pick the pattern up. Returns `None`, and
    /// drops the pattern, if no segment carries the tag.
    pub fn set_pattern(&mut self, tag: &str, pattern: impl Into<P>) -> Option<PatternId> {
        let id = self.issue_pattern_id();
        let matched = self.assign_tag(tag, id);

        #[cfg(feature = "esp32-log")]
        println!(
            "[LedStrip.set_pattern] pattern {:?} drives {} segments tagged {:?}",
            id, matched, tag
        );
        self.install(id, pattern.into(), matched)
    }

    /// Extend an already assigned pattern instance to the segments tagged `tag`
    ///
    /// The pattern is initialized again on the next render, over all of its
    /// segments. Returns `false` if `id` no longer drives any segment.
    pub fn attach_pattern(&mut self, tag: &str, id: PatternId) -> bool {
        if !self.patterns.iter().any(|entry| entry.id == id) {
            return false;
        }
        let _matched = self.assign_tag(tag, id);
        self.release_unused();
        if let Some(entry) = self.patterns.iter_mut().find(|entry| entry.id == id) {
            entry.is_new = true;
        }
        self.recalculate_run_order();

        #[cfg(feature = "esp32-log")]
        println!(
            "[LedStrip.attach_pattern] pattern {:?} extended to {} segments tagged {:?}",
            id, _matched, tag
        );
        true
    }

    /// Apply a deferred request
    pub fn apply(&mut self, request: PatternRequest<P>) {
        match request {
            PatternRequest::Global { pattern, indicator } => {
                self.set_global_pattern(pattern);
                if let Some(name) = indicator {
                    self.set_indicator(name);
                }
            }
            PatternRequest::Tagged {
                tag,
                pattern,
                indicator,
            } => {
                self.set_pattern(tag, pattern);
                if let Some(name) = indicator {
                    self.set_indicator(name);
                }
            }
            PatternRequest::Indicator(name) => self.set_indicator(name),
        }
    }

    /// Record what the indicator lights are showing
    pub fn set_indicator(&mut self, name: &'static str) {
        #[cfg(feature = "esp32-log")]
        println!("[LedStrip.set_indicator] indicator {:?}", name);
        self.indicator = Some(name);
    }

    /// Name of the last indicator shown
    pub const fn indicator(&self) -> Option<&'static str> {
        self.indicator
    }

    /// Pattern currently driving `segment`
    pub fn pattern_of(&self, segment: SegmentId) -> Option<PatternId> {
        self.assignments.get(segment.index()).copied().flatten()
    }

    pub fn pattern(&self, id: PatternId) -> Option<&P> {
        self.patterns
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.pattern)
    }

    pub fn pattern_mut(&mut self, id: PatternId) -> Option<&mut P> {
        self.patterns
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.pattern)
    }

    /// Whether `id` is waiting for its `initialize` call
    pub fn is_pending(&self, id: PatternId) -> bool {
        self.patterns
            .iter()
            .any(|entry| entry.id == id && entry.is_new)
    }

    /// Current render passes
    pub fn run_order(&self) -> &[RunOrder<SEGMENTS>] {
        &self.run_order
    }

    /// Last frame handed to the driver
    pub fn frame(&self) -> &[Rgb] {
        &self.raw
    }

    /// Render one frame
    ///
    /// Newly assigned patterns are initialized first, then every pattern is
    /// updated and the result is copied into the output frame.
    pub fn render(&mut self, now: Instant) -> &[Rgb] {
        let segments = self.segments.as_slice();

        for order in &self.run_order {
            let entry = self
                .patterns
                .iter_mut()
                .find(|entry| entry.id == order.pattern() && entry.is_new);
            if let Some(entry) = entry {
                let mut buffer = SegmentBuffer::new(&mut self.frame, segments, order.segments());
                entry.pattern.initialize(now, &mut buffer);
            }
        }
        for entry in &mut self.patterns {
            entry.is_new = false;
        }

        for order in &self.run_order {
            let entry = self
                .patterns
                .iter_mut()
                .find(|entry| entry.id == order.pattern());
            if let Some(entry) = entry {
                let mut buffer = SegmentBuffer::new(&mut self.frame, segments, order.segments());
                entry.pattern.update(now, &mut buffer);
            }
        }

        self.raw = self.frame;
        &self.raw
    }

    /// Render one frame and write it to the driver
    pub fn update<D: OutputDriver>(&mut self, now: Instant, driver: &mut D) {
        let frame = self.render(now);
        driver.write(frame);
    }

    /// Next id not held by a live pattern
    fn issue_pattern_id(&mut self) -> PatternId {
        loop {
            let id = PatternId(self.next_pattern);
            self.next_pattern = self.next_pattern.wrapping_add(1);
            if !self.patterns.iter().any(|entry| entry.id == id) {
                return id;
            }
        }
    }

    /// Point every non-mirror segment tagged `tag` at `id`
    fn assign_tag(&mut self, tag: &str, id: PatternId) -> usize {
        let mut matched = 0;
        for &segment in self.segments.tagged(tag) {
            let Some(conf) = self.segments.get(segment) else {
                continue;
            };
            if conf.is_mirror() {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[LedStrip.assign_tag] skipping mirror segment {} tagged {:?}",
                    segment.index(),
                    tag
                );
                continue;
            }
            if let Some(assigned) = self.assignments.get_mut(segment.index()) {
                *assigned = Some(id);
                matched += 1;
            }
        }
        matched
    }

    fn install(&mut self, id: PatternId, pattern: P, matched: usize) -> Option<PatternId> {
        if matched == 0 {
            return None;
        }
        self.release_unused();
        // Every live pattern drives at least one segment, so there is room
        let _ = self.patterns.push(PatternEntry {
            id,
            pattern,
            is_new: true,
        });
        self.recalculate_run_order();
        Some(id)
    }

    /// Drop patterns that no longer drive any segment
    fn release_unused(&mut self) {
        let assignments = &self.assignments;
        self.patterns
            .retain(|entry| assignments.contains(&Some(entry.id)));
    }

    fn recalculate_run_order(&mut self) {
        let count = self.segments.as_slice().len();
        run_order::recalculate(&self.assignments[..count], &mut self.run_order);
    }
}
