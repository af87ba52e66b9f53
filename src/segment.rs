//! Segment allocation and tagging
//!
//! A segment is a contiguous run of pixels inside the strip frame.
//! Segments are handed out in append order by [`SegmentTable`], so they never
//! overlap and always tile the frame from index 0 without gaps.

use core::fmt;

use heapless::{FnvIndexMap, Vec};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{ColorFormat, Rgb};

/// Maximum number of tags on a single segment
pub const MAX_SEGMENT_TAGS: usize = 8;
/// Maximum number of mirrors of a single segment
pub const MAX_MIRRORS: usize = 4;
/// Maximum number of distinct tags on a strip (must be a power of two)
///
/// Tagging past the limit fails with [`SegmentError::TooManyTags`].
pub const MAX_TAGS: usize = 16;

/// Label used to address groups of segments
pub type Tag = &'static str;

/// Handle to a segment, in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(usize);

impl SegmentId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the segment in creation order
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Configuration-time errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// Segments must contain at least one pixel.
    ZeroLength,
    /// Not enough unallocated pixels left in the frame.
    OutOfCapacity { requested: usize, remaining: usize },
    /// The segment table is full.
    TooManySegments,
    /// The original segment cannot take another mirror.
    TooManyMirrors,
    /// Mirrors cannot be mirrored again.
    MirrorOfMirror,
    /// The segment or the strip cannot hold another tag.
    TooManyTags,
    /// The handle does not belong to this strip.
    UnknownSegment,
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLength => write!(f, "segment length must be positive"),
            Self::OutOfCapacity {
                requested,
                remaining,
            } => write!(
                f,
                "segment of {} LEDs does not fit, only {} remaining",
                requested, remaining
            ),
            Self::TooManySegments => write!(f, "segment capacity exceeded"),
            Self::TooManyMirrors => write!(f, "mirror capacity exceeded"),
            Self::MirrorOfMirror => write!(f, "a mirror segment cannot be mirrored"),
            Self::TooManyTags => write!(f, "tag capacity exceeded"),
            Self::UnknownSegment => write!(f, "unknown segment"),
        }
    }
}

/// A single contiguous segment of the strip
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    start: usize,
    stop: usize,
    length: usize,
    reversed: bool,
    format: ColorFormat,
    tags: Vec<Tag, MAX_SEGMENT_TAGS>,
    mirrors: Vec<SegmentId, MAX_MIRRORS>,
    mirror_of: Option<SegmentId>,
}

impl SegmentConfig {
    const fn new(start: usize, length: usize, format: ColorFormat) -> Self {
        Self {
            start,
            stop: start + length - 1,
            length,
            reversed: false,
            format,
            tags: Vec::new(),
            mirrors: Vec::new(),
            mirror_of: None,
        }
    }

    /// First frame index covered by the segment
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Last frame index covered by the segment (inclusive)
    pub const fn stop(&self) -> usize {
        self.stop
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub const fn format(&self) -> ColorFormat {
        self.format
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }

    /// Segments replicating every write made to this one
    pub fn mirrors(&self) -> &[SegmentId] {
        &self.mirrors
    }

    /// The segment this one replicates, if it is a mirror
    pub const fn mirror_of(&self) -> Option<SegmentId> {
        self.mirror_of
    }

    pub const fn is_mirror(&self) -> bool {
        self.mirror_of.is_some()
    }

    /// Frame index of the logical index `i`
    pub const fn index_for(&self, i: usize) -> usize {
        if self.reversed {
            self.stop - i
        } else {
            self.start + i
        }
    }

    /// Write `color` at logical index `i` and replicate it into every mirror.
    ///
    /// `i` must be below [`length`](Self::length).
    pub fn update(&self, i: usize, color: Rgb, segments: &[SegmentConfig], frame: &mut [Rgb]) {
        self.write(i, color, frame);
        for mirror in &self.mirrors {
            if let Some(conf) = segments.get(mirror.index()) {
                conf.write(i, color, frame);
            }
        }
    }

    fn write(&self, i: usize, color: Rgb, frame: &mut [Rgb]) {
        if let Some(led) = frame.get_mut(self.index_for(i)) {
            *led = self.format.convert(color);
        }
    }
}

/// Allocator and tag index for the segments of one strip
#[derive(Debug)]
pub struct SegmentTable<const SEGMENTS: usize> {
    total: usize,
    next_free: usize,
    default_format: ColorFormat,
    configs: Vec<SegmentConfig, SEGMENTS>,
    tag_index: FnvIndexMap<Tag, Vec<SegmentId, SEGMENTS>, MAX_TAGS>,
}

impl<const SEGMENTS: usize> SegmentTable<SEGMENTS> {
    pub fn new(total: usize, default_format: ColorFormat) -> Self {
        Self {
            total,
            next_free: 0,
            default_format,
            configs: Vec::new(),
            tag_index: FnvIndexMap::new(),
        }
    }

    /// Number of pixels in the frame
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of pixels already handed out to segments
    pub const fn allocated(&self) -> usize {
        self.next_free
    }

    pub const fn remaining(&self) -> usize {
        self.total - self.next_free
    }

    pub const fn default_format(&self) -> ColorFormat {
        self.default_format
    }

    pub fn as_slice(&self) -> &[SegmentConfig] {
        &self.configs
    }

    pub fn get(&self, id: SegmentId) -> Option<&SegmentConfig> {
        self.configs.get(id.index())
    }

    /// Segments registered under `tag`, in tagging order
    pub fn tagged(&self, tag: &str) -> &[SegmentId] {
        self.tag_index.get(tag).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    /// Combined length of all segments carrying `tag`
    pub fn length_of_tag(&self, tag: &str) -> usize {
        self.configs
            .iter()
            .filter(|conf| conf.has_tag(tag))
            .map(SegmentConfig::length)
            .sum()
    }

    /// Allocate the next `length` pixels as a new segment
    pub fn try_allocate(
        &mut self,
        length: usize,
        format: ColorFormat,
    ) -> Result<SegmentId, SegmentError> {
        if length == 0 {
            return Err(SegmentError::ZeroLength);
        }
        if length > self.remaining() {
            return Err(SegmentError::OutOfCapacity {
                requested: length,
                remaining: self.remaining(),
            });
        }
        let id = SegmentId(self.configs.len());
        self.configs
            .push(SegmentConfig::new(self.next_free, length, format))
            .map_err(|_| SegmentError::TooManySegments)?;
        self.next_free += length;

        #[cfg(feature = "esp32-log")]
        println!(
            "[SegmentTable.try_allocate] segment {} covers {}..{}",
            id.index(),
            self.next_free - length,
            self.next_free
        );
        Ok(id)
    }

    /// Allocate a segment of the same length that replicates `original`
    pub fn try_allocate_mirror(
        &mut self,
        original: SegmentId,
        format: ColorFormat,
    ) -> Result<SegmentId, SegmentError> {
        let source = self.get(original).ok_or(SegmentError::UnknownSegment)?;
        if source.is_mirror() {
            return Err(SegmentError::MirrorOfMirror);
        }
        if source.mirrors.is_full() {
            return Err(SegmentError::TooManyMirrors);
        }
        let length = source.length;

        let id = self.try_allocate(length, format)?;
        self.configs[id.index()].mirror_of = Some(original);
        // Room was checked above
        let _ = self.configs[original.index()].mirrors.push(id);

        #[cfg(feature = "esp32-log")]
        println!(
            "[SegmentTable.try_allocate_mirror] segment {} mirrors {}",
            id.index(),
            original.index()
        );
        Ok(id)
    }

    /// Register `id` under each of `tags`; already present tags are ignored
    pub fn try_add_tags(&mut self, id: SegmentId, tags: &[Tag]) -> Result<(), SegmentError> {
        if id.index() >= self.configs.len() {
            return Err(SegmentError::UnknownSegment);
        }
        for &tag in tags {
            if self.configs[id.index()].has_tag(tag) {
                continue;
            }
            let needs_entry = !self.tag_index.contains_key(tag);
            if self.configs[id.index()].tags.is_full()
                || (needs_entry && self.tag_index.len() == self.tag_index.capacity())
            {
                return Err(SegmentError::TooManyTags);
            }
            let _ = self.configs[id.index()].tags.push(tag);
            if needs_entry {
                let _ = self.tag_index.insert(tag, Vec::new());
            }
            if let Some(ids) = self.tag_index.get_mut(tag) {
                // Every segment appears at most once per tag
                let _ = ids.push(id);
            }

            #[cfg(feature = "esp32-log")]
            println!(
                "[SegmentTable.try_add_tags] segment {} tagged {:?}",
                id.index(),
                tag
            );
        }
        Ok(())
    }

    pub(crate) fn set_reversed(&mut self, id: SegmentId, reversed: bool) {
        if let Some(conf) = self.configs.get_mut(id.index()) {
            conf.reversed = reversed;
        }
    }

    pub(crate) fn set_format(&mut self, id: SegmentId, format: ColorFormat) {
        if let Some(conf) = self.configs.get_mut(id.index()) {
            conf.format = format;
        }
    }
}

/// Fluent handle to a freshly allocated segment
///
/// ```ignore
/// let left = strip.segment(30).tags(&["left", "body"]).reversed(true).id();
/// ```
pub struct SegmentMut<'a, const SEGMENTS: usize> {
    table: &'a mut SegmentTable<SEGMENTS>,
    id: SegmentId,
}

impl<'a, const SEGMENTS: usize> SegmentMut<'a, SEGMENTS> {
    pub(crate) const fn new(table: &'a mut SegmentTable<SEGMENTS>, id: SegmentId) -> Self {
        Self { table, id }
    }

    pub const fn id(&self) -> SegmentId {
        self.id
    }

    /// Read the current configuration
    pub fn config(&self) -> Option<&SegmentConfig> {
        self.table.get(self.id)
    }

    /// Set whether index 0 maps to the last pixel of the segment
    #[must_use]
    pub fn reversed(self, reversed: bool) -> Self {
        self.table.set_reversed(self.id, reversed);
        self
    }

    /// Override the wire format of the segment
    #[must_use]
    pub fn format(self, format: ColorFormat) -> Self {
        self.table.set_format(self.id, format);
        self
    }

    /// Add tags to the segment
    ///
    /// # Panics
    ///
    /// Panics if the segment or the strip runs out of tag slots.
    #[must_use]
    pub fn tags(self, tags: &[Tag]) -> Self {
        match self.try_tags(tags) {
            Ok(this) => this,
            Err(err) => panic!("{}", err),
        }
    }

    /// Add tags to the segment, reporting tag capacity problems
    pub fn try_tags(self, tags: &[Tag]) -> Result<Self, SegmentError> {
        self.table.try_add_tags(self.id, tags)?;
        Ok(self)
    }
}

impl<const SEGMENTS: usize> From<SegmentMut<'_, SEGMENTS>> for SegmentId {
    fn from(segment: SegmentMut<'_, SEGMENTS>) -> Self {
        segment.id
    }
}
