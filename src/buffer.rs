use crate::color::Rgb;
use crate::segment::{SegmentConfig, SegmentId};

/// Several segments presented as one contiguous strip
///
/// Index 0 is the first pixel of the first member segment, counting
/// through every member in order. Writes outside the view are dropped.
pub struct SegmentBuffer<'a> {
    frame: &'a mut [Rgb],
    segments: &'a [SegmentConfig],
    members: &'a [SegmentId],
}

impl<'a> SegmentBuffer<'a> {
    pub(crate) fn new(
        frame: &'a mut [Rgb],
        segments: &'a [SegmentConfig],
        members: &'a [SegmentId],
    ) -> Self {
        Self {
            frame,
            segments,
            members,
        }
    }

    fn configs(&self) -> impl Iterator<Item = &'a SegmentConfig> + use<'a> {
        let segments = self.segments;
        let members = self.members;
        members
            .iter()
            .filter_map(move |id| segments.get(id.index()))
    }

    /// Set the LED at `index`
    pub fn set(&mut self, index: usize, color: Rgb) {
        let mut index = index;
        for conf in self.configs() {
            if index < conf.length() {
                conf.update(index, color, self.segments, self.frame);
                return;
            }
            index -= conf.length();
        }
    }

    /// Set every LED of the view
    pub fn set_all(&mut self, color: Rgb) {
        for conf in self.configs() {
            for i in 0..conf.length() {
                conf.update(i, color, self.segments, self.frame);
            }
        }
    }

    /// Total length of all member segments
    pub fn len(&self) -> usize {
        self.configs().map(SegmentConfig::length).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member segments, in order
    pub fn segments(&self) -> &[SegmentId] {
        self.members
    }
}
