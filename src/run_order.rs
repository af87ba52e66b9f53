use heapless::Vec;

use crate::pattern::PatternId;
use crate::segment::SegmentId;

/// One render pass: a pattern and every segment it drives
#[derive(Debug, Clone)]
pub struct RunOrder<const SEGMENTS: usize> {
    pattern: PatternId,
    segments: Vec<SegmentId, SEGMENTS>,
}

impl<const SEGMENTS: usize> RunOrder<SEGMENTS> {
    pub const fn pattern(&self) -> PatternId {
        self.pattern
    }

    /// Segments of the pass, in creation order
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }
}

/// Rebuild the run order from the per-segment assignment
///
/// `assignments[i]` is the pattern driving segment `i`. Segments sharing a
/// pattern are grouped into one pass; passes appear in the order their first
/// segment was created. Unassigned segments are skipped.
pub(crate) fn recalculate<const SEGMENTS: usize>(
    assignments: &[Option<PatternId>],
    run_order: &mut Vec<RunOrder<SEGMENTS>, SEGMENTS>,
) {
    run_order.clear();
    for (i, assigned) in assignments.iter().enumerate() {
        let Some(pattern) = *assigned else {
            continue;
        };
        if run_order.iter().any(|order| order.pattern == pattern) {
            continue;
        }
        let mut segments = Vec::new();
        for (j, other) in assignments.iter().enumerate().skip(i) {
            if *other == Some(pattern) {
                // At most one entry per segment
                let _ = segments.push(SegmentId::from_index(j));
            }
        }
        // At most one pass per segment
        let _ = run_order.push(RunOrder { pattern, segments });
    }
}
