//! Offset and range translation over a segment table.
//!
//! Both directions share one rule: find the covering segment, take the
//! relative offset `k` into it, and land at `mirror_start + min(k, mirror_len)`.
//! The clamp handles expanding/contracting segments (a short source token
//! mapped to a longer generated one, or vice versa): any interior offset
//! past the mirror span's extent clamps to its end. Generators that need
//! finer interior mapping should emit finer segments instead.

use crate::model::OffsetRange;
use crate::segment::{Direction, SegmentTable};

/// Translates offsets and ranges between a document pair's two coordinate
/// spaces. Borrowing view over a segment table; cheap to construct.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    table: &'a SegmentTable,
}

impl<'a> Translator<'a> {
    pub fn new(table: &'a SegmentTable) -> Self {
        Self { table }
    }

    pub fn to_generated(&self, source_offset: usize) -> Option<usize> {
        self.translate(source_offset, Direction::Source)
    }

    pub fn to_source(&self, generated_offset: usize) -> Option<usize> {
        self.translate(generated_offset, Direction::Generated)
    }

    /// Translate a range by translating both endpoints independently.
    /// `None` if either endpoint is unmapped; partial ranges are the
    /// caller's policy decision, not this layer's.
    pub fn range_to_generated(&self, range: OffsetRange) -> Option<OffsetRange> {
        let start = self.to_generated(range.start)?;
        let end = self.to_generated(range.end)?;
        Some(OffsetRange::new(start, end))
    }

    pub fn range_to_source(&self, range: OffsetRange) -> Option<OffsetRange> {
        let start = self.to_source(range.start)?;
        let end = self.to_source(range.end)?;
        Some(OffsetRange::new(start, end))
    }

    fn translate(&self, offset: usize, direction: Direction) -> Option<usize> {
        let seg = self.table.find(offset, direction)?;
        let mirror = match direction {
            Direction::Source => Direction::Generated,
            Direction::Generated => Direction::Source,
        };
        let k = offset - seg.start(direction);
        Some(seg.start(mirror) + k.min(seg.len(mirror)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    fn table(segments: Vec<Segment>) -> SegmentTable {
        SegmentTable::new(segments)
    }

    #[test]
    fn round_trip_within_segment() {
        let table = table(vec![Segment::new(10, 8, 40, 8)]);
        let tr = Translator::new(&table);
        for k in 0..=8 {
            let gen = tr.to_generated(10 + k).unwrap();
            assert_eq!(tr.to_source(gen), Some(10 + k));
        }
    }

    #[test]
    fn identity_map_is_a_no_op() {
        let table = table(vec![Segment::identity(0, 4)]);
        let tr = Translator::new(&table);
        assert_eq!(tr.to_generated(2), Some(2));
        assert_eq!(tr.to_source(2), Some(2));
    }

    #[test]
    fn unmapped_offset_is_none() {
        let table = table(vec![Segment::new(0, 3, 0, 3)]);
        let tr = Translator::new(&table);
        assert_eq!(tr.to_generated(10), None);
    }

    #[test]
    fn expansion_clamps_to_mirror_end() {
        // "<div>" (5 chars) expands to "<div></div>" (11 chars).
        let table = table(vec![Segment::new(0, 5, 0, 11)]);
        let tr = Translator::new(&table);
        assert_eq!(tr.to_generated(1), Some(1));
        // Generated offsets past the source span clamp to its end.
        assert_eq!(tr.to_source(4), Some(4));
        assert_eq!(tr.to_source(9), Some(5));
        assert_eq!(
            tr.range_to_source(OffsetRange::new(0, 4)),
            Some(OffsetRange::new(0, 4))
        );
        assert_eq!(
            tr.range_to_source(OffsetRange::new(0, 11)),
            Some(OffsetRange::new(0, 5))
        );
    }

    #[test]
    fn range_with_unmapped_endpoint_is_none() {
        let table = table(vec![Segment::new(0, 3, 0, 3)]);
        let tr = Translator::new(&table);
        assert_eq!(tr.range_to_generated(OffsetRange::new(1, 9)), None);
    }

    #[test]
    fn boundary_offset_translates_via_touch() {
        let table = table(vec![Segment::new(0, 4, 10, 4)]);
        let tr = Translator::new(&table);
        // Offset exactly at the segment end still resolves.
        assert_eq!(tr.to_generated(4), Some(14));
    }
}
