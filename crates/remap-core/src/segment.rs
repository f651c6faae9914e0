use serde::{Deserialize, Serialize};

/// Which document's coordinate space an offset is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Source,
    Generated,
}

/// One correspondence record: a contiguous span of the source document
/// linked to a contiguous span of the generated document. Lengths may
/// differ (token expansion); a zero-length span is an anchor only, never
/// a translation target range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub source_start: usize,
    pub source_len: usize,
    pub generated_start: usize,
    pub generated_len: usize,
}

impl Segment {
    pub fn new(
        source_start: usize,
        source_len: usize,
        generated_start: usize,
        generated_len: usize,
    ) -> Self {
        Self {
            source_start,
            source_len,
            generated_start,
            generated_len,
        }
    }

    /// Identity-length segment covering the same span in both documents.
    pub fn identity(start: usize, len: usize) -> Self {
        Self::new(start, len, start, len)
    }

    pub fn start(&self, direction: Direction) -> usize {
        match direction {
            Direction::Source => self.source_start,
            Direction::Generated => self.generated_start,
        }
    }

    pub fn len(&self, direction: Direction) -> usize {
        match direction {
            Direction::Source => self.source_len,
            Direction::Generated => self.generated_len,
        }
    }

    /// Half-open containment in the given coordinate space.
    pub fn contains(&self, offset: usize, direction: Direction) -> bool {
        let start = self.start(direction);
        offset >= start && offset < start + self.len(direction)
    }

    /// Closed-boundary containment: also accepts the offset exactly at the
    /// span end, so positions immediately after a token still resolve.
    pub fn touches(&self, offset: usize, direction: Direction) -> bool {
        let start = self.start(direction);
        offset >= start && offset <= start + self.len(direction)
    }
}

/// Ordered collection of segments. Stored ascending by generated start; a
/// secondary index sorted by source start serves the reverse direction, so
/// lookups in either space are a scan over that space's own ordering and
/// first-match behavior is deterministic.
#[derive(Debug, Default, Clone)]
pub struct SegmentTable {
    /// Sorted ascending by `generated_start`.
    segments: Vec<Segment>,
    /// Indices into `segments`, sorted ascending by `source_start`.
    by_source: Vec<usize>,
}

impl SegmentTable {
    pub fn new(mut segments: Vec<Segment>) -> Self {
        segments.sort_by_key(|s| s.generated_start);
        debug_assert!(
            segments
                .windows(2)
                .all(|w| w[0].generated_start + w[0].generated_len <= w[1].generated_start),
            "segments overlap in generated space"
        );
        let mut by_source: Vec<usize> = (0..segments.len()).collect();
        by_source.sort_by_key(|&i| segments[i].source_start);
        debug_assert!(
            by_source.windows(2).all(|w| {
                let a = &segments[w[0]];
                a.source_start + a.source_len <= segments[w[1]].source_start
            }),
            "segments overlap in source space"
        );
        Self { segments, by_source }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Find the segment covering `offset` in the given coordinate space:
    /// the first segment (in that space's ordering) whose half-open span
    /// contains the offset, or failing that the first whose closed end
    /// touches it. `None` means the offset falls in text present in one
    /// document but absent in the other.
    pub fn find(&self, offset: usize, direction: Direction) -> Option<&Segment> {
        let contained = self
            .iter_ordered(direction)
            .find(|s| s.contains(offset, direction));
        match contained {
            Some(s) => Some(s),
            None => self
                .iter_ordered(direction)
                .find(|s| s.touches(offset, direction)),
        }
    }

    fn iter_ordered(&self, direction: Direction) -> impl Iterator<Item = &Segment> + '_ {
        let table = &self.segments;
        let order: Box<dyn Iterator<Item = &Segment> + '_> = match direction {
            Direction::Generated => Box::new(table.iter()),
            Direction::Source => Box::new(self.by_source.iter().map(move |&i| &table[i])),
        };
        order
    }
}
