use serde::{Deserialize, Serialize};

use crate::segment::SegmentTable;

/// Opaque document identity, assigned by the host (typically a URI string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Core internal coordinate system (0-based, col in UTF-16 code units)
/// Does not directly use LSP Position to avoid coupling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub col: usize,
}

/// Half-open byte-offset range `[start, end)` into a document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// A versioned document text. The source document is owned by the caller
/// and immutable during one request; generated documents are owned by the
/// cache and rebuilt whenever the source revision advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub revision: u64,
    pub text: String,
}

impl Document {
    pub fn new(id: DocumentId, revision: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            revision,
            text: text.into(),
        }
    }
}

/// A source document, its generated counterpart and the segment table
/// relating them. Replaced wholesale when the source revision changes,
/// never patched in place, so concurrent readers see either the old
/// complete pair or the new one.
#[derive(Debug)]
pub struct DocumentPair {
    pub source: Document,
    pub generated: Document,
    pub segments: SegmentTable,
}
