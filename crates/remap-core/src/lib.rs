//! Remap Core Library
//!
//! Position/range mapping engine for derived documents: a feature request
//! made against an authored "source" document is answered by an analyzer
//! that only understands a mechanically generated counterpart. The engine
//! builds the correspondence table between the two, translates positions
//! both ways and rewrites analyzer results back into source coordinates.
//! No IO dependencies, pure logic only.

pub mod cache;
pub mod forward;
pub mod generate;
pub mod line_map;
pub mod model;
pub mod segment;
pub mod shorthand;
pub mod transform;
pub mod translate;

pub use cache::PairCache;
pub use forward::{CapabilitySet, Forwarder, RequestKind};
pub use generate::{GenerateError, GeneratedContent, Generator};
pub use model::{Document, DocumentId, DocumentPair, OffsetRange, Point};
pub use segment::{Direction, Segment, SegmentTable};
pub use shorthand::ShorthandGenerator;
pub use transform::AnalyzerResult;
