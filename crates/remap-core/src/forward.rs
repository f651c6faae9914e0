//! Feature forwarder: orchestrates one request against a derived document.
//!
//! Obtain the document pair (regenerating it if the revision advanced),
//! translate the request position into generated coordinates, run the
//! analyzer on the generated document, and pass the raw result back through
//! the transformers. The forwarder only owns its own translation gaps;
//! analyzer-level failures stay with the calling adapter.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::PairCache;
use crate::generate::Generator;
use crate::model::{Document, DocumentId, DocumentPair, OffsetRange};
use crate::transform::{self, AnalyzerResult};
use crate::translate::Translator;

/// The request families the engine forwards. An adapter declares which of
/// these its analyzer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Completion,
    Hover,
    Definition,
    References,
    Highlights,
    Rename,
    SelectionRange,
    Folding,
    DocumentLinks,
}

impl RequestKind {
    /// Result shapes an analyzer may return for this request family.
    fn accepts(self, result: &AnalyzerResult) -> bool {
        matches!(
            (self, result),
            (RequestKind::Completion, AnalyzerResult::Completions(_))
                | (RequestKind::Hover, AnalyzerResult::Hover(_))
                | (
                    RequestKind::Definition,
                    AnalyzerResult::Links(_) | AnalyzerResult::Locations(_)
                )
                | (RequestKind::References, AnalyzerResult::Locations(_))
                | (RequestKind::Highlights, AnalyzerResult::Highlights(_))
                | (
                    RequestKind::Rename,
                    AnalyzerResult::Locations(_) | AnalyzerResult::Range(_)
                )
                | (RequestKind::SelectionRange, AnalyzerResult::SelectionRanges(_))
                | (RequestKind::Folding, AnalyzerResult::FoldingRanges(_))
                | (RequestKind::DocumentLinks, AnalyzerResult::Locations(_))
        )
    }
}

/// Supported request kinds of one analyzer integration, declared once at
/// registration time instead of probed per call.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    kinds: HashSet<RequestKind>,
}

impl CapabilitySet {
    pub fn new(kinds: impl IntoIterator<Item = RequestKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn supports(&self, kind: RequestKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Owns the generator strategy and the pair cache; one per source format.
pub struct Forwarder {
    generator: Box<dyn Generator>,
    cache: PairCache,
}

impl Forwarder {
    pub fn new(generator: Box<dyn Generator>) -> Self {
        Self {
            generator,
            cache: PairCache::new(),
        }
    }

    /// Forward a point request. `None` covers three indistinguishable
    /// cases by design: generation failed for this revision, the position
    /// has no generated counterpart (the analyzer is never called), or the
    /// analyzer found nothing.
    pub fn forward<F>(
        &mut self,
        kind: RequestKind,
        source: &Document,
        source_offset: usize,
        analyze: F,
    ) -> Option<AnalyzerResult>
    where
        F: FnOnce(&DocumentPair, usize) -> Option<AnalyzerResult>,
    {
        let pair = self.cache.get(source, self.generator.as_ref())?;
        let offset = Translator::new(&pair.segments).to_generated(source_offset)?;
        let raw = analyze(&pair, offset)?;
        debug_assert!(
            kind.accepts(&raw),
            "analyzer result shape does not fit {kind:?}"
        );
        let lookup = |id: &DocumentId| self.cache.cached(id);
        transform::to_source(raw, &pair, &lookup)
    }

    /// Range variant: both endpoints are translated before the analyzer
    /// runs, and either endpoint being unmapped short-circuits.
    pub fn forward_range<F>(
        &mut self,
        kind: RequestKind,
        source: &Document,
        source_range: OffsetRange,
        analyze: F,
    ) -> Option<AnalyzerResult>
    where
        F: FnOnce(&DocumentPair, OffsetRange) -> Option<AnalyzerResult>,
    {
        let pair = self.cache.get(source, self.generator.as_ref())?;
        let range = Translator::new(&pair.segments).range_to_generated(source_range)?;
        let raw = analyze(&pair, range)?;
        debug_assert!(
            kind.accepts(&raw),
            "analyzer result shape does not fit {kind:?}"
        );
        let lookup = |id: &DocumentId| self.cache.cached(id);
        transform::to_source(raw, &pair, &lookup)
    }

    /// Batch variant for multi-position requests (selection ranges at
    /// several cursors). Each position translates independently; the output
    /// is merged positionally, so `result[i]` always answers `offsets[i]`.
    pub fn forward_batch<F>(
        &mut self,
        kind: RequestKind,
        source: &Document,
        offsets: &[usize],
        analyze: F,
    ) -> Vec<Option<AnalyzerResult>>
    where
        F: Fn(&DocumentPair, usize) -> Option<AnalyzerResult>,
    {
        let Some(pair) = self.cache.get(source, self.generator.as_ref()) else {
            return offsets.iter().map(|_| None).collect();
        };
        let tr = Translator::new(&pair.segments);
        offsets
            .iter()
            .map(|&source_offset| {
                let offset = tr.to_generated(source_offset)?;
                let raw = analyze(&pair, offset)?;
                debug_assert!(
                    kind.accepts(&raw),
                    "analyzer result shape does not fit {kind:?}"
                );
                let lookup = |id: &DocumentId| self.cache.cached(id);
                transform::to_source(raw, &pair, &lookup)
            })
            .collect()
    }

    /// Direct pair access for non-positional queries (document links,
    /// folding over the whole document).
    pub fn pair(&mut self, source: &Document) -> Option<Arc<DocumentPair>> {
        self.cache.get(source, self.generator.as_ref())
    }

    /// Pair already cached for `id`, without regenerating.
    pub fn cached(&self, id: &DocumentId) -> Option<Arc<DocumentPair>> {
        self.cache.cached(id)
    }

    /// Parsed-structure cache passthrough; see [`PairCache::parsed_or_insert`].
    pub fn parsed_or_insert<F>(
        &mut self,
        id: &DocumentId,
        revision: u64,
        build: F,
    ) -> Option<Arc<dyn Any + Send + Sync>>
    where
        F: FnOnce(&DocumentPair) -> Arc<dyn Any + Send + Sync>,
    {
        self.cache.parsed_or_insert(id, revision, build)
    }

    /// Evict the cached pair for a closed document.
    pub fn close(&mut self, id: &DocumentId) {
        self.cache.remove(id);
    }
}
