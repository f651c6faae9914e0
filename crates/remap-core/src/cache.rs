use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::generate::Generator;
use crate::model::{Document, DocumentId, DocumentPair};

/// One generated document per live source identity. A failed generation is
/// remembered for its revision so a broken document does not re-run the
/// generator on every request; any revision bump retries.
enum PairSlot {
    Ready(Arc<DocumentPair>),
    Failed,
}

struct Entry {
    revision: u64,
    pair: PairSlot,
    /// Analyzer-specific parse of the generated document, built on demand
    /// and invalidated with the pair.
    parsed: Option<Arc<dyn Any + Send + Sync>>,
}

/// Per-identity cache of document pairs, keyed by `(identity, revision)`.
/// An entry is superseded wholesale when the revision advances; old pairs
/// are dropped, never patched, so concurrent holders of the old `Arc` keep
/// a complete consistent pair.
#[derive(Default)]
pub struct PairCache {
    entries: HashMap<DocumentId, Entry>,
}

impl PairCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pair for `source`, generating it if the cached one is
    /// missing or stale. `None` means the generator failed for this
    /// revision; the condition clears itself on the next revision that
    /// generates successfully.
    pub fn get(
        &mut self,
        source: &Document,
        generator: &dyn Generator,
    ) -> Option<Arc<DocumentPair>> {
        if let Some(entry) = self.entries.get(&source.id) {
            if entry.revision == source.revision {
                return match &entry.pair {
                    PairSlot::Ready(pair) => Some(pair.clone()),
                    PairSlot::Failed => None,
                };
            }
        }

        let slot = match generator.generate(&source.text) {
            Ok(content) => PairSlot::Ready(Arc::new(DocumentPair {
                source: source.clone(),
                generated: Document::new(source.id.clone(), source.revision, content.text),
                segments: content.segments,
            })),
            Err(_) => PairSlot::Failed,
        };

        let result = match &slot {
            PairSlot::Ready(pair) => Some(pair.clone()),
            PairSlot::Failed => None,
        };
        self.entries.insert(
            source.id.clone(),
            Entry {
                revision: source.revision,
                pair: slot,
                parsed: None,
            },
        );
        result
    }

    /// Pair already cached for `id`, at whatever revision the cache holds.
    /// Used to resolve cross-document results without regenerating.
    pub fn cached(&self, id: &DocumentId) -> Option<Arc<DocumentPair>> {
        match &self.entries.get(id)?.pair {
            PairSlot::Ready(pair) => Some(pair.clone()),
            PairSlot::Failed => None,
        }
    }

    /// Parsed structure for `(id, revision)`, built once per revision.
    /// `None` if no pair is cached at that revision (including failed
    /// generations; there is nothing to parse).
    pub fn parsed_or_insert<F>(
        &mut self,
        id: &DocumentId,
        revision: u64,
        build: F,
    ) -> Option<Arc<dyn Any + Send + Sync>>
    where
        F: FnOnce(&DocumentPair) -> Arc<dyn Any + Send + Sync>,
    {
        let entry = self.entries.get_mut(id)?;
        if entry.revision != revision {
            return None;
        }
        let pair = match &entry.pair {
            PairSlot::Ready(pair) => pair.clone(),
            PairSlot::Failed => return None,
        };
        if entry.parsed.is_none() {
            entry.parsed = Some(build(&pair));
        }
        entry.parsed.clone()
    }

    /// Explicit eviction, called when the host signals the document closed.
    pub fn remove(&mut self, id: &DocumentId) {
        self.entries.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::generate::{GenerateError, GeneratedContent};
    use crate::segment::{Segment, SegmentTable};

    struct CountingGenerator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingGenerator {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Generator for CountingGenerator {
        fn generate(&self, source: &str) -> Result<GeneratedContent, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GenerateError::Other("boom".into()));
            }
            Ok(GeneratedContent {
                text: source.to_string(),
                segments: SegmentTable::new(vec![Segment::identity(0, source.len())]),
            })
        }
    }

    fn doc(revision: u64) -> Document {
        Document::new(DocumentId::new("mem://a"), revision, "abcd")
    }

    #[test]
    fn same_revision_generates_once_and_shares_the_pair() {
        let gen = CountingGenerator::new(false);
        let mut cache = PairCache::new();
        let first = cache.get(&doc(1), &gen).unwrap();
        let second = cache.get(&doc(1), &gen).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(gen.calls(), 1);
    }

    #[test]
    fn revision_bump_regenerates_and_evicts() {
        let gen = CountingGenerator::new(false);
        let mut cache = PairCache::new();
        let old = cache.get(&doc(1), &gen).unwrap();
        let new = cache.get(&doc(2), &gen).unwrap();
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(new.source.revision, 2);
        assert_eq!(gen.calls(), 2);
    }

    #[test]
    fn failure_is_memoized_per_revision() {
        let gen = CountingGenerator::new(true);
        let mut cache = PairCache::new();
        assert!(cache.get(&doc(1), &gen).is_none());
        assert!(cache.get(&doc(1), &gen).is_none());
        assert_eq!(gen.calls(), 1);
        // A new revision retries.
        assert!(cache.get(&doc(2), &gen).is_none());
        assert_eq!(gen.calls(), 2);
    }

    #[test]
    fn parsed_structure_is_built_once_per_revision() {
        let gen = CountingGenerator::new(false);
        let mut cache = PairCache::new();
        let source = doc(1);
        cache.get(&source, &gen).unwrap();

        let builds = AtomicUsize::new(0);
        let build = |pair: &DocumentPair| -> Arc<dyn std::any::Any + Send + Sync> {
            builds.fetch_add(1, Ordering::SeqCst);
            Arc::new(pair.generated.text.len())
        };
        let a = cache.parsed_or_insert(&source.id, 1, build).unwrap();
        let b = cache
            .parsed_or_insert(&source.id, 1, |pair| {
                builds.fetch_add(1, Ordering::SeqCst);
                Arc::new(pair.generated.text.len())
            })
            .unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(a.downcast_ref::<usize>(), b.downcast_ref::<usize>());

        // Stale revision yields nothing.
        assert!(cache
            .parsed_or_insert(&source.id, 2, |_| Arc::new(()))
            .is_none());
    }

    #[test]
    fn remove_drops_the_entry() {
        let gen = CountingGenerator::new(false);
        let mut cache = PairCache::new();
        let source = doc(1);
        cache.get(&source, &gen).unwrap();
        cache.remove(&source.id);
        assert!(cache.cached(&source.id).is_none());
        cache.get(&source, &gen).unwrap();
        assert_eq!(gen.calls(), 2);
    }
}
