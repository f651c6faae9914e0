//! Result transformers: rewrite every position/range embedded in an
//! analyzer result from generated coordinates back into source
//! coordinates, one transformer per result shape.
//!
//! Shared policy: inside multi-element results each element is translated
//! independently and unmapped elements are dropped without voiding their
//! siblings; shapes whose text payload is still useful without a range
//! (completion items, hover) keep the payload with the range cleared.

use std::sync::Arc;

use serde_json::Value;

use crate::model::{DocumentId, DocumentPair, OffsetRange};
use crate::translate::Translator;

/// A range in a named document; the identity may differ from the document
/// the request was made against (cross-document jump targets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub document: DocumentId,
    pub range: OffsetRange,
}

/// Jump target plus an optional origin selection range in the calling
/// document. The two sides translate through different document pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLink {
    pub origin: Option<OffsetRange>,
    pub target: Location,
    pub target_selection: Option<OffsetRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Text,
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub range: OffsetRange,
    pub kind: HighlightKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionItem {
    pub label: String,
    pub detail: Option<String>,
    /// Range replaced on plain insertion. `None` after transformation
    /// means the range was synthesized by the generator and has no source
    /// counterpart; the caller falls back to its own anchor.
    pub insert_range: Option<OffsetRange>,
    /// Distinct replace range where the format distinguishes the two.
    pub replace_range: Option<OffsetRange>,
    /// Opaque payload carried through untouched.
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionList {
    pub is_incomplete: bool,
    pub items: Vec<CompletionItem>,
}

/// Markup payload anchored at a range. The content never carries
/// positions, so only the anchor is translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub contents: String,
    pub range: Option<OffsetRange>,
}

/// Innermost-first chain of enclosing ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRange {
    pub range: OffsetRange,
    pub parent: Option<Box<SelectionRange>>,
}

/// Raw analyzer results, one variant per shape the transformers handle.
/// Selected by a single dispatch at the forwarder boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerResult {
    Range(OffsetRange),
    Locations(Vec<Location>),
    Links(Vec<LocationLink>),
    Highlights(Vec<Highlight>),
    Completions(CompletionList),
    Hover(Hover),
    SelectionRanges(Vec<SelectionRange>),
    FoldingRanges(Vec<OffsetRange>),
}

/// Resolves the document pair of another identity, for results whose
/// target lives in a different document than the request's.
pub type PairLookup<'a> = dyn Fn(&DocumentId) -> Option<Arc<DocumentPair>> + 'a;

/// Rewrite `result` into source coordinates of `pair` (and, for
/// cross-document targets, of the pairs `lookup` resolves). `None` means
/// the whole result fell outside the mapped segments.
pub fn to_source(
    result: AnalyzerResult,
    pair: &DocumentPair,
    lookup: &PairLookup<'_>,
) -> Option<AnalyzerResult> {
    let tr = Translator::new(&pair.segments);
    match result {
        AnalyzerResult::Range(range) => tr.range_to_source(range).map(AnalyzerResult::Range),
        AnalyzerResult::Locations(locations) => Some(AnalyzerResult::Locations(
            locations
                .into_iter()
                .filter_map(|l| location(l, pair, lookup))
                .collect(),
        )),
        AnalyzerResult::Links(links) => Some(AnalyzerResult::Links(
            links
                .into_iter()
                .filter_map(|l| link(l, &tr, pair, lookup))
                .collect(),
        )),
        AnalyzerResult::Highlights(highlights) => Some(AnalyzerResult::Highlights(
            highlights
                .into_iter()
                .filter_map(|h| {
                    Some(Highlight {
                        range: tr.range_to_source(h.range)?,
                        kind: h.kind,
                    })
                })
                .collect(),
        )),
        AnalyzerResult::Completions(list) => Some(AnalyzerResult::Completions(CompletionList {
            is_incomplete: list.is_incomplete,
            items: list.items.into_iter().map(|i| completion_item(i, &tr)).collect(),
        })),
        AnalyzerResult::Hover(h) => Some(AnalyzerResult::Hover(Hover {
            contents: h.contents,
            range: h.range.and_then(|r| tr.range_to_source(r)),
        })),
        AnalyzerResult::SelectionRanges(chains) => Some(AnalyzerResult::SelectionRanges(
            chains
                .into_iter()
                .filter_map(|c| selection_chain(c, &tr))
                .collect(),
        )),
        AnalyzerResult::FoldingRanges(ranges) => Some(AnalyzerResult::FoldingRanges(
            ranges
                .into_iter()
                .filter_map(|r| tr.range_to_source(r))
                .collect(),
        )),
    }
}

fn location(
    loc: Location,
    request_pair: &DocumentPair,
    lookup: &PairLookup<'_>,
) -> Option<Location> {
    let range = if loc.document == request_pair.source.id {
        Translator::new(&request_pair.segments).range_to_source(loc.range)?
    } else {
        let target_pair = lookup(&loc.document)?;
        Translator::new(&target_pair.segments).range_to_source(loc.range)?
    };
    Some(Location {
        document: loc.document,
        range,
    })
}

fn link(
    link: LocationLink,
    origin_tr: &Translator<'_>,
    request_pair: &DocumentPair,
    lookup: &PairLookup<'_>,
) -> Option<LocationLink> {
    // Origin translates through the request's own pair, the target through
    // the target document's; the two are independent.
    let origin = match link.origin {
        Some(range) => Some(origin_tr.range_to_source(range)?),
        None => None,
    };
    let target = location(link.target, request_pair, lookup)?;
    let target_selection = link.target_selection.and_then(|range| {
        if target.document == request_pair.source.id {
            origin_tr.range_to_source(range)
        } else {
            let pair = lookup(&target.document)?;
            Translator::new(&pair.segments).range_to_source(range)
        }
    });
    Some(LocationLink {
        origin,
        target,
        target_selection,
    })
}

fn completion_item(item: CompletionItem, tr: &Translator<'_>) -> CompletionItem {
    // A fully synthesized range (a placeholder the generator inserted to
    // coax a completion) has no source counterpart; keep the suggestion
    // with the range cleared rather than dropping it.
    CompletionItem {
        insert_range: item.insert_range.and_then(|r| tr.range_to_source(r)),
        replace_range: item.replace_range.and_then(|r| tr.range_to_source(r)),
        ..item
    }
}

fn selection_chain(chain: SelectionRange, tr: &Translator<'_>) -> Option<SelectionRange> {
    // Walk toward the root until a mapped node is found, then keep mapping
    // the remaining ancestors; never truncate without trying the parents.
    let mut node = Some(Box::new(chain));
    while let Some(current) = node {
        if let Some(range) = tr.range_to_source(current.range) {
            let parent = current
                .parent
                .and_then(|p| selection_chain(*p, tr))
                .map(Box::new);
            return Some(SelectionRange { range, parent });
        }
        node = current.parent;
    }
    None
}
