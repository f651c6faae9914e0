//! Conversion between the core's byte-offset types and LSP positional
//! types. LSP positions are 0-based lines with UTF-16 code-unit columns;
//! the core works in byte offsets into the source text.

use remap_core::line_map::LineMap;
use remap_core::model::{OffsetRange, Point};
use remap_core::transform::{
    CompletionList as CoreCompletionList, Highlight as CoreHighlight, HighlightKind,
    Hover as CoreHover, Location as CoreLocation, LocationLink as CoreLocationLink,
    SelectionRange as CoreSelectionRange,
};
use tower_lsp::lsp_types::*;
use url::Url;

pub fn position_to_offset(text: &str, position: Position) -> Option<usize> {
    LineMap::new(text).point_to_offset(
        text,
        Point {
            line: position.line as usize,
            col: position.character as usize,
        },
    )
}

pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let point = LineMap::new(text).offset_to_point(text, offset);
    Position {
        line: point.line as u32,
        character: point.col as u32,
    }
}

pub fn range_to_lsp(text: &str, range: OffsetRange) -> Range {
    Range {
        start: offset_to_position(text, range.start),
        end: offset_to_position(text, range.end),
    }
}

pub fn hover_to_lsp(text: &str, hover: CoreHover) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: hover.contents,
        }),
        range: hover.range.map(|r| range_to_lsp(text, r)),
    }
}

/// Items whose ranges were cleared during translation (synthesized in
/// the generated document) become plain label completions; the client
/// falls back to its own word boundary. `keep_synthesized` drops them
/// instead when the client handles rangeless items poorly.
pub fn completions_to_lsp(
    text: &str,
    list: CoreCompletionList,
    keep_synthesized: bool,
    limit: usize,
) -> CompletionResponse {
    let items = list
        .items
        .into_iter()
        .filter(|item| keep_synthesized || item.insert_range.is_some())
        .take(limit)
        .map(|item| {
            let text_edit = match (item.insert_range, item.replace_range) {
                (Some(insert), Some(replace)) if insert != replace => {
                    Some(CompletionTextEdit::InsertAndReplace(InsertReplaceEdit {
                        new_text: item.label.clone(),
                        insert: range_to_lsp(text, insert),
                        replace: range_to_lsp(text, replace),
                    }))
                }
                (Some(range), _) => Some(CompletionTextEdit::Edit(TextEdit {
                    range: range_to_lsp(text, range),
                    new_text: item.label.clone(),
                })),
                (None, _) => None,
            };
            CompletionItem {
                label: item.label,
                detail: item.detail,
                text_edit,
                data: item.data,
                ..Default::default()
            }
        })
        .collect();
    CompletionResponse::List(tower_lsp::lsp_types::CompletionList {
        is_incomplete: list.is_incomplete,
        items,
    })
}

/// Resolves the source text a location's offsets refer to. Cross-document
/// results need the target document's text, not the request's.
pub trait TextLookup {
    fn text_of(&self, id: &str) -> Option<&str>;
}

/// Lookup over the requesting document only. A target in any other
/// document resolves to `None` and drops, rather than having its offsets
/// interpreted against the wrong text.
pub struct RequestText<'a> {
    pub id: &'a str,
    pub text: &'a str,
}

impl TextLookup for RequestText<'_> {
    fn text_of(&self, id: &str) -> Option<&str> {
        (id == self.id).then_some(self.text)
    }
}

pub fn location_to_lsp(lookup: &impl TextLookup, location: CoreLocation) -> Option<Location> {
    let uri = Url::parse(location.document.as_str()).ok()?;
    let text = lookup.text_of(location.document.as_str())?;
    Some(Location {
        uri,
        range: range_to_lsp(text, location.range),
    })
}

pub fn link_to_lsp(
    origin_text: &str,
    lookup: &impl TextLookup,
    link: CoreLocationLink,
) -> Option<LocationLink> {
    let uri = Url::parse(link.target.document.as_str()).ok()?;
    let target_text = lookup.text_of(link.target.document.as_str())?;
    let target_range = range_to_lsp(target_text, link.target.range);
    Some(LocationLink {
        origin_selection_range: link.origin.map(|r| range_to_lsp(origin_text, r)),
        target_uri: uri,
        target_range,
        target_selection_range: link
            .target_selection
            .map(|r| range_to_lsp(target_text, r))
            .unwrap_or(target_range),
    })
}

pub fn highlight_to_lsp(text: &str, highlight: CoreHighlight) -> DocumentHighlight {
    DocumentHighlight {
        range: range_to_lsp(text, highlight.range),
        kind: Some(match highlight.kind {
            HighlightKind::Text => DocumentHighlightKind::TEXT,
            HighlightKind::Read => DocumentHighlightKind::READ,
            HighlightKind::Write => DocumentHighlightKind::WRITE,
        }),
    }
}

pub fn selection_to_lsp(text: &str, chain: CoreSelectionRange) -> SelectionRange {
    SelectionRange {
        range: range_to_lsp(text, chain.range),
        parent: chain.parent.map(|p| Box::new(selection_to_lsp(text, *p))),
    }
}

pub fn folding_to_lsp(text: &str, range: OffsetRange) -> FoldingRange {
    let lsp = range_to_lsp(text, range);
    FoldingRange {
        start_line: lsp.start.line,
        start_character: Some(lsp.start.character),
        end_line: lsp.end.line,
        end_character: Some(lsp.end.character),
        kind: Some(FoldingRangeKind::Region),
        collapsed_text: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remap_core::model::DocumentId;

    #[test]
    fn locations_outside_the_request_document_are_dropped() {
        let lookup = RequestText {
            id: "file:///page.short",
            text: "div Hello",
        };
        let own = CoreLocation {
            document: DocumentId::new("file:///page.short"),
            range: OffsetRange::new(0, 3),
        };
        let converted = location_to_lsp(&lookup, own).unwrap();
        assert_eq!(converted.range.end.character, 3);

        // A foreign target must not have its offsets interpreted against
        // the requesting document's text.
        let foreign = CoreLocation {
            document: DocumentId::new("file:///other.short"),
            range: OffsetRange::new(0, 3),
        };
        assert!(location_to_lsp(&lookup, foreign).is_none());
    }

    #[test]
    fn positions_round_trip_through_offsets() {
        let text = "div\n  p Hello\n";
        let position = Position {
            line: 1,
            character: 4,
        };
        let offset = position_to_offset(text, position).unwrap();
        assert_eq!(offset, 8);
        assert_eq!(offset_to_position(text, offset), position);
    }

    #[test]
    fn synthesized_completion_items_can_be_dropped() {
        let list = CoreCompletionList {
            is_incomplete: false,
            items: vec![
                remap_core::transform::CompletionItem {
                    label: "mapped".into(),
                    detail: None,
                    insert_range: Some(OffsetRange::new(0, 2)),
                    replace_range: None,
                    data: None,
                },
                remap_core::transform::CompletionItem {
                    label: "synthesized".into(),
                    detail: None,
                    insert_range: None,
                    replace_range: None,
                    data: None,
                },
            ],
        };

        let CompletionResponse::List(kept) =
            completions_to_lsp("ab", list.clone(), true, 50)
        else {
            panic!("expected list");
        };
        assert_eq!(kept.items.len(), 2);
        assert!(kept.items[1].text_edit.is_none());

        let CompletionResponse::List(dropped) = completions_to_lsp("ab", list, false, 50) else {
            panic!("expected list");
        };
        assert_eq!(dropped.items.len(), 1);
        assert_eq!(dropped.items[0].label, "mapped");
    }
}
