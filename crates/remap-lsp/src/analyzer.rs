//! Built-in analyzer for the generated closing-tag markup.
//!
//! Everything here works purely in generated-document coordinates; the
//! forwarder translates requests in and results back out. The analyzer
//! knows nothing about the shorthand source format or the segment table.

use std::sync::Arc;

use remap_core::model::{Document, DocumentId, OffsetRange};
use remap_core::transform::{
    AnalyzerResult, CompletionItem, CompletionList, Highlight, HighlightKind, Hover, Location,
    LocationLink, SelectionRange,
};
use remap_core::{CapabilitySet, Forwarder, RequestKind};

/// Element names offered by completion.
const KNOWN_ELEMENTS: &[&str] = &[
    "a", "article", "body", "div", "footer", "h1", "h2", "h3", "head", "header", "html", "li",
    "main", "nav", "ol", "p", "section", "span", "table", "td", "title", "tr", "ul",
];

pub fn capabilities() -> CapabilitySet {
    CapabilitySet::new([
        RequestKind::Completion,
        RequestKind::Hover,
        RequestKind::Definition,
        RequestKind::References,
        RequestKind::Highlights,
        RequestKind::Rename,
        RequestKind::SelectionRange,
        RequestKind::Folding,
        RequestKind::DocumentLinks,
    ])
}

/// One element of the generated markup.
#[derive(Debug)]
pub struct Element {
    pub name: String,
    /// Name span inside the opening tag.
    pub open_name: OffsetRange,
    /// Name span inside the closing tag, once seen.
    pub close_name: Option<OffsetRange>,
    /// From the opening `<` through the closing `>`.
    pub extent: OffsetRange,
    /// End of the last name or text span inside this element, descendants
    /// included. Unlike `extent.end` this never points into synthesized
    /// closing tags.
    pub content_end: usize,
    pub parent: Option<usize>,
    pub depth: usize,
    /// Inline text spans directly inside this element.
    pub text_spans: Vec<OffsetRange>,
}

/// Parse tree of one generated document, cached per revision through the
/// forwarder's parsed-structure slot.
#[derive(Debug, Default)]
pub struct ParsedMarkup {
    pub elements: Vec<Element>,
}

impl ParsedMarkup {
    pub fn parse(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'<' {
                let closing = bytes.get(i + 1) == Some(&b'/');
                let name_start = if closing { i + 2 } else { i + 1 };
                let name_end = text[name_start..]
                    .find('>')
                    .map(|j| name_start + j)
                    .unwrap_or(text.len());
                let tag_end = (name_end + 1).min(text.len());

                if closing {
                    if let Some(idx) = stack.pop() {
                        elements[idx].close_name = Some(OffsetRange::new(name_start, name_end));
                        elements[idx].extent.end = tag_end;
                        let hint = elements[idx].content_end;
                        if let Some(&parent) = stack.last() {
                            elements[parent].content_end =
                                elements[parent].content_end.max(hint);
                        }
                    }
                } else {
                    let idx = elements.len();
                    elements.push(Element {
                        name: text[name_start..name_end].to_string(),
                        open_name: OffsetRange::new(name_start, name_end),
                        close_name: None,
                        extent: OffsetRange::new(i, tag_end),
                        content_end: name_end,
                        parent: stack.last().copied(),
                        depth: stack.len(),
                        text_spans: Vec::new(),
                    });
                    stack.push(idx);
                }
                i = tag_end;
            } else {
                let end = text[i..].find('<').map(|j| i + j).unwrap_or(text.len());
                if let Some(&idx) = stack.last() {
                    elements[idx].text_spans.push(OffsetRange::new(i, end));
                    elements[idx].content_end = elements[idx].content_end.max(end);
                }
                i = end;
            }
        }
        Self { elements }
    }

    /// Element whose opening or closing tag name touches `offset`.
    pub fn element_at_name(&self, offset: usize) -> Option<usize> {
        self.elements.iter().position(|el| {
            touches(el.open_name, offset) || el.close_name.is_some_and(|r| touches(r, offset))
        })
    }

    /// Deepest element whose extent contains `offset`.
    pub fn innermost_at(&self, offset: usize) -> Option<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.extent.contains(offset) || el.extent.end == offset)
            .max_by_key(|(_, el)| el.depth)
            .map(|(idx, _)| idx)
    }
}

fn touches(range: OffsetRange, offset: usize) -> bool {
    offset >= range.start && offset <= range.end
}

pub fn hover(parsed: &ParsedMarkup, offset: usize) -> Option<AnalyzerResult> {
    let idx = parsed.element_at_name(offset)?;
    let el = &parsed.elements[idx];
    let contents = match el.parent {
        Some(parent) => format!(
            "`{}` element inside `{}`",
            el.name, parsed.elements[parent].name
        ),
        None => format!("`{}` element at document root", el.name),
    };
    let range = if touches(el.open_name, offset) {
        el.open_name
    } else {
        el.close_name?
    };
    Some(AnalyzerResult::Hover(Hover {
        contents,
        range: Some(range),
    }))
}

/// Tag-name completion. Offered on both tag names; completing on a closing
/// tag produces ranges with no source counterpart, which the transformer
/// clears instead of dropping.
pub fn completion(parsed: &ParsedMarkup, text: &str, offset: usize) -> Option<AnalyzerResult> {
    let idx = parsed.element_at_name(offset)?;
    let el = &parsed.elements[idx];
    let name_range = if touches(el.open_name, offset) {
        el.open_name
    } else {
        el.close_name?
    };
    let prefix = &text[name_range.start..offset.min(name_range.end)];

    let items = KNOWN_ELEMENTS
        .iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| CompletionItem {
            label: name.to_string(),
            detail: Some("element".to_string()),
            insert_range: Some(OffsetRange::new(name_range.start, offset.min(name_range.end))),
            replace_range: Some(name_range),
            data: None,
        })
        .collect();

    Some(AnalyzerResult::Completions(CompletionList {
        is_incomplete: false,
        items,
    }))
}

/// Jump from a tag name to the tag of the element that contains it.
/// Root elements have nothing to jump to.
pub fn definition(
    parsed: &ParsedMarkup,
    document: &DocumentId,
    offset: usize,
) -> Option<AnalyzerResult> {
    let idx = parsed.element_at_name(offset)?;
    let el = &parsed.elements[idx];
    let origin = if touches(el.open_name, offset) {
        el.open_name
    } else {
        el.close_name?
    };
    let target = parsed.elements[el.parent?].open_name;

    Some(AnalyzerResult::Links(vec![LocationLink {
        origin: Some(origin),
        target: Location {
            document: document.clone(),
            range: target,
        },
        target_selection: Some(target),
    }]))
}

/// All tags with the same name anywhere in the document.
pub fn references(
    parsed: &ParsedMarkup,
    document: &DocumentId,
    offset: usize,
) -> Option<AnalyzerResult> {
    let idx = parsed.element_at_name(offset)?;
    let name = parsed.elements[idx].name.clone();
    let locations = parsed
        .elements
        .iter()
        .filter(|el| el.name == name)
        .flat_map(|el| std::iter::once(el.open_name).chain(el.close_name))
        .map(|range| Location {
            document: document.clone(),
            range,
        })
        .collect();
    Some(AnalyzerResult::Locations(locations))
}

/// The matching tag pair of the element under the cursor.
pub fn highlights(parsed: &ParsedMarkup, offset: usize) -> Option<AnalyzerResult> {
    let idx = parsed.element_at_name(offset)?;
    let el = &parsed.elements[idx];
    let mut out = vec![Highlight {
        range: el.open_name,
        kind: HighlightKind::Text,
    }];
    if let Some(close) = el.close_name {
        out.push(Highlight {
            range: close,
            kind: HighlightKind::Text,
        });
    }
    Some(AnalyzerResult::Highlights(out))
}

/// Spans to rewrite when renaming the element under the cursor: its own
/// opening and closing tag names. The new name substitution happens at the
/// protocol layer.
pub fn rename_spans(
    parsed: &ParsedMarkup,
    document: &DocumentId,
    offset: usize,
) -> Option<AnalyzerResult> {
    let idx = parsed.element_at_name(offset)?;
    let el = &parsed.elements[idx];
    let locations = std::iter::once(el.open_name)
        .chain(el.close_name)
        .map(|range| Location {
            document: document.clone(),
            range,
        })
        .collect();
    Some(AnalyzerResult::Locations(locations))
}

/// Foldable extents, one per element with content beyond its own name.
/// Ranges end at the last contained name or text span, so they stay clear
/// of synthesized closing tags.
pub fn folding(parsed: &ParsedMarkup) -> AnalyzerResult {
    let ranges = parsed
        .elements
        .iter()
        .filter(|el| el.content_end > el.open_name.end)
        .map(|el| OffsetRange::new(el.open_name.start, el.content_end))
        .collect();
    AnalyzerResult::FoldingRanges(ranges)
}

/// Innermost-first chain of enclosing ranges at `offset`: the covering
/// text span, then each enclosing element's content span, then the
/// outermost element's full extent. The extent covers synthesized closing
/// tags and is expected to drop out during translation, with the chain
/// reattached at the next mapped ancestor.
pub fn selection_chain(parsed: &ParsedMarkup, offset: usize) -> Option<AnalyzerResult> {
    let innermost = parsed.innermost_at(offset)?;
    let mut nodes: Vec<OffsetRange> = Vec::new();

    if let Some(&span) = parsed.elements[innermost]
        .text_spans
        .iter()
        .find(|span| span.contains(offset) || span.end == offset)
    {
        nodes.push(span);
    }
    let mut idx = Some(innermost);
    while let Some(i) = idx {
        let el = &parsed.elements[i];
        nodes.push(OffsetRange::new(el.open_name.start, el.content_end));
        if el.parent.is_none() {
            nodes.push(el.extent);
        }
        idx = el.parent;
    }

    let mut chain: Option<SelectionRange> = None;
    for range in nodes.into_iter().rev() {
        chain = Some(SelectionRange {
            range,
            parent: chain.map(Box::new),
        });
    }
    chain.map(|c| AnalyzerResult::SelectionRanges(vec![c]))
}

/// `(range, target)` pairs for URL-shaped tokens in inline text.
pub fn links(parsed: &ParsedMarkup, text: &str) -> Vec<(OffsetRange, String)> {
    let mut out = Vec::new();
    for el in &parsed.elements {
        for span in &el.text_spans {
            let slice = &text[span.start..span.end];
            for (pos, token) in tokens(slice) {
                if token.starts_with("http://") || token.starts_with("https://") {
                    out.push((
                        OffsetRange::new(span.start + pos, span.start + pos + token.len()),
                        token.to_string(),
                    ));
                }
            }
        }
    }
    out
}

fn tokens(slice: &str) -> impl Iterator<Item = (usize, &str)> {
    slice.split_whitespace().map(move |token| {
        let pos = token.as_ptr() as usize - slice.as_ptr() as usize;
        (pos, token)
    })
}

/// Parse (or reuse) the markup tree of `source`'s generated document.
pub fn parsed(forwarder: &mut Forwarder, source: &Document) -> Option<Arc<ParsedMarkup>> {
    forwarder.pair(source)?;
    let any = forwarder.parsed_or_insert(&source.id, source.revision, |pair| {
        Arc::new(ParsedMarkup::parse(&pair.generated.text))
    })?;
    any.downcast::<ParsedMarkup>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedMarkup {
        ParsedMarkup::parse(text)
    }

    #[test]
    fn parses_nesting_and_extents() {
        let parsed = parse("<html><body><p>Hello</p></body></html>");
        assert_eq!(parsed.elements.len(), 3);
        let p = &parsed.elements[2];
        assert_eq!(p.name, "p");
        assert_eq!(p.depth, 2);
        assert_eq!(p.parent, Some(1));
        // extent covers "<p>Hello</p>"
        assert_eq!(p.extent, OffsetRange::new(12, 24));
        // content ends after "Hello", before the closing tags
        assert_eq!(p.content_end, 20);
        // the root's content hint absorbs the descendants'
        assert_eq!(parsed.elements[0].content_end, 20);
    }

    #[test]
    fn definition_jumps_to_the_enclosing_element() {
        let text = "<div><p>x</p></div>";
        let parsed = parse(text);
        let id = DocumentId::new("mem://t");
        // offset 6 is inside "p"
        let Some(AnalyzerResult::Links(links)) = definition(&parsed, &id, 6) else {
            panic!("no link");
        };
        let target = links[0].target.range;
        assert_eq!(&text[target.start..target.end], "div");
        assert_eq!(links[0].origin, Some(OffsetRange::new(6, 7)));
        // the root element has no enclosing target
        assert!(definition(&parsed, &id, 2).is_none());
    }

    #[test]
    fn completion_filters_by_prefix_with_dual_ranges() {
        let text = "<he>";
        let parsed = parse(text);
        // cursor right after "he"
        let Some(AnalyzerResult::Completions(list)) = completion(&parsed, text, 3) else {
            panic!("no completions");
        };
        let labels: Vec<&str> = list.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["head", "header"]);
        assert_eq!(list.items[0].insert_range, Some(OffsetRange::new(1, 3)));
        assert_eq!(list.items[0].replace_range, Some(OffsetRange::new(1, 3)));
    }

    #[test]
    fn references_find_every_same_named_tag() {
        let parsed = parse("<ul><li>a</li><li>b</li></ul>");
        let id = DocumentId::new("mem://t");
        let Some(AnalyzerResult::Locations(locs)) = references(&parsed, &id, 5) else {
            panic!("no references");
        };
        // two <li> elements, open and close names each
        assert_eq!(locs.len(), 4);
    }

    #[test]
    fn folding_stops_before_closing_tags() {
        let text = "<div><p>Hello</p></div>";
        let parsed = parse(text);
        let AnalyzerResult::FoldingRanges(ranges) = folding(&parsed) else {
            unreachable!();
        };
        // div folds from its name to the end of "Hello"
        assert!(ranges.contains(&OffsetRange::new(1, 13)));
        assert!(ranges.iter().all(|r| r.end <= 13));
    }

    #[test]
    fn selection_chain_runs_innermost_to_root() {
        let text = "<div><p>Hello</p></div>";
        let parsed = parse(text);
        // offset inside "Hello"
        let Some(AnalyzerResult::SelectionRanges(chains)) = selection_chain(&parsed, 9) else {
            panic!("no chain");
        };
        let mut ranges = Vec::new();
        let mut node = Some(&chains[0]);
        while let Some(n) = node {
            ranges.push(n.range);
            node = n.parent.as_deref();
        }
        assert_eq!(
            ranges,
            vec![
                OffsetRange::new(8, 13),          // "Hello"
                OffsetRange::new(6, 13),          // p content
                OffsetRange::new(1, 13),          // div content
                OffsetRange::new(0, text.len()),  // div extent
            ]
        );
        assert!(ranges
            .windows(2)
            .all(|w| w[1].start <= w[0].start && w[1].end >= w[0].end));
    }

    #[test]
    fn url_tokens_become_links() {
        let text = "<p>see https://example.com now</p>";
        let parsed = parse(text);
        let links = links(&parsed, text);
        assert_eq!(links.len(), 1);
        let (range, target) = &links[0];
        assert_eq!(&text[range.start..range.end], "https://example.com");
        assert_eq!(target, "https://example.com");
    }
}
