//! Whole-document structure requests: folding, selection ranges and
//! document links. Folding and links are non-positional, so they go
//! through the forwarder's direct pair access instead of a translated
//! point request; selection ranges use the batch variant, one chain per
//! cursor.

use remap_core::transform::{self, AnalyzerResult};
use remap_core::translate::Translator;
use remap_core::RequestKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use url::Url;

use crate::state::GlobalState;
use crate::{analyzer, conversion};

/// Handle "textDocument/foldingRange" request
pub async fn handle_folding_range(
    _client: &Client,
    state: &GlobalState,
    params: FoldingRangeParams,
) -> Result<Option<Vec<FoldingRange>>> {
    if !state.capabilities.supports(RequestKind::Folding) {
        return Ok(None);
    }
    let uri = params.text_document.uri;
    let Some(doc) = super::source_document(state, &uri).await else {
        return Ok(None);
    };

    let result = {
        let mut forwarder = state.forwarder.write().await;
        let Some(pair) = forwarder.pair(&doc) else {
            return Ok(None);
        };
        let Some(parsed) = analyzer::parsed(&mut forwarder, &doc) else {
            return Ok(None);
        };
        let raw = analyzer::folding(&parsed);
        transform::to_source(raw, &pair, &|id| forwarder.cached(id))
    };

    let Some(AnalyzerResult::FoldingRanges(ranges)) = result else {
        return Ok(None);
    };
    let ranges: Vec<FoldingRange> = ranges
        .into_iter()
        .map(|r| conversion::folding_to_lsp(&doc.text, r))
        .filter(|r| r.end_line > r.start_line)
        .collect();
    Ok((!ranges.is_empty()).then_some(ranges))
}

/// Handle "textDocument/selectionRange" request. The response must stay
/// aligned with the requested positions, so cursors the engine cannot map
/// fall back to an empty range at the cursor itself.
pub async fn handle_selection_range(
    _client: &Client,
    state: &GlobalState,
    params: SelectionRangeParams,
) -> Result<Option<Vec<SelectionRange>>> {
    if !state.capabilities.supports(RequestKind::SelectionRange) {
        return Ok(None);
    }
    let uri = params.text_document.uri;
    let positions = params.positions;

    let Some(doc) = super::source_document(state, &uri).await else {
        return Ok(None);
    };
    let offsets: Vec<usize> = positions
        .iter()
        .map(|p| conversion::position_to_offset(&doc.text, *p).unwrap_or(doc.text.len()))
        .collect();

    let results = {
        let mut forwarder = state.forwarder.write().await;
        let Some(parsed) = analyzer::parsed(&mut forwarder, &doc) else {
            return Ok(None);
        };
        forwarder.forward_batch(RequestKind::SelectionRange, &doc, &offsets, |_, offset| {
            analyzer::selection_chain(&parsed, offset)
        })
    };

    let out = positions
        .into_iter()
        .zip(results)
        .map(|(position, result)| match result {
            Some(AnalyzerResult::SelectionRanges(mut chains)) if !chains.is_empty() => {
                conversion::selection_to_lsp(&doc.text, chains.remove(0))
            }
            _ => SelectionRange {
                range: Range {
                    start: position,
                    end: position,
                },
                parent: None,
            },
        })
        .collect();
    Ok(Some(out))
}

/// Handle "textDocument/documentLink" request: URL-shaped tokens in
/// inline text, translated span by span through the pair's table.
pub async fn handle_document_link(
    _client: &Client,
    state: &GlobalState,
    params: DocumentLinkParams,
) -> Result<Option<Vec<DocumentLink>>> {
    if !state.capabilities.supports(RequestKind::DocumentLinks) {
        return Ok(None);
    }
    let uri = params.text_document.uri;
    let Some(doc) = super::source_document(state, &uri).await else {
        return Ok(None);
    };

    let links = {
        let mut forwarder = state.forwarder.write().await;
        let Some(pair) = forwarder.pair(&doc) else {
            return Ok(None);
        };
        let Some(parsed) = analyzer::parsed(&mut forwarder, &doc) else {
            return Ok(None);
        };
        let tr = Translator::new(&pair.segments);
        analyzer::links(&parsed, &pair.generated.text)
            .into_iter()
            .filter_map(|(range, target)| {
                let source_range = tr.range_to_source(range)?;
                Some(DocumentLink {
                    range: conversion::range_to_lsp(&doc.text, source_range),
                    target: Url::parse(&target).ok(),
                    tooltip: None,
                    data: None,
                })
            })
            .collect::<Vec<_>>()
    };
    Ok((!links.is_empty()).then_some(links))
}
