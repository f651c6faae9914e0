use remap_core::transform::AnalyzerResult;
use remap_core::RequestKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

use crate::state::GlobalState;
use crate::{analyzer, conversion};

/// Handle "textDocument/definition" request: jump from a tag name to the
/// tag of the enclosing element.
pub async fn handle_definition(
    _client: &Client,
    state: &GlobalState,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    if !state.capabilities.supports(RequestKind::Definition) {
        return Ok(None);
    }
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(doc) = super::source_document(state, &uri).await else {
        return Ok(None);
    };
    let Some(offset) = conversion::position_to_offset(&doc.text, position) else {
        return Ok(None);
    };

    let result = {
        let mut forwarder = state.forwarder.write().await;
        let Some(parsed) = analyzer::parsed(&mut forwarder, &doc) else {
            return Ok(None);
        };
        forwarder.forward(RequestKind::Definition, &doc, offset, |_, offset| {
            analyzer::definition(&parsed, &doc.id, offset)
        })
    };

    let Some(AnalyzerResult::Links(links)) = result else {
        return Ok(None);
    };
    let lookup = conversion::RequestText {
        id: doc.id.as_str(),
        text: &doc.text,
    };
    let links: Vec<LocationLink> = links
        .into_iter()
        .filter_map(|link| conversion::link_to_lsp(&doc.text, &lookup, link))
        .collect();
    if links.is_empty() {
        return Ok(None);
    }
    Ok(Some(GotoDefinitionResponse::Link(links)))
}

/// Handle "textDocument/references" request: every tag with the same name.
pub async fn handle_references(
    _client: &Client,
    state: &GlobalState,
    params: ReferenceParams,
) -> Result<Option<Vec<Location>>> {
    if !state.capabilities.supports(RequestKind::References) {
        return Ok(None);
    }
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let Some(doc) = super::source_document(state, &uri).await else {
        return Ok(None);
    };
    let Some(offset) = conversion::position_to_offset(&doc.text, position) else {
        return Ok(None);
    };

    let result = {
        let mut forwarder = state.forwarder.write().await;
        let Some(parsed) = analyzer::parsed(&mut forwarder, &doc) else {
            return Ok(None);
        };
        forwarder.forward(RequestKind::References, &doc, offset, |_, offset| {
            analyzer::references(&parsed, &doc.id, offset)
        })
    };

    let Some(AnalyzerResult::Locations(locations)) = result else {
        return Ok(None);
    };
    let lookup = conversion::RequestText {
        id: doc.id.as_str(),
        text: &doc.text,
    };
    let locations: Vec<Location> = locations
        .into_iter()
        .filter_map(|location| conversion::location_to_lsp(&lookup, location))
        .collect();
    Ok((!locations.is_empty()).then_some(locations))
}

/// Handle "textDocument/documentHighlight" request: the matching tag pair
/// under the cursor.
pub async fn handle_document_highlight(
    _client: &Client,
    state: &GlobalState,
    params: DocumentHighlightParams,
) -> Result<Option<Vec<DocumentHighlight>>> {
    if !state.capabilities.supports(RequestKind::Highlights) {
        return Ok(None);
    }
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(doc) = super::source_document(state, &uri).await else {
        return Ok(None);
    };
    let Some(offset) = conversion::position_to_offset(&doc.text, position) else {
        return Ok(None);
    };

    let result = {
        let mut forwarder = state.forwarder.write().await;
        let Some(parsed) = analyzer::parsed(&mut forwarder, &doc) else {
            return Ok(None);
        };
        forwarder.forward(RequestKind::Highlights, &doc, offset, |_, offset| {
            analyzer::highlights(&parsed, offset)
        })
    };

    let Some(AnalyzerResult::Highlights(highlights)) = result else {
        return Ok(None);
    };
    let highlights: Vec<DocumentHighlight> = highlights
        .into_iter()
        .map(|h| conversion::highlight_to_lsp(&doc.text, h))
        .collect();
    Ok((!highlights.is_empty()).then_some(highlights))
}
