use remap_core::transform::AnalyzerResult;
use remap_core::RequestKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

use crate::state::GlobalState;
use crate::{analyzer, conversion};

/// Handle "textDocument/hover" request
pub async fn handle_hover(
    _client: &Client,
    state: &GlobalState,
    params: HoverParams,
) -> Result<Option<Hover>> {
    if !state.capabilities.supports(RequestKind::Hover) {
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
        forwarder.forward(RequestKind::Hover, &doc, offset, |_, offset| {
            analyzer::hover(&parsed, offset)
        })
    };

    let Some(AnalyzerResult::Hover(hover)) = result else {
        return Ok(None);
    };
    Ok(Some(conversion::hover_to_lsp(&doc.text, hover)))
}
