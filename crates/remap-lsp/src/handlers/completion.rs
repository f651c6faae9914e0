use remap_core::transform::AnalyzerResult;
use remap_core::RequestKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

use crate::state::GlobalState;
use crate::{analyzer, conversion};

/// Handle "textDocument/completion" request
pub async fn handle_completion(
    _client: &Client,
    state: &GlobalState,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    if !state.capabilities.supports(RequestKind::Completion) {
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
        forwarder.forward(RequestKind::Completion, &doc, offset, |pair, offset| {
            analyzer::completion(&parsed, &pair.generated.text, offset)
        })
    };

    let Some(AnalyzerResult::Completions(list)) = result else {
        return Ok(None);
    };
    let settings = state.settings.read().await;
    Ok(Some(conversion::completions_to_lsp(
        &doc.text,
        list,
        settings.synthesized_completions,
        settings.completion_limit,
    )))
}
