use remap_core::model::DocumentId;
use tower_lsp::lsp_types::*;

use crate::state::{GlobalState, OpenDocument};

/// Handle "textDocument/didOpen" notification
pub async fn handle_did_open(state: &GlobalState, params: DidOpenTextDocumentParams) {
    let uri = params.text_document.uri;
    let mut documents = state.documents.write().await;
    documents.insert(
        uri,
        OpenDocument {
            revision: params.text_document.version.max(0) as u64,
            text: params.text_document.text,
        },
    );
}

/// Handle "textDocument/didChange" notification. Full sync: the last
/// change carries the complete text; the bumped revision is what makes
/// the forwarder regenerate on the next request.
pub async fn handle_did_change(state: &GlobalState, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;
    if let Some(last_change) = params.content_changes.into_iter().last() {
        let mut documents = state.documents.write().await;
        documents.insert(
            uri,
            OpenDocument {
                revision: params.text_document.version.max(0) as u64,
                text: last_change.text,
            },
        );
    }
}

/// Handle "textDocument/didClose" notification: drop the open document
/// and evict its cached pair.
pub async fn handle_did_close(state: &GlobalState, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    {
        let mut documents = state.documents.write().await;
        documents.remove(&uri);
    }
    let mut forwarder = state.forwarder.write().await;
    forwarder.close(&DocumentId::new(uri.as_str()));
}
