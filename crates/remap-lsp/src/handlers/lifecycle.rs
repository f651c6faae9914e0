use remap_core::RequestKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

use crate::config::Settings;
use crate::state::GlobalState;

/// Handle "initialize" request. Advertised capabilities follow the
/// analyzer's capability set declared at construction; kinds the analyzer
/// does not support are simply not announced.
pub async fn handle_initialize(
    client: &Client,
    state: &GlobalState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    if let Some(options) = params.initialization_options {
        match serde_json::from_value::<Settings>(options) {
            Ok(settings) => {
                *state.settings.write().await = settings;
            }
            Err(err) => {
                client
                    .log_message(
                        MessageType::WARNING,
                        format!("Ignoring malformed initializationOptions: {}", err),
                    )
                    .await;
            }
        }
    }

    let caps = &state.capabilities;
    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::FULL,
            )),
            completion_provider: caps
                .supports(RequestKind::Completion)
                .then(CompletionOptions::default),
            hover_provider: caps
                .supports(RequestKind::Hover)
                .then(|| HoverProviderCapability::Simple(true)),
            definition_provider: caps
                .supports(RequestKind::Definition)
                .then(|| OneOf::Left(true)),
            references_provider: caps
                .supports(RequestKind::References)
                .then(|| OneOf::Left(true)),
            document_highlight_provider: caps
                .supports(RequestKind::Highlights)
                .then(|| OneOf::Left(true)),
            rename_provider: caps.supports(RequestKind::Rename).then(|| OneOf::Left(true)),
            folding_range_provider: caps
                .supports(RequestKind::Folding)
                .then(|| FoldingRangeProviderCapability::Simple(true)),
            selection_range_provider: caps
                .supports(RequestKind::SelectionRange)
                .then(|| SelectionRangeProviderCapability::Simple(true)),
            document_link_provider: caps.supports(RequestKind::DocumentLinks).then(|| {
                DocumentLinkOptions {
                    resolve_provider: Some(false),
                    work_done_progress_options: Default::default(),
                }
            }),
            ..Default::default()
        },
        ..Default::default()
    })
}

/// Handle "initialized" notification.
pub async fn handle_initialized(client: &Client) {
    client
        .log_message(MessageType::INFO, "remap server ready")
        .await;
}
