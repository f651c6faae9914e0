use std::collections::HashMap;

use remap_core::transform::AnalyzerResult;
use remap_core::RequestKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use url::Url;

use crate::state::GlobalState;
use crate::{analyzer, conversion};

/// Handle "textDocument/rename" request: rewrite both tag names of the
/// element under the cursor. Edits come back in source coordinates, so
/// in the shorthand source only the single authored name changes.
pub async fn handle_rename(
    _client: &Client,
    state: &GlobalState,
    params: RenameParams,
) -> Result<Option<WorkspaceEdit>> {
    if !state.capabilities.supports(RequestKind::Rename) {
        return Ok(None);
    }
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;
    let new_name = params.new_name;
    if !is_valid_element_name(&new_name) {
        return Err(tower_lsp::jsonrpc::Error::invalid_params(format!(
            "`{}` is not a valid element name",
            new_name
        )));
    }

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
        forwarder.forward(RequestKind::Rename, &doc, offset, |_, offset| {
            analyzer::rename_spans(&parsed, &doc.id, offset)
        })
    };

    let Some(AnalyzerResult::Locations(locations)) = result else {
        return Ok(None);
    };
    let mut changes: HashMap<Url, Vec<TextEdit>> = HashMap::new();
    for location in locations {
        let Ok(target_uri) = Url::parse(location.document.as_str()) else {
            continue;
        };
        changes.entry(target_uri).or_default().push(TextEdit {
            range: conversion::range_to_lsp(&doc.text, location.range),
            new_text: new_name.clone(),
        });
    }
    if changes.is_empty() {
        return Ok(None);
    }
    Ok(Some(WorkspaceEdit {
        changes: Some(changes),
        ..Default::default()
    }))
}

fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
