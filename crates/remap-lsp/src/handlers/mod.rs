mod completion;
mod hover;
mod lifecycle;
mod navigation;
mod notifications;
mod rename;
mod structure;

pub use completion::*;
pub use hover::*;
pub use lifecycle::*;
pub use navigation::*;
pub use notifications::*;
pub use rename::*;
pub use structure::*;

use remap_core::model::{Document, DocumentId};
use tower_lsp::lsp_types::Url;

use crate::state::GlobalState;

/// Snapshot of an open document as a core document, identity keyed by URI.
pub(crate) async fn source_document(state: &GlobalState, uri: &Url) -> Option<Document> {
    let documents = state.documents.read().await;
    documents.get(uri).map(|doc| {
        Document::new(DocumentId::new(uri.as_str()), doc.revision, doc.text.clone())
    })
}
