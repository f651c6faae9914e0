use std::collections::HashMap;
use std::sync::Arc;

use remap_core::{CapabilitySet, Forwarder, ShorthandGenerator};
use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;

use crate::analyzer;
use crate::config::Settings;

/// One open document as the client last sent it. The revision counter is
/// the client's version number; bumping it is what invalidates the
/// forwarder's cached pair.
pub struct OpenDocument {
    pub revision: u64,
    pub text: String,
}

/// Global state for the LSP server.
/// Must be Send + Sync.
/// Read operations (hover, completion, goto) are concurrent;
/// write operations (didChange, cache population) are exclusive.
#[derive(Clone)]
pub struct GlobalState {
    /// Open documents by URI.
    pub documents: Arc<RwLock<HashMap<Url, OpenDocument>>>,
    /// Forwarder owning the shorthand generator and the pair cache.
    pub forwarder: Arc<RwLock<Forwarder>>,
    pub settings: Arc<RwLock<Settings>>,
    /// Declared once at construction; handlers check it before forwarding.
    pub capabilities: Arc<CapabilitySet>,
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            forwarder: Arc::new(RwLock::new(Forwarder::new(Box::new(ShorthandGenerator)))),
            settings: Arc::new(RwLock::new(Settings::default())),
            capabilities: Arc::new(analyzer::capabilities()),
        }
    }
}
