//! Backend state management
//!
//! Defines the JqBackend struct, which maintains all state for the LSP
//! server: open documents, the outline index behind workspace symbol search,
//! and the effective user settings.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::lsp::models::LspDocument;
use crate::syntax::symbols::OutlineEntry;
use crate::syntax::JqSettings;

/// The jq language server backend, managing state and handling LSP requests.
#[derive(Debug, Clone)]
pub struct JqBackend {
    pub(super) client: Client,
    pub(super) documents_by_uri: Arc<RwLock<HashMap<Url, Arc<LspDocument>>>>,
    pub(super) serial_document_id: Arc<AtomicU32>,
    /// Effective user options, merged from `initializationOptions` and later
    /// `workspace/didChangeConfiguration` payloads.
    pub(super) settings: Arc<RwLock<JqSettings>>,
    /// Flat definition index per file, backing `workspace/symbol`.
    pub(super) outline_index: Arc<RwLock<HashMap<Url, Vec<OutlineEntry>>>>,
    pub(super) root_dir: Arc<RwLock<Option<PathBuf>>>,
    /// Readiness of the external grammar, probed once at startup. When false
    /// the server stays a plain-text document store.
    pub(super) syntax_enabled: bool,
}

impl JqBackend {
    /// Creates a new instance of the jq backend for the given client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents_by_uri: Arc::new(RwLock::new(HashMap::new())),
            serial_document_id: Arc::new(AtomicU32::new(0)),
            settings: Arc::new(RwLock::new(JqSettings::default())),
            outline_index: Arc::new(RwLock::new(HashMap::new())),
            root_dir: Arc::new(RwLock::new(None)),
            syntax_enabled: crate::tree_sitter::syntax_available(),
        }
    }
}
