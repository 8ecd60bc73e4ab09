//! LSP backend for jq
//!
//! The backend owns open documents and serves every syntax-aware request
//! from their parse trees. When the grammar probe failed at startup the
//! server keeps synchronizing text but answers syntax requests with nothing.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::lsp::models::{LspDocument, LspDocumentState};
use crate::syntax::symbols::outline;
use crate::syntax::JqSettings;
use crate::tree_sitter::parse_code;

mod handlers;
mod state;
mod utils;

pub use state::JqBackend;
use utils::SemanticTokensBuilder;

impl JqBackend {
    fn next_document_id(&self) -> u32 {
        self.serial_document_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Current effective settings.
    pub(crate) async fn settings(&self) -> JqSettings {
        self.settings.read().await.clone()
    }

    /// Looks up an open document by URI.
    pub(crate) async fn document(&self, uri: &Url) -> Option<Arc<LspDocument>> {
        self.documents_by_uri.read().await.get(uri).cloned()
    }

    /// Creates and registers a document from freshly opened text.
    pub(crate) async fn open_document(
        &self,
        uri: Url,
        text: &str,
        version: i32,
    ) -> Arc<LspDocument> {
        let document = Arc::new(LspDocument {
            id: self.next_document_id(),
            state: RwLock::new(LspDocumentState::open(uri.clone(), text, version)),
        });
        self.documents_by_uri
            .write()
            .await
            .insert(uri, Arc::clone(&document));
        document
    }

    /// Drops a document and its outline entries.
    pub(crate) async fn remove_document(&self, uri: &Url) -> Option<Arc<LspDocument>> {
        self.outline_index.write().await.remove(uri);
        self.documents_by_uri.write().await.remove(uri)
    }

    /// Rebuilds the outline index entry for an open document.
    pub(crate) async fn reindex_outline(&self, uri: &Url) {
        let Some(document) = self.document(uri).await else {
            return;
        };
        let (text, tree) = document.snapshot().await;
        let entries = match tree {
            Some(tree) => outline(tree.root_node(), &text),
            None => Vec::new(),
        };
        debug!("Indexed {} definitions in {}", entries.len(), uri);
        self.outline_index
            .write()
            .await
            .insert(uri.clone(), entries);
    }

    /// Indexes a file that is not open, from its on-disk contents.
    async fn index_file(&self, uri: Url, text: &str) {
        let Some(tree) = parse_code(text) else {
            return;
        };
        let rope = ropey::Rope::from_str(text);
        let entries = outline(tree.root_node(), &rope);
        if !entries.is_empty() {
            self.outline_index.write().await.insert(uri, entries);
        }
    }

    /// Walks the workspace root and indexes every `.jq` file for
    /// `workspace/symbol`.
    pub(crate) async fn scan_workspace(&self, root: &Path) {
        if !self.syntax_enabled {
            return;
        }
        let mut file_count = 0;
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if entry.path().extension().map_or(false, |ext| ext == "jq") {
                let Ok(uri) = Url::from_file_path(entry.path()) else {
                    warn!("Skipping unrepresentable path {:?}", entry.path());
                    continue;
                };
                match std::fs::read_to_string(entry.path()) {
                    Ok(text) => {
                        self.index_file(uri, &text).await;
                        file_count += 1;
                    }
                    Err(e) => warn!("Failed to read {:?}: {}", entry.path(), e),
                }
            }
        }
        info!("Indexed {} .jq files under {:?}", file_count, root);
    }
}
