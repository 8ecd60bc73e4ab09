use ropey::Rope;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};
use tree_sitter::Tree;

/// Changes associated with a specific version of the document.
#[derive(Debug)]
pub struct VersionedChanges {
    pub version: i32,
    pub changes: Vec<TextDocumentContentChangeEvent>,
}

/// History of changes applied to a document since it was opened.
#[derive(Debug, Default)]
pub struct LspDocumentHistory {
    pub changes: Vec<VersionedChanges>,
}

/// State for an open text document managed by the LSP server.
///
/// `tree` is `None` when the jq grammar is unavailable; the document then
/// behaves as plain text and syntax-aware requests return nothing.
#[derive(Debug)]
pub struct LspDocumentState {
    pub uri: Url,
    pub text: Rope,
    pub version: i32,
    pub tree: Option<Tree>,
    pub history: LspDocumentHistory,
}

/// LSP document with state for open files.
#[derive(Debug)]
pub struct LspDocument {
    pub id: u32,
    pub state: tokio::sync::RwLock<LspDocumentState>,
}
