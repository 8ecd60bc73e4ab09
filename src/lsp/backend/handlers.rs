//! LSP request and notification handlers
//!
//! Every syntax-aware handler follows the same degradation rule: no grammar,
//! or no parse tree for the document, means `Ok(None)`. The buffer behaves
//! as plain text while document synchronization keeps working.

use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{
    DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DocumentFormattingParams, DocumentOnTypeFormattingOptions,
    DocumentOnTypeFormattingParams, DocumentRangeFormattingParams,
    DocumentSymbolParams, DocumentSymbolResponse, InitializeParams,
    InitializeResult, InitializedParams, Location, MessageType, OneOf,
    SelectionRange, SelectionRangeParams, SelectionRangeProviderCapability,
    SemanticTokens, SemanticTokensFullOptions, SemanticTokensOptions,
    SemanticTokensParams, SemanticTokensResult,
    SemanticTokensServerCapabilities, ServerCapabilities, SymbolInformation,
    SymbolKind, TextDocumentSyncCapability, TextDocumentSyncKind, TextEdit,
    WorkspaceSymbolParams,
};
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::LanguageServer;
use tracing::{debug, info, warn};

use crate::syntax::highlight::{collect_highlights, Highlight};
use crate::syntax::indent::indent_edits;
use crate::syntax::navigation::selection_range;
use crate::syntax::symbols::document_symbols;
use crate::syntax::JqSettings;

use super::state::JqBackend;
use super::SemanticTokensBuilder;

#[tower_lsp::async_trait]
impl LanguageServer for JqBackend {
    /// Handles the LSP initialize request, reading user options and indexing
    /// workspace files.
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        info!("Received initialize request");

        if let Some(options) = params.initialization_options {
            match serde_json::from_value::<JqSettings>(options) {
                Ok(settings) => {
                    debug!("Applying initialization options: {:?}", settings);
                    *self.settings.write().await = settings;
                }
                Err(e) => warn!("Ignoring malformed initialization options: {}", e),
            }
        }

        if !self.syntax_enabled {
            warn!("jq grammar unavailable; serving documents as plain text");
        }

        if let Some(root_uri) = params.root_uri {
            if let Ok(root_path) = root_uri.to_file_path() {
                *self.root_dir.write().await = Some(root_path.clone());
                self.scan_workspace(&root_path).await;
            } else {
                warn!("Failed to convert root_uri to path: {}", root_uri);
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                document_symbol_provider: Some(OneOf::Left(true)),
                workspace_symbol_provider: Some(OneOf::Left(true)),
                selection_range_provider: Some(SelectionRangeProviderCapability::Simple(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                document_range_formatting_provider: Some(OneOf::Left(true)),
                document_on_type_formatting_provider: Some(DocumentOnTypeFormattingOptions {
                    first_trigger_character: "\n".to_string(),
                    more_trigger_character: Some(vec![
                        "}".to_string(),
                        "]".to_string(),
                        ")".to_string(),
                        "|".to_string(),
                    ]),
                }),
                semantic_tokens_provider: Some(
                    SemanticTokensServerCapabilities::SemanticTokensOptions(
                        SemanticTokensOptions {
                            legend: Highlight::legend(),
                            full: Some(SemanticTokensFullOptions::Bool(true)),
                            range: None,
                            ..Default::default()
                        },
                    ),
                ),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    /// Handles the LSP initialized notification.
    async fn initialized(&self, _params: InitializedParams) {
        info!("Server initialized");
        if !self.syntax_enabled {
            self.client
                .log_message(
                    MessageType::WARNING,
                    "jq grammar unavailable; syntax features are disabled",
                )
                .await;
        }
    }

    /// Handles the LSP shutdown request.
    async fn shutdown(&self) -> jsonrpc::Result<()> {
        info!("Received shutdown request");
        Ok(())
    }

    /// Handles opening a text document, parsing and indexing it.
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;
        info!("Opening document: URI={}, version={}", uri, version);

        let document = self
            .open_document(uri.clone(), &params.text_document.text, version)
            .await;
        debug!("Document {} registered with id {}", uri, document.id);
        self.reindex_outline(&uri).await;
    }

    /// Handles document edits, applying them to the rope and tree.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;

        let document = match self.document(&uri).await {
            Some(document) => document,
            None => {
                // A change for a document we never saw opens it from scratch
                warn!("Change for unopened document {}", uri);
                self.open_document(uri.clone(), "", version - 1).await
            }
        };

        if document.apply(params.content_changes, version).await.is_none() {
            warn!(
                "Rejected outdated change for {} (version {})",
                uri, version
            );
            return;
        }
        debug!("Updated document: {}, version: {}", uri, version);
        self.reindex_outline(&uri).await;
    }

    /// Handles closing a text document.
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.remove_document(&uri).await.is_some() {
            info!("Closed document: {}", uri);
        } else {
            warn!("Closed document not found: {}", uri);
        }
    }

    /// Merges configuration pushed by the client over the current settings.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        // Accept either the bare options object or one nested under "jq"
        let value = match params.settings.get("jq") {
            Some(nested) => nested.clone(),
            None => params.settings,
        };
        match serde_json::from_value::<JqSettings>(value) {
            Ok(settings) => {
                info!("Configuration changed: {:?}", settings);
                *self.settings.write().await = settings;
            }
            Err(e) => warn!("Ignoring malformed configuration: {}", e),
        }
    }

    /// Returns the nested outline of definitions in a document.
    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        debug!("Handling documentSymbol request for {}", uri);

        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let (text, tree) = document.snapshot().await;
        let Some(tree) = tree else {
            return Ok(None);
        };

        let symbols = document_symbols(tree.root_node(), &text);
        debug!("Found {} symbols in document {}", symbols.len(), uri);
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    /// Searches indexed definitions across the workspace.
    async fn symbol(
        &self,
        params: WorkspaceSymbolParams,
    ) -> LspResult<Option<Vec<SymbolInformation>>> {
        let query = params.query.to_lowercase();
        let index = self.outline_index.read().await;

        let mut results = Vec::new();
        for (uri, entries) in index.iter() {
            for entry in entries {
                if query.is_empty() || entry.name.to_lowercase().contains(&query) {
                    #[allow(deprecated)]
                    results.push(SymbolInformation {
                        name: entry.name.clone(),
                        kind: SymbolKind::FUNCTION,
                        tags: None,
                        deprecated: None,
                        location: Location {
                            uri: uri.clone(),
                            range: entry.selection_range,
                        },
                        container_name: None,
                    });
                }
            }
        }
        debug!("Workspace symbol query {:?} matched {}", query, results.len());
        Ok(Some(results))
    }

    /// Produces semantic tokens for the whole document.
    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> LspResult<Option<SemanticTokensResult>> {
        let uri = params.text_document.uri;
        debug!("Semantic tokens request for: {}", uri);

        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let (text, tree) = document.snapshot().await;
        let Some(tree) = tree else {
            return Ok(None);
        };

        let source = text.to_string();
        let mut builder = SemanticTokensBuilder::new();
        for span in collect_highlights(&tree, &source) {
            builder.push(&span);
        }
        let data = builder.build();
        debug!("Generated {} semantic tokens", data.len());

        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data,
        })))
    }

    /// Expanding selection chains for each requested position.
    async fn selection_range(
        &self,
        params: SelectionRangeParams,
    ) -> LspResult<Option<Vec<SelectionRange>>> {
        let uri = params.text_document.uri;
        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let (text, tree) = document.snapshot().await;
        let Some(tree) = tree else {
            return Ok(None);
        };

        let ranges: Vec<SelectionRange> = params
            .positions
            .into_iter()
            .filter_map(|position| selection_range(&tree, &text, position))
            .collect();
        if ranges.is_empty() {
            return Ok(None);
        }
        Ok(Some(ranges))
    }

    /// Re-indents the whole document.
    async fn formatting(
        &self,
        params: DocumentFormattingParams,
    ) -> LspResult<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let (text, tree) = document.snapshot().await;
        let Some(tree) = tree else {
            return Ok(None);
        };

        let settings = self.settings().await;
        let last_line = text.len_lines().saturating_sub(1);
        let edits = indent_edits(&tree, &text, 0, last_line, &settings);
        debug!("Formatting {} produced {} edits", uri, edits.len());
        Ok(Some(edits))
    }

    /// Re-indents the lines covered by the requested range.
    async fn range_formatting(
        &self,
        params: DocumentRangeFormattingParams,
    ) -> LspResult<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let (text, tree) = document.snapshot().await;
        let Some(tree) = tree else {
            return Ok(None);
        };

        let settings = self.settings().await;
        let edits = indent_edits(
            &tree,
            &text,
            params.range.start.line as usize,
            params.range.end.line as usize,
            &settings,
        );
        Ok(Some(edits))
    }

    /// Re-indents the line being typed on newline or a closing character.
    async fn on_type_formatting(
        &self,
        params: DocumentOnTypeFormattingParams,
    ) -> LspResult<Option<Vec<TextEdit>>> {
        let uri = params.text_document_position.text_document.uri;
        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let (text, tree) = document.snapshot().await;
        let Some(tree) = tree else {
            return Ok(None);
        };

        let settings = self.settings().await;
        let line = params.text_document_position.position.line as usize;
        let edits = indent_edits(&tree, &text, line, line, &settings);
        Ok(Some(edits))
    }
}
