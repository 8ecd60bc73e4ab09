use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};
use tree_sitter::Tree;

use crate::tree_sitter::{parse_code, update_tree};

pub use crate::lsp::models::{LspDocument, LspDocumentState, VersionedChanges};

/// Converts an LSP position to a character offset in the Rope.
fn position_to_char(position: &Position, text: &Rope) -> usize {
    let line = (position.line as usize).min(text.len_lines().saturating_sub(1));
    let char = position.character as usize;
    (text.line_to_char(line) + char).min(text.len_chars())
}

impl LspDocumentState {
    /// Creates document state from freshly opened text, parsing it when the
    /// grammar is available.
    pub fn open(uri: Url, text: &str, version: i32) -> Self {
        Self {
            uri,
            text: Rope::from_str(text),
            version,
            tree: parse_code(text),
            history: Default::default(),
        }
    }

    /// Applies a list of content changes, updating the text and syntax tree
    /// incrementally. Returns the updated text and tree if the version is
    /// newer, otherwise an error.
    pub fn apply(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) -> Result<(String, Option<Tree>), String> {
        if version <= self.version {
            return Err(format!("Version {} not newer than {}", version, self.version));
        }
        for change in &changes {
            if let Some(range) = change.range {
                let start_char = position_to_char(&range.start, &self.text);
                let end_char = position_to_char(&range.end, &self.text).max(start_char);
                let start_byte = self.text.char_to_byte(start_char);
                let old_end_byte = self.text.char_to_byte(end_char);
                self.text.remove(start_char..end_char);
                self.text.insert(start_char, &change.text);
                let new_end_byte = start_byte + change.text.len();
                let new_text = self.text.to_string();
                self.tree = match self.tree.take() {
                    Some(tree) => {
                        update_tree(&tree, &new_text, start_byte, old_end_byte, new_end_byte)
                    }
                    None => parse_code(&new_text),
                };
            } else {
                self.text = Rope::from_str(&change.text);
                self.tree = parse_code(&change.text);
            }
        }
        self.history.changes.push(VersionedChanges { version, changes });
        self.version = version;
        Ok((self.text.to_string(), self.tree.clone()))
    }
}

impl LspDocument {
    /// Returns the URI of the document.
    pub async fn uri(&self) -> Url {
        self.state.read().await.uri.clone()
    }

    /// Returns the current text of the document as a string.
    pub async fn text(&self) -> String {
        self.state.read().await.text.to_string()
    }

    /// Returns the current version of the document.
    pub async fn version(&self) -> i32 {
        self.state.read().await.version
    }

    /// Returns a clone of the current syntax tree, if the grammar parsed it.
    pub async fn tree(&self) -> Option<Tree> {
        self.state.read().await.tree.clone()
    }

    /// Returns the rope and tree together, for handlers that need both under
    /// one lock acquisition.
    pub async fn snapshot(&self) -> (Rope, Option<Tree>) {
        let state = self.state.read().await;
        (state.text.clone(), state.tree.clone())
    }

    /// Applies changes to the document, updating text and tree.
    pub async fn apply(
        &self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) -> Option<(String, Option<Tree>)> {
        let mut state = self.state.write().await;
        state.apply(changes, version).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower_lsp::lsp_types::Range;

    /// Helper to create a test LspDocument.
    fn create_test_document(uri: &str, text: &str) -> Arc<LspDocument> {
        Arc::new(LspDocument {
            id: 1,
            state: RwLock::new(LspDocumentState::open(
                Url::parse(uri).unwrap(),
                text,
                0,
            )),
        })
    }

    #[tokio::test]
    async fn test_apply_full_change() {
        // Replacing the entire document text
        let doc = create_test_document("file:///test.jq", ".foo");
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: ".bar".to_string(),
        }];

        let result = doc.apply(changes, 1).await.map(|(text, _)| text);
        assert!(result.is_some(), "Apply should succeed");
        assert_eq!(result.unwrap(), ".bar", "Text should be updated");
        assert_eq!(doc.version().await, 1, "Version should be updated");
    }

    #[tokio::test]
    async fn test_apply_incremental_change() {
        // Replacing a portion of the document text
        let doc = create_test_document("file:///test.jq", ".foo | length");
        let changes = vec![TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position { line: 0, character: 1 },
                end: Position { line: 0, character: 4 },
            }),
            range_length: None,
            text: "bars".to_string(),
        }];

        let result = doc.apply(changes, 1).await.map(|(text, _)| text);
        assert!(result.is_some(), "Apply should succeed");
        assert_eq!(result.unwrap(), ".bars | length", "Text should be updated");
    }

    #[tokio::test]
    async fn test_apply_multiple_incremental() {
        // Applying multiple incremental changes sequentially
        let doc = create_test_document("file:///test.jq", "hello world");
        let changes = vec![
            TextDocumentContentChangeEvent {
                range: Some(Range {
                    start: Position { line: 0, character: 6 },
                    end: Position { line: 0, character: 11 },
                }),
                range_length: None,
                text: "jq".to_string(),
            },
            TextDocumentContentChangeEvent {
                range: Some(Range {
                    start: Position { line: 0, character: 0 },
                    end: Position { line: 0, character: 5 },
                }),
                range_length: None,
                text: "hi".to_string(),
            },
        ];

        let result = doc.apply(changes, 1).await.map(|(text, _)| text);
        assert!(result.is_some(), "Apply should succeed");
        assert_eq!(result.unwrap(), "hi jq", "Text should reflect both changes");
    }

    #[tokio::test]
    async fn test_apply_outdated_version() {
        // Changes with an outdated version must be rejected
        let doc = create_test_document("file:///test.jq", ".a");
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: ".b".to_string(),
        }];

        let _ = doc.apply(changes.clone(), 1).await;
        let result = doc.apply(changes, -1).await;
        assert!(result.is_none(), "Apply should fail for outdated version");
        assert_eq!(doc.text().await, ".b", "Text should remain from previous change");
        assert_eq!(doc.version().await, 1, "Version should not change");
    }

    #[tokio::test]
    async fn test_tree_follows_edits() {
        // The syntax tree is re-parsed across incremental edits
        let doc = create_test_document("file:///test.jq", ".foo");
        let before = doc.tree().await;
        let changes = vec![TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position { line: 0, character: 4 },
                end: Position { line: 0, character: 4 },
            }),
            range_length: None,
            text: " | length".to_string(),
        }];
        doc.apply(changes, 1).await;
        let after = doc.tree().await;

        if let (Some(before), Some(after)) = (before, after) {
            assert!(
                after.root_node().end_byte() > before.root_node().end_byte(),
                "tree should cover the appended text"
            );
        }
    }
}
