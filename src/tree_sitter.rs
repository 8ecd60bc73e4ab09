//! Tree-Sitter parsing interface for jq
//!
//! This module wraps the external `tree-sitter-jq` grammar: full parsing,
//! incremental re-parse, and the readiness probe that gates every
//! syntax-aware feature. All tree maintenance is delegated to the
//! tree-sitter runtime; nothing here implements parsing itself.

use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter::{InputEdit, Language, Node, Parser, Tree};

/// Error raised when the external grammar cannot be loaded into a parser.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("incompatible tree-sitter-jq grammar: {0}")]
    Incompatible(#[from] tree_sitter::LanguageError),
}

/// The jq tree-sitter language.
pub fn language() -> Language {
    tree_sitter_jq::LANGUAGE.into()
}

/// Build a parser configured for jq.
pub fn try_parser() -> Result<Parser, GrammarError> {
    let mut parser = Parser::new();
    parser.set_language(&language())?;
    Ok(parser)
}

/// Readiness flag for syntax-aware features.
///
/// The grammar is probed once per process. When the probe fails (missing or
/// ABI-incompatible grammar library), every feature built on the parse tree
/// degrades to plain-text mode and only document synchronization remains.
pub fn syntax_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| match try_parser() {
        Ok(_) => true,
        Err(e) => {
            warn!("jq grammar unavailable, degrading to plain text: {}", e);
            false
        }
    })
}

/// Parse jq code into a Tree-Sitter syntax tree.
///
/// Returns `None` when the grammar is unavailable or the parser gives up.
/// Callers treat a missing tree as plain text.
pub fn parse_code(code: &str) -> Option<Tree> {
    if !syntax_available() {
        return None;
    }
    let mut parser = try_parser().ok()?;
    let tree = parser.parse(code, None);
    if tree.is_none() {
        warn!("tree-sitter produced no tree for {} bytes of input", code.len());
    }
    tree
}

/// Update a syntax tree incrementally based on a text change.
///
/// This enables efficient re-parsing by reusing unchanged portions of the
/// tree. Falls back to a full parse when the incremental pass fails.
///
/// # Arguments
/// * `tree` - The existing syntax tree
/// * `new_text` - The updated source code
/// * `start_byte` - Byte offset where the edit starts
/// * `old_end_byte` - Byte offset where the edit ended in the old text
/// * `new_end_byte` - Byte offset where the edit ends in the new text
pub fn update_tree(
    tree: &Tree,
    new_text: &str,
    start_byte: usize,
    old_end_byte: usize,
    new_end_byte: usize,
) -> Option<Tree> {
    let mut parser = try_parser().ok()?;

    let edit = InputEdit {
        start_byte,
        old_end_byte,
        new_end_byte,
        start_position: tree.root_node().start_position(),
        old_end_position: tree.root_node().end_position(),
        new_end_position: tree.root_node().end_position(),
    };

    let mut edited = tree.clone();
    edited.edit(&edit);

    match parser.parse(new_text, Some(&edited)) {
        Some(new_tree) => Some(new_tree),
        None => {
            debug!("incremental parse failed, performing full parse");
            parse_code(new_text)
        }
    }
}

/// Smallest node whose span contains the byte offset.
pub fn node_at_byte(tree: &Tree, byte: usize) -> Node<'_> {
    tree.root_node()
        .descendant_for_byte_range(byte, byte)
        .unwrap_or_else(|| tree.root_node())
}

/// Whether a node's leading token is the given anonymous token.
///
/// Construct detection goes through token shape rather than node-kind names
/// so it keeps working across grammar revisions: a definition starts with
/// `def`, an object with `{`, a conditional with `if`.
pub fn opens_with(node: Node<'_>, token: &str) -> bool {
    node.child(0)
        .map_or(false, |c| !c.is_named() && c.kind() == token)
}

/// Whether a node's leading token is any of the given anonymous tokens.
pub fn opens_with_any(node: Node<'_>, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| opens_with(node, t))
}

/// Whether a node has a direct anonymous child with the given token text.
pub fn has_token_child(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}
