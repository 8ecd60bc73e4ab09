//! Structural navigation over the syntax tree
//!
//! Walks parent chains: the enclosing-pipeline lookup shared with the
//! indentation engine, and the expanding selection-range chain handed to the
//! editor for structural selection.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, SelectionRange};
use tree_sitter::{Node, Tree};

use super::node_lsp_range;
use crate::tree_sitter::has_token_child;

/// Whether a node is a pipeline with at least two operands (`a | b`).
///
/// Detection is by token shape rather than node-kind name: a node counts as
/// a pipeline only when a `|` token actually separates operands, so wrapper
/// nodes around a single filter never qualify.
pub fn is_pipeline(node: Node<'_>) -> bool {
    has_token_child(node, "|")
}

/// Nearest enclosing pipeline of a node, the node itself included.
pub fn enclosing_pipeline<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let mut current = Some(node);
    while let Some(n) = current {
        if is_pipeline(n) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Chain of enclosing node ranges for a buffer position.
///
/// The innermost range comes first; each `parent` link widens the selection.
/// Consecutive duplicate ranges are dropped so every step actually grows.
pub fn selection_range(tree: &Tree, text: &Rope, position: Position) -> Option<SelectionRange> {
    let line = position.line as usize;
    if line >= text.len_lines() {
        return None;
    }
    let char_idx = text.line_to_char(line) + position.character as usize;
    let byte = text.char_to_byte(char_idx.min(text.len_chars()));

    let mut node = tree
        .root_node()
        .descendant_for_byte_range(byte, byte)?;

    // Collect ranges innermost to outermost, skipping duplicates.
    let mut last = node_lsp_range(&node);
    let mut ranges = vec![last];
    while let Some(parent) = node.parent() {
        let range = node_lsp_range(&parent);
        if range != last {
            ranges.push(range);
            last = range;
        }
        node = parent;
    }

    let mut chain: Option<SelectionRange> = None;
    for range in ranges.into_iter().rev() {
        chain = Some(SelectionRange {
            range,
            parent: chain.map(Box::new),
        });
    }
    chain
}
