//! Outline entries for jq definitions
//!
//! A definition is any node whose leading token is `def`; its display name
//! is the first identifier descendant, in practice the token following
//! `def`. Nested definitions nest in the outline.

use ropey::Rope;
use tower_lsp::lsp_types::{DocumentSymbol, Range, SymbolKind};
use tree_sitter::Node;

use super::{kind_ids, node_lsp_range};
use crate::tree_sitter::opens_with;

/// A flat outline entry, as indexed for workspace-wide symbol search.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub name: String,
    /// Full extent of the definition.
    pub range: Range,
    /// Extent of the name itself.
    pub selection_range: Range,
}

/// Whether a node is a function definition.
pub fn is_definition(node: Node<'_>) -> bool {
    opens_with(node, "def")
}

/// Display name of a definition: its first identifier descendant.
fn definition_name(node: Node<'_>, source: &Rope) -> Option<(String, Range)> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_named() && kind_ids::is_identifier(child.kind_id()) {
            let name = source
                .byte_slice(child.start_byte()..child.end_byte())
                .to_string();
            return Some((name, node_lsp_range(&child)));
        }
    }
    // Grammar revisions may wrap the name; fall back to the token after `def`.
    let child = node.child(1)?;
    let name = source
        .byte_slice(child.start_byte()..child.end_byte())
        .to_string();
    Some((name, node_lsp_range(&child)))
}

/// Hierarchical document symbols for the whole tree.
pub fn document_symbols(root: Node<'_>, source: &Rope) -> Vec<DocumentSymbol> {
    let mut symbols = Vec::new();
    collect_into(root, source, &mut symbols);
    symbols
}

fn collect_into(node: Node<'_>, source: &Rope, out: &mut Vec<DocumentSymbol>) {
    if is_definition(node) {
        if let Some(symbol) = definition_symbol(node, source) {
            out.push(symbol);
            return;
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_into(child, source, out);
    }
}

fn definition_symbol(node: Node<'_>, source: &Rope) -> Option<DocumentSymbol> {
    let (name, selection_range) = definition_name(node, source)?;
    if name.is_empty() {
        return None;
    }

    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_into(child, source, &mut children);
    }

    Some(DocumentSymbol {
        name,
        detail: None,
        kind: SymbolKind::FUNCTION,
        tags: None,
        #[allow(deprecated)]
        deprecated: None,
        range: node_lsp_range(&node),
        selection_range,
        children: if children.is_empty() { None } else { Some(children) },
    })
}

/// Flat outline of every definition in the tree, in buffer order.
pub fn outline(root: Node<'_>, source: &Rope) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    flatten(&document_symbols(root, source), &mut entries);
    entries
}

fn flatten(symbols: &[DocumentSymbol], out: &mut Vec<OutlineEntry>) {
    for symbol in symbols {
        out.push(OutlineEntry {
            name: symbol.name.clone(),
            range: symbol.range,
            selection_range: symbol.selection_range,
        });
        if let Some(children) = &symbol.children {
            flatten(children, out);
        }
    }
}
