//! Syntax-aware features for jq buffers
//!
//! Everything in this module is either a static table (keyword, operator and
//! builtin-name lists) or a thin function that inspects tree-sitter nodes:
//! highlight classification, the ordered indentation rule list, outline
//! extraction and structural navigation. Parsing itself lives in
//! [`crate::tree_sitter`].

pub mod highlight;
pub mod indent;
pub mod kind_ids;
pub mod navigation;
pub mod symbols;
pub mod tables;

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Position, Range};
use tree_sitter::Node;

/// User-configurable options for the syntax features.
///
/// Supplied through LSP `initializationOptions` and later merged from
/// `workspace/didChangeConfiguration` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JqSettings {
    /// Columns per indentation level.
    pub indent_width: u32,
    /// Align pipeline continuation lines with the pipeline's first operand
    /// instead of indenting one level past it.
    pub align_pipelines: bool,
}

impl Default for JqSettings {
    fn default() -> Self {
        Self {
            indent_width: 2,
            align_pipelines: true,
        }
    }
}

/// Convert a node's span to an LSP range.
pub fn node_lsp_range(node: &Node<'_>) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range {
        start: Position {
            line: start.row as u32,
            character: start.column as u32,
        },
        end: Position {
            line: end.row as u32,
            character: end.column as u32,
        },
    }
}
