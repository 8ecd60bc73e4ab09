//! Node-to-highlight-category mapping
//!
//! A static lookup from syntax nodes to display categories. Anonymous tokens
//! match on token text against the keyword/operator tables; named nodes match
//! on node kind. Unmatched nodes get no category and render with the default
//! style. Classifying the same node twice yields the same category.

use tower_lsp::lsp_types::{SemanticTokenType, SemanticTokensLegend};
use tree_sitter::{Node, Tree};

use super::{kind_ids, tables};
use crate::tree_sitter::opens_with;

/// Display category for a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Comment,
    String,
    Number,
    Keyword,
    Operator,
    Variable,
    Function,
    Builtin,
    Property,
    Constant,
    Format,
}

impl Highlight {
    /// Index into the legend returned by [`Highlight::legend`].
    pub fn token_type_index(self) -> u32 {
        match self {
            Highlight::Comment => 0,
            Highlight::String => 1,
            Highlight::Number => 2,
            Highlight::Keyword => 3,
            Highlight::Operator => 4,
            Highlight::Variable => 5,
            Highlight::Function => 6,
            Highlight::Builtin => 7,
            Highlight::Property => 8,
            Highlight::Constant => 9,
            Highlight::Format => 10,
        }
    }

    /// The semantic token legend advertised in the server capabilities.
    ///
    /// Order must match [`Highlight::token_type_index`].
    pub fn legend() -> SemanticTokensLegend {
        SemanticTokensLegend {
            token_types: vec![
                SemanticTokenType::COMMENT,
                SemanticTokenType::STRING,
                SemanticTokenType::NUMBER,
                SemanticTokenType::KEYWORD,
                SemanticTokenType::OPERATOR,
                SemanticTokenType::VARIABLE,
                SemanticTokenType::FUNCTION,
                SemanticTokenType::MACRO,
                SemanticTokenType::PROPERTY,
                SemanticTokenType::ENUM_MEMBER,
                SemanticTokenType::DECORATOR,
            ],
            token_modifiers: vec![],
        }
    }
}

/// A classified span, in absolute buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub line: u32,
    pub column: u32,
    pub length: u32,
    pub highlight: Highlight,
}

/// Classify one node.
///
/// Returns `None` for nodes without a display category; those render with
/// the default style.
pub fn classify(node: &Node<'_>, source: &str) -> Option<Highlight> {
    if !node.is_named() {
        let token = node.kind();
        if tables::is_keyword(token) {
            return Some(Highlight::Keyword);
        }
        if tables::is_operator(token) {
            return Some(Highlight::Operator);
        }
        if tables::is_constant(token) {
            return Some(Highlight::Constant);
        }
        return None;
    }

    let kind_id = node.kind_id();
    if kind_ids::is_comment(kind_id) {
        return Some(Highlight::Comment);
    }
    if kind_ids::is_number(kind_id) {
        return Some(Highlight::Number);
    }
    if kind_ids::is_string(kind_id) {
        return Some(Highlight::String);
    }
    if kind_ids::is_variable(kind_id) {
        return Some(Highlight::Variable);
    }
    if kind_ids::is_format(kind_id) {
        return Some(Highlight::Format);
    }
    if kind_ids::is_field(kind_id) || kind_ids::is_field_id(kind_id) {
        return Some(Highlight::Property);
    }
    if kind_ids::is_identifier(kind_id) {
        return Some(classify_identifier(node, source));
    }
    match node.kind() {
        "true" | "false" | "null" => Some(Highlight::Constant),
        _ => None,
    }
}

/// Classify a bare identifier from its surroundings.
///
/// Object keys are written `name:`, definition names follow a `def` token,
/// everything else is a function reference (zero-arity calls have no
/// parentheses in jq).
fn classify_identifier(node: &Node<'_>, source: &str) -> Highlight {
    // The definition-name check comes first: in `def add: ...` the name is
    // also followed by a colon.
    if node.parent().map_or(false, |p| opens_with(p, "def")) {
        return Highlight::Function;
    }
    if node
        .next_sibling()
        .map_or(false, |s| !s.is_named() && s.kind() == ":")
    {
        return Highlight::Property;
    }
    let text = node.utf8_text(source.as_bytes()).unwrap_or_default();
    if tables::is_builtin(text) {
        Highlight::Builtin
    } else {
        Highlight::Function
    }
}

/// Collect highlight spans for a whole tree, in buffer order.
pub fn collect_highlights(tree: &Tree, source: &str) -> Vec<HighlightSpan> {
    let line_lengths: Vec<usize> = source.lines().map(|l| l.chars().count()).collect();
    let mut spans = Vec::new();
    collect_node(tree.root_node(), source, &line_lengths, &mut spans);
    spans
}

fn collect_node(
    node: Node<'_>,
    source: &str,
    line_lengths: &[usize],
    spans: &mut Vec<HighlightSpan>,
) {
    if let Some(highlight) = classify(&node, source) {
        // A string with interpolations is not emitted whole; its pieces are
        // classified individually so the embedded expressions keep their own
        // categories.
        let descend = highlight == Highlight::String && has_interpolation(node);
        if !descend {
            if let Some(span) = span_for(node, highlight, line_lengths) {
                spans.push(span);
            }
            return;
        }
    }

    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            collect_node(cursor.node(), source, line_lengths, spans);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

fn has_interpolation(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|c| kind_ids::is_interpolation(c.kind_id()));
    found
}

/// Span for one classified node, clamped to its first line.
fn span_for(node: Node<'_>, highlight: Highlight, line_lengths: &[usize]) -> Option<HighlightSpan> {
    let start = node.start_position();
    let end = node.end_position();
    let length = if start.row == end.row {
        end.column.saturating_sub(start.column)
    } else {
        line_lengths
            .get(start.row)
            .copied()
            .unwrap_or(start.column)
            .saturating_sub(start.column)
    };
    if length == 0 {
        return None;
    }
    Some(HighlightSpan {
        line: start.row as u32,
        column: start.column as u32,
        length: length as u32,
        highlight,
    })
}
