//! Indentation engine
//!
//! An ordered rule list scanned first-match: each entry pairs a predicate on
//! the syntax node at the start of a line with an anchor and an offset in
//! indentation levels. Anchors resolve by walking up parent nodes, so every
//! rule is a handful of tree lookups.
//!
//! Construct detection is by leading token (`{`, `if`, `def`, ...) rather
//! than node-kind name, which keeps the table stable across grammar
//! revisions.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, TextEdit};
use tree_sitter::{Node, Tree};

use super::navigation::{enclosing_pipeline, is_pipeline};
use super::JqSettings;
use crate::tree_sitter::{node_at_byte, opens_with_any};

/// Tokens that close a bracketed construct.
const CLOSING_TOKENS: &[&str] = &["}", "]", ")"];

/// Tokens that continue a conditional and align with its `if`.
const IF_SEQUENCE_TOKENS: &[&str] = &["then", "elif", "else", "end"];

/// Tokens that open a bracketed construct.
const OPEN_DELIMITERS: &[&str] = &["{", "[", "("];

/// Leading keywords of constructs whose bodies indent one level.
const BODY_KEYWORDS: &[&str] = &["def", "if", "try", "reduce", "foreach", "label"];

/// Predicate side of an indentation rule.
#[derive(Debug, Clone, Copy)]
enum Pred {
    /// The line starts with a closing bracket.
    Closing,
    /// The line starts with one of the given tokens.
    TokenIs(&'static [&'static str]),
    /// The line starts with a pipe operator.
    Pipe,
    /// The nearest enclosing construct begun on an earlier line is a pipeline.
    InsidePipeline,
    /// ... is a bracketed construct.
    InsideDelimited,
    /// ... is a keyword-led construct (`def`, `if`, `reduce`, ...).
    InsideKeywordBody,
    /// Always matches.
    Always,
}

/// Anchor side of an indentation rule: the column the offset is added to.
///
/// Anchors resolve to the indentation of the line the anchor node starts on,
/// so a construct opened mid-line still indents relative to its statement.
/// The one exception is an aligned pipeline, which anchors on the first
/// operand's own column.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// The node's parent.
    ParentStart,
    /// The nearest ancestor led by one of the given tokens.
    Opener(&'static [&'static str]),
    /// The enclosing pipeline. Honors the alignment toggle: aligned
    /// continuations sit on the pipeline's first operand, otherwise they
    /// indent one level past the pipeline's line.
    Pipeline,
    /// The nearest enclosing construct from an earlier line.
    Construct,
    /// Column zero.
    Root,
}

/// One `(predicate, anchor, offset)` entry.
#[derive(Debug, Clone, Copy)]
struct IndentRule {
    pred: Pred,
    anchor: Anchor,
    levels: u32,
}

/// The rule table. Scanned in order; the first match wins.
const RULES: &[IndentRule] = &[
    IndentRule { pred: Pred::Closing, anchor: Anchor::ParentStart, levels: 0 },
    IndentRule { pred: Pred::TokenIs(IF_SEQUENCE_TOKENS), anchor: Anchor::Opener(&["if"]), levels: 0 },
    IndentRule { pred: Pred::TokenIs(&["catch"]), anchor: Anchor::Opener(&["try"]), levels: 0 },
    IndentRule { pred: Pred::Pipe, anchor: Anchor::Pipeline, levels: 0 },
    IndentRule { pred: Pred::InsidePipeline, anchor: Anchor::Pipeline, levels: 0 },
    IndentRule { pred: Pred::InsideDelimited, anchor: Anchor::Construct, levels: 1 },
    IndentRule { pred: Pred::InsideKeywordBody, anchor: Anchor::Construct, levels: 1 },
    IndentRule { pred: Pred::Always, anchor: Anchor::Root, levels: 0 },
];

/// What kind of construct encloses the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstructKind {
    Pipeline,
    Delimited,
    KeywordBody,
}

struct IndentContext<'tree, 'a> {
    node: Node<'tree>,
    line: usize,
    text: &'a Rope,
    settings: &'a JqSettings,
}

impl<'tree> IndentContext<'tree, '_> {
    /// Nearest ancestor that starts on an earlier line and is a recognizable
    /// construct. Ancestors that merely wrap the same position fall through.
    fn nearest_construct(&self) -> Option<(ConstructKind, Node<'tree>)> {
        let mut current = Some(self.node);
        while let Some(n) = current {
            if n.start_position().row < self.line {
                if is_pipeline(n) {
                    return Some((ConstructKind::Pipeline, n));
                }
                if opens_with_any(n, OPEN_DELIMITERS) {
                    return Some((ConstructKind::Delimited, n));
                }
                if opens_with_any(n, BODY_KEYWORDS) {
                    return Some((ConstructKind::KeywordBody, n));
                }
            }
            current = n.parent();
        }
        None
    }

    fn line_starts_with_token(&self, tokens: &[&str]) -> bool {
        !self.node.is_named() && tokens.contains(&self.node.kind())
    }

    /// Indentation of the line a node starts on.
    fn line_indent_of(&self, node: Node<'_>) -> usize {
        line_indent(self.text, node.start_position().row)
    }
}

/// Column of the first non-blank character on a line.
fn line_indent(text: &Rope, row: usize) -> usize {
    if row >= text.len_lines() {
        return 0;
    }
    text.line(row)
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count()
}

impl IndentRule {
    /// Apply one rule: `None` when the predicate does not match.
    fn apply(&self, ctx: &IndentContext<'_, '_>) -> Option<usize> {
        let matched = match self.pred {
            Pred::Closing => ctx.line_starts_with_token(CLOSING_TOKENS),
            Pred::TokenIs(tokens) => ctx.line_starts_with_token(tokens),
            Pred::Pipe => ctx.line_starts_with_token(&["|"]),
            Pred::InsidePipeline => {
                matches!(ctx.nearest_construct(), Some((ConstructKind::Pipeline, _)))
            }
            Pred::InsideDelimited => {
                matches!(ctx.nearest_construct(), Some((ConstructKind::Delimited, _)))
            }
            Pred::InsideKeywordBody => {
                matches!(ctx.nearest_construct(), Some((ConstructKind::KeywordBody, _)))
            }
            Pred::Always => true,
        };
        if !matched {
            return None;
        }

        let width = ctx.settings.indent_width as usize;
        let base = match self.anchor {
            Anchor::ParentStart => ctx.line_indent_of(ctx.node.parent()?),
            Anchor::Opener(tokens) => {
                let mut current = ctx.node.parent();
                loop {
                    let n = current?;
                    if opens_with_any(n, tokens) {
                        break ctx.line_indent_of(n);
                    }
                    current = n.parent();
                }
            }
            Anchor::Pipeline => {
                let pipeline = enclosing_pipeline(ctx.node)?;
                if ctx.settings.align_pipelines {
                    pipeline.start_position().column
                } else {
                    ctx.line_indent_of(pipeline) + width
                }
            }
            Anchor::Construct => ctx.line_indent_of(ctx.nearest_construct()?.1),
            Anchor::Root => 0,
        };

        Some(base + self.levels as usize * width)
    }
}

/// Syntax node at the first non-blank column of a line; on a blank line, the
/// node enclosing the line start.
fn node_for_line<'tree>(tree: &'tree Tree, text: &Rope, line: usize) -> Node<'tree> {
    let first_char = text
        .line(line)
        .chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or(0);
    let char_idx = text.line_to_char(line) + first_char;
    let byte = text.char_to_byte(char_idx.min(text.len_chars()));
    node_at_byte(tree, byte)
}

/// Whether the node sits inside a string literal begun on an earlier line.
/// Such lines are literal content and keep their indentation.
fn inside_multiline_string(node: Node<'_>, line: usize) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if super::kind_ids::is_string(n.kind_id()) && n.start_position().row < line {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Compute the target indentation column for a line.
///
/// The syntax node at the line's first non-blank column drives the rule
/// scan, first match winning.
pub fn indent_for_line(tree: &Tree, text: &Rope, line: usize, settings: &JqSettings) -> usize {
    if line >= text.len_lines() {
        return 0;
    }
    let node = node_for_line(tree, text, line);
    let ctx = IndentContext { node, line, text, settings };
    RULES
        .iter()
        .find_map(|rule| rule.apply(&ctx))
        .unwrap_or(0)
}

/// Text edit fixing one line's leading whitespace, when it differs from the
/// computed indentation. Blank lines are left alone.
pub fn indent_edit_for_line(
    tree: &Tree,
    text: &Rope,
    line: usize,
    settings: &JqSettings,
) -> Option<TextEdit> {
    if line >= text.len_lines() {
        return None;
    }
    let line_slice = text.line(line);
    let current: usize = line_slice
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();
    if line_slice.chars().all(|c| c.is_whitespace()) {
        return None;
    }
    if inside_multiline_string(node_for_line(tree, text, line), line) {
        return None;
    }

    let target = indent_for_line(tree, text, line, settings);
    if target == current {
        return None;
    }

    Some(TextEdit {
        range: Range {
            start: Position { line: line as u32, character: 0 },
            end: Position { line: line as u32, character: current as u32 },
        },
        new_text: " ".repeat(target),
    })
}

/// Edits re-indenting every line in `[start_line, end_line]`.
pub fn indent_edits(
    tree: &Tree,
    text: &Rope,
    start_line: usize,
    end_line: usize,
    settings: &JqSettings,
) -> Vec<TextEdit> {
    let last = end_line.min(text.len_lines().saturating_sub(1));
    (start_line..=last)
        .filter_map(|line| indent_edit_for_line(tree, text, line, settings))
        .collect()
}
