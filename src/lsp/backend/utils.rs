//! Utility types and functions for the LSP backend

use tower_lsp::lsp_types::SemanticToken;

use crate::syntax::highlight::HighlightSpan;

/// Helper for building semantic tokens using delta encoding
///
/// LSP semantic tokens use delta encoding where each token's position
/// is relative to the previous token, reducing payload size.
pub(super) struct SemanticTokensBuilder {
    tokens: Vec<SemanticToken>,
    prev_line: u32,
    prev_start: u32,
}

impl SemanticTokensBuilder {
    pub(super) fn new() -> Self {
        Self {
            tokens: Vec::new(),
            prev_line: 0,
            prev_start: 0,
        }
    }

    /// Add a classified span with absolute position.
    ///
    /// The builder converts to delta encoding; spans must arrive in buffer
    /// order.
    pub(super) fn push(&mut self, span: &HighlightSpan) {
        let delta_line = span.line.saturating_sub(self.prev_line);
        let delta_start = if delta_line == 0 {
            span.column.saturating_sub(self.prev_start)
        } else {
            span.column
        };

        self.tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length: span.length,
            token_type: span.highlight.token_type_index(),
            token_modifiers_bitset: 0,
        });

        self.prev_line = span.line;
        self.prev_start = span.column;
    }

    /// Build the final vector of semantic tokens
    pub(super) fn build(self) -> Vec<SemanticToken> {
        self.tokens
    }
}
