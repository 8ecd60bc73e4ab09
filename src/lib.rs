pub mod logging;
pub mod lsp;
pub mod syntax;
pub mod tree_sitter;
