//! Cached Tree-Sitter kind IDs for O(1) node type checking
//!
//! Node classification runs on every redisplay-sized request, so node kinds
//! are compared as integers instead of strings. Kind IDs are cached using
//! `OnceLock` for thread-safe lazy initialization.
//!
//! A kind absent from the loaded grammar resolves to an ID that matches no
//! real node, so the corresponding predicate is simply never true.

use std::sync::OnceLock;

use tree_sitter::Language;

use crate::tree_sitter::language;

static COMMENT_KIND: OnceLock<u16> = OnceLock::new();
static NUMBER_KIND: OnceLock<u16> = OnceLock::new();
static STRING_KIND: OnceLock<u16> = OnceLock::new();
static INTERPOLATION_KIND: OnceLock<u16> = OnceLock::new();
static VARIABLE_KIND: OnceLock<u16> = OnceLock::new();
static IDENTIFIER_KIND: OnceLock<u16> = OnceLock::new();
static FIELD_KIND: OnceLock<u16> = OnceLock::new();
static FIELD_ID_KIND: OnceLock<u16> = OnceLock::new();
static FORMAT_KIND: OnceLock<u16> = OnceLock::new();

#[inline(always)]
fn lang() -> Language {
    language()
}

/// Check if node is a `comment`
#[inline(always)]
pub(crate) fn is_comment(kind_id: u16) -> bool {
    let id = *COMMENT_KIND.get_or_init(|| lang().id_for_node_kind("comment", true));
    kind_id == id
}

/// Check if node is a `number` literal
#[inline(always)]
pub(crate) fn is_number(kind_id: u16) -> bool {
    let id = *NUMBER_KIND.get_or_init(|| lang().id_for_node_kind("number", true));
    kind_id == id
}

/// Check if node is a `string` literal
#[inline(always)]
pub(crate) fn is_string(kind_id: u16) -> bool {
    let id = *STRING_KIND.get_or_init(|| lang().id_for_node_kind("string", true));
    kind_id == id
}

/// Check if node is a string `interpolation`
#[inline(always)]
pub(crate) fn is_interpolation(kind_id: u16) -> bool {
    let id = *INTERPOLATION_KIND
        .get_or_init(|| lang().id_for_node_kind("interpolation", true));
    kind_id == id
}

/// Check if node is a `variable` (`$name`)
#[inline(always)]
pub(crate) fn is_variable(kind_id: u16) -> bool {
    let id = *VARIABLE_KIND.get_or_init(|| lang().id_for_node_kind("variable", true));
    kind_id == id
}

/// Check if node is an `identifier`
#[inline(always)]
pub(crate) fn is_identifier(kind_id: u16) -> bool {
    let id = *IDENTIFIER_KIND.get_or_init(|| lang().id_for_node_kind("identifier", true));
    kind_id == id
}

/// Check if node is a `field` access (`.name`)
#[inline(always)]
pub(crate) fn is_field(kind_id: u16) -> bool {
    let id = *FIELD_KIND.get_or_init(|| lang().id_for_node_kind("field", true));
    kind_id == id
}

/// Check if node is a `field_id` (the bare name inside a field access)
#[inline(always)]
pub(crate) fn is_field_id(kind_id: u16) -> bool {
    let id = *FIELD_ID_KIND.get_or_init(|| lang().id_for_node_kind("field_id", true));
    kind_id == id
}

/// Check if node is a `format` string (`@csv`, `@base64`, ...)
#[inline(always)]
pub(crate) fn is_format(kind_id: u16) -> bool {
    let id = *FORMAT_KIND.get_or_init(|| lang().id_for_node_kind("format", true));
    kind_id == id
}
