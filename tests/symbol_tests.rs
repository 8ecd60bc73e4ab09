//! Outline extraction checks for jq definitions.

use indoc::indoc;
use ropey::Rope;
use tower_lsp::lsp_types::SymbolKind;

use jq_language_server::syntax::symbols::{document_symbols, outline};
use jq_language_server::tree_sitter::parse_code;

fn symbols_of(source: &str) -> Vec<tower_lsp::lsp_types::DocumentSymbol> {
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    document_symbols(tree.root_node(), &Rope::from_str(source))
}

#[test]
fn test_single_definition() {
    let symbols = symbols_of("def greet: .name;");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "greet");
    assert_eq!(symbols[0].kind, SymbolKind::FUNCTION);
}

#[test]
fn test_definition_with_parameters() {
    let symbols = symbols_of("def add(a; b): a + b;");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "add", "the display name is the identifier, not the params");
}

#[test]
fn test_nested_definitions_nest_in_outline() {
    let source = "def outer: def inner: 1; inner;";
    let symbols = symbols_of(source);

    assert_eq!(symbols.len(), 1, "only the outer definition is top-level");
    assert_eq!(symbols[0].name, "outer");
    let children = symbols[0].children.as_ref().expect("nested definition");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "inner");
}

#[test]
fn test_multiple_definitions_in_order() {
    let source = indoc! {r#"
        def first: 1;
        def second: 2;
        .x | first
    "#};
    let symbols = symbols_of(source);
    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["first", "second"], "entries appear in buffer order");
}

#[test]
fn test_name_selection_range_sits_inside_definition_range() {
    let symbols = symbols_of("def greet: .name;");
    let symbol = &symbols[0];
    assert!(
        symbol.range.start <= symbol.selection_range.start
            && symbol.selection_range.end <= symbol.range.end,
        "selection range must be contained in the full range"
    );
    assert_eq!(symbol.range.start.line, 0);
    assert_eq!(symbol.range.start.character, 0);
}

#[test]
fn test_program_without_definitions_has_no_symbols() {
    assert!(symbols_of(".a | .b").is_empty());
}

#[test]
fn test_outline_flattens_nested_definitions() {
    let tree = parse_code("def outer: def inner: 1; inner;")
        .expect("jq grammar should be available in tests");
    let entries = outline(
        tree.root_node(),
        &Rope::from_str("def outer: def inner: 1; inner;"),
    );
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["outer", "inner"]);
}
