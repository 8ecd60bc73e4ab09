//! Classification checks: static table membership and span collection.

use jq_language_server::syntax::highlight::{classify, collect_highlights, Highlight, HighlightSpan};
use jq_language_server::syntax::tables;
use jq_language_server::tree_sitter::parse_code;

fn spans(source: &str) -> Vec<HighlightSpan> {
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    collect_highlights(&tree, source)
}

fn span_at(spans: &[HighlightSpan], line: u32, column: u32) -> Option<HighlightSpan> {
    spans
        .iter()
        .copied()
        .find(|s| s.line == line && s.column == column)
}

#[test]
fn test_keyword_table_facts() {
    assert!(tables::is_keyword("reduce"), "'reduce' is classified as a keyword");
    assert!(tables::is_operator("//="), "'//=' is classified as an operator");
    assert!(tables::is_builtin("select"));
    assert!(tables::is_format("@tsv"));
}

#[test]
fn test_comment_and_literal_spans() {
    let spans = spans("# note\n1 + \"hi\"");

    let comment = span_at(&spans, 0, 0).expect("comment span");
    assert_eq!(comment.highlight, Highlight::Comment);
    assert_eq!(comment.length, 6);

    let number = span_at(&spans, 1, 0).expect("number span");
    assert_eq!(number.highlight, Highlight::Number);

    let plus = span_at(&spans, 1, 2).expect("operator span");
    assert_eq!(plus.highlight, Highlight::Operator);

    let string = span_at(&spans, 1, 4).expect("string span");
    assert_eq!(string.highlight, Highlight::String);
    assert_eq!(string.length, 4, "string span covers the quotes");
}

#[test]
fn test_conditional_keywords_highlight() {
    let spans = spans("if . then 1 else 2 end");

    for (column, length) in [(0u32, 2u32), (5, 4), (12, 4), (19, 3)] {
        let span = span_at(&spans, 0, column)
            .unwrap_or_else(|| panic!("expected keyword span at column {column}"));
        assert_eq!(span.highlight, Highlight::Keyword);
        assert_eq!(span.length, length);
    }
}

#[test]
fn test_constants_highlight() {
    let spans = spans("[true, false, null]");
    let constants: Vec<_> = spans
        .iter()
        .filter(|s| s.highlight == Highlight::Constant)
        .collect();
    assert_eq!(constants.len(), 3, "all three literal constants are classified");
}

#[test]
fn test_pipe_is_an_operator() {
    let spans = spans(".a | .b");
    let pipe = span_at(&spans, 0, 3).expect("pipe span");
    assert_eq!(pipe.highlight, Highlight::Operator);
    assert_eq!(pipe.length, 1);
}

#[test]
fn test_definition_name_is_a_function() {
    let spans = spans("def add: . + 1;");
    let name = span_at(&spans, 0, 4).expect("definition name span");
    assert_eq!(name.highlight, Highlight::Function);
    assert_eq!(name.length, 3);
}

#[test]
fn test_spans_are_ordered_and_disjoint() {
    let spans = spans("def f: if .a then 1 else \"x\" end;\n.y | f");
    for pair in spans.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let a_end = (a.line, a.column + a.length);
        let b_start = (b.line, b.column);
        assert!(
            a_end <= b_start || a.line < b.line,
            "spans must not overlap: {a:?} then {b:?}"
        );
    }
}

#[test]
fn test_classification_is_pure() {
    let source = "def f: .a | select(. > 1);";
    assert_eq!(
        spans(source),
        spans(source),
        "classifying the same tree twice yields the same spans"
    );
}

#[test]
fn test_unmatched_nodes_have_no_category() {
    let tree = parse_code("1").expect("jq grammar should be available in tests");
    let root = tree.root_node();
    assert_eq!(
        classify(&root, "1"),
        None,
        "the program root renders with the default style"
    );
}

#[test]
fn test_legend_covers_every_index() {
    let legend = Highlight::legend();
    let highlights = [
        Highlight::Comment,
        Highlight::String,
        Highlight::Number,
        Highlight::Keyword,
        Highlight::Operator,
        Highlight::Variable,
        Highlight::Function,
        Highlight::Builtin,
        Highlight::Property,
        Highlight::Constant,
        Highlight::Format,
    ];
    for highlight in highlights {
        assert!(
            (highlight.token_type_index() as usize) < legend.token_types.len(),
            "{highlight:?} must index into the legend"
        );
    }
}
