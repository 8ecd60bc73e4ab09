//! Fixed input/output checks for the indentation engine.

use indoc::indoc;
use ropey::Rope;

use jq_language_server::syntax::indent::{indent_edit_for_line, indent_edits, indent_for_line};
use jq_language_server::syntax::JqSettings;
use jq_language_server::tree_sitter::parse_code;

fn indent_of(source: &str, line: usize, settings: &JqSettings) -> usize {
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    let text = Rope::from_str(source);
    indent_for_line(&tree, &text, line, settings)
}

#[test]
fn test_object_body_indents_one_level() {
    let source = indoc! {r#"
        {
        a: 1,
        b: 2
        }
    "#};
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 2, "first pair indents one level");
    assert_eq!(indent_of(source, 2, &settings), 2, "second pair indents one level");
}

#[test]
fn test_closing_brace_returns_to_object_start() {
    let source = "{\n  a: 1\n}";
    let settings = JqSettings::default();
    assert_eq!(
        indent_of(source, 2, &settings),
        0,
        "closing brace lines up with the object's starting column"
    );
}

#[test]
fn test_array_elements_and_closer() {
    let source = "[\n1,\n2\n]";
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 2);
    assert_eq!(indent_of(source, 2, &settings), 2);
    assert_eq!(indent_of(source, 3, &settings), 0, "closing bracket returns to the opener");
}

#[test]
fn test_indent_width_is_configurable() {
    let source = "[\n1\n]";
    let settings = JqSettings {
        indent_width: 4,
        ..JqSettings::default()
    };
    assert_eq!(indent_of(source, 1, &settings), 4);
}

#[test]
fn test_conditional_branches_align_with_if() {
    let source = indoc! {r#"
        if .a then
        .b
        else
        .c
        end
    "#};
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 2, "then-branch body indents");
    assert_eq!(indent_of(source, 2, &settings), 0, "'else' aligns with 'if'");
    assert_eq!(indent_of(source, 3, &settings), 2, "else-branch body indents");
    assert_eq!(indent_of(source, 4, &settings), 0, "'end' aligns with 'if'");
}

#[test]
fn test_elif_aligns_with_if() {
    let source = indoc! {r#"
        if .a then
        .b
        elif .c then
        .d
        end
    "#};
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 2, &settings), 0, "'elif' aligns with 'if'");
    assert_eq!(indent_of(source, 3, &settings), 2);
}

#[test]
fn test_catch_aligns_with_try() {
    let source = indoc! {r#"
        try
        .a
        catch
        .b
    "#};
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 2, "try body indents");
    assert_eq!(indent_of(source, 2, &settings), 0, "'catch' aligns with 'try'");
}

#[test]
fn test_definition_body_indents() {
    let source = "def inc:\n. + 1;";
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 2);
}

#[test]
fn test_pipeline_continuation_aligns_by_default() {
    let source = ".a\n| .b";
    let settings = JqSettings::default();
    assert_eq!(
        indent_of(source, 1, &settings),
        0,
        "pipe lines up with the pipeline's first operand"
    );
}

#[test]
fn test_pipeline_continuation_indents_when_alignment_off() {
    let source = ".a\n| .b";
    let settings = JqSettings {
        align_pipelines: false,
        ..JqSettings::default()
    };
    assert_eq!(indent_of(source, 1, &settings), 2);
}

#[test]
fn test_pipeline_inside_definition() {
    let source = indoc! {r#"
        def f:
          .a
          | .b;
    "#};
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 2, "body indents from def");
    assert_eq!(
        indent_of(source, 2, &settings),
        2,
        "pipe aligns with the pipeline's first operand"
    );
}

#[test]
fn test_top_level_lines_stay_at_column_zero() {
    let source = "def a: 1;\ndef b: 2;";
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 1, &settings), 0);
}

#[test]
fn test_edit_fixes_misindented_line() {
    let source = "{\n      a: 1\n}";
    let settings = JqSettings::default();
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    let text = Rope::from_str(source);

    let edit = indent_edit_for_line(&tree, &text, 1, &settings)
        .expect("misindented line should produce an edit");
    assert_eq!(edit.new_text, "  ", "line is pulled back to one level");
    assert_eq!(edit.range.start.character, 0);
    assert_eq!(edit.range.end.character, 6, "edit replaces the leading whitespace");
}

#[test]
fn test_no_edit_for_correct_line() {
    let source = "{\n  a: 1\n}";
    let settings = JqSettings::default();
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    let text = Rope::from_str(source);

    assert!(
        indent_edit_for_line(&tree, &text, 1, &settings).is_none(),
        "correctly indented lines produce no edit"
    );
}

#[test]
fn test_blank_lines_are_left_alone() {
    let source = "{\n\n  a: 1\n}";
    let settings = JqSettings::default();
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    let text = Rope::from_str(source);

    assert!(indent_edit_for_line(&tree, &text, 1, &settings).is_none());
}

#[test]
fn test_range_reindents_every_line() {
    let source = "{\na: 1,\nb: 2\n}";
    let settings = JqSettings::default();
    let tree = parse_code(source).expect("jq grammar should be available in tests");
    let text = Rope::from_str(source);

    let edits = indent_edits(&tree, &text, 0, 3, &settings);
    assert_eq!(edits.len(), 2, "both pair lines need fixing, braces are in place");
    assert!(edits.iter().all(|e| e.new_text == "  "));
}

#[test]
fn test_indentation_is_deterministic() {
    let source = "{\n  a: [\n    1\n  ]\n}";
    let settings = JqSettings::default();
    let first: Vec<usize> = (0..5).map(|l| indent_of(source, l, &settings)).collect();
    let second: Vec<usize> = (0..5).map(|l| indent_of(source, l, &settings)).collect();
    assert_eq!(first, second, "the same line always computes the same column");
}

#[test]
fn test_nested_brackets() {
    let source = "{\n  a: [\n    1\n  ]\n}";
    let settings = JqSettings::default();
    assert_eq!(indent_of(source, 2, &settings), 4, "array element nests one more level");
    assert_eq!(indent_of(source, 3, &settings), 2, "']' returns to the array's line");
    assert_eq!(indent_of(source, 4, &settings), 0, "'}}' returns to the object's line");
}
