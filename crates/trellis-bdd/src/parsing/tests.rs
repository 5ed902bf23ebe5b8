//! Unit tests for the feature document parser.

use rstest::rstest;

use super::*;

const ARITHMETIC: &str = "\
Feature: Arithmetic
    In order to avoid silly mistakes
    As a math idiot

    # A comment between blocks
    Scenario: Addition
        Given I add 1 and 1
        Then the result should be 2

    Scenario Outline: Outlined addition
        Scenario Tag: math, fast
        Given I add <x> and <y>
        Then the result should be <z>
        Examples:
            | x | y | z |
            | 1 | 1 | 2 |
            | 2 | 3 | 5 |
";

fn parse_ok(text: &str) -> ParsedDocument {
    parse(text).unwrap_or_else(|e| panic!("document should parse: {e}"))
}

fn only_scenario(doc: &ParsedDocument) -> &RawScenario {
    match doc.scenarios.as_slice() {
        [scenario] => scenario,
        other => panic!("expected one scenario, found {}", other.len()),
    }
}

#[test]
fn splits_preamble_and_scenarios() {
    let doc = parse_ok(ARITHMETIC);
    assert_eq!(
        doc.preamble,
        [
            "Feature: Arithmetic",
            "In order to avoid silly mistakes",
            "As a math idiot",
        ]
    );
    let names: Vec<_> = doc.scenarios.iter().map(RawScenario::name).collect();
    assert_eq!(names, ["Addition", "Outlined addition"]);
}

#[test]
fn records_steps_tags_and_examples() {
    let doc = parse_ok(ARITHMETIC);
    let Some(outline) = doc.scenarios.get(1) else {
        panic!("outline should be parsed");
    };
    assert_eq!(
        outline.steps,
        ["Given I add <x> and <y>", "Then the result should be <z>"]
    );
    assert_eq!(outline.tags, ["math", "fast"]);
    assert_eq!(
        outline.examples,
        ["| x | y | z |", "| 1 | 1 | 2 |", "| 2 | 3 | 5 |"]
    );
    assert_eq!(outline.line, 10);
    assert_eq!(outline.indent, 4);
}

#[test]
fn parsing_is_deterministic() {
    assert_eq!(parse_ok(ARITHMETIC), parse_ok(ARITHMETIC));
}

#[test]
fn scenario_without_steps_is_legal() {
    let doc = parse_ok("Feature: f\n  Scenario: Empty\n  Scenario: Next\n    Given a step\n");
    let steps: Vec<_> = doc.scenarios.iter().map(|s| s.steps.len()).collect();
    assert_eq!(steps, [0, 1]);
}

#[test]
fn dedented_line_closes_scenario() {
    let doc = parse_ok("Feature: f\n  Scenario: One\n    Given a step\n  trailing advisory text\n");
    assert_eq!(only_scenario(&doc).steps, ["Given a step"]);
    assert_eq!(doc.preamble, ["Feature: f", "trailing advisory text"]);
}

#[test]
fn heading_at_column_zero_is_preamble() {
    let doc = parse_ok("Feature: f\nScenario: not indented\n");
    assert!(doc.scenarios.is_empty());
}

#[test]
fn multiline_block_is_appended_verbatim() {
    let text = "Feature: f\n  Scenario: Docs\n    Given a document\n      \"\"\"\n      first\n\n      # not a comment\n      \"\"\"\n    Then it is stored\n";
    let doc = parse_ok(text);
    assert_eq!(
        only_scenario(&doc).steps,
        [
            "Given a document\n      first\n\n      # not a comment",
            "Then it is stored",
        ]
    );
}

#[test]
fn multiline_block_attaches_to_example_rows() {
    let text = "Feature: f\n  Scenario: S\n    Given <x>\n    Examples:\n      | x |\n      \"\"\"\n      more\n      \"\"\"\n";
    let doc = parse_ok(text);
    assert_eq!(only_scenario(&doc).examples, ["| x |\n      more"]);
}

#[test]
fn unclosed_multiline_block_is_fatal() {
    let text = "Feature: f\n  Scenario: S\n    Given a document\n    \"\"\"\n    body\n";
    assert_eq!(
        parse(text),
        Err(ParseError::UnclosedMultilineStep { line: 4 })
    );
}

#[test]
fn multiline_block_needs_an_entry() {
    let text = "Feature: f\n  Scenario: S\n    \"\"\"\n    body\n    \"\"\"\n";
    assert_eq!(
        parse(text),
        Err(ParseError::MultilineWithoutEntry { line: 3 })
    );
}

#[test]
fn examples_file_marker_records_path() {
    let text = "Feature: f\n  Scenario Outline: S\n    Given <x>\n    Examples file: data/rows.csv\n";
    let doc = parse_ok(text);
    let scenario = only_scenario(&doc);
    assert_eq!(scenario.example_file.as_deref(), Some("data/rows.csv"));
    assert!(scenario.examples.is_empty());
}

#[test]
fn tag_lines_accumulate_and_drop_spaces() {
    let text = "Feature: f\n  Scenario: S\n    Scenario Tag: slow, needs network\n    Scenario Tag:smoke\n    Given a step\n";
    let doc = parse_ok(text);
    assert_eq!(only_scenario(&doc).tags, ["slow", "needsnetwork", "smoke"]);
}

#[test]
fn crlf_line_endings_are_accepted() {
    let doc = parse_ok("Feature: f\r\n  Scenario: S\r\n    Given a step\r\n");
    assert_eq!(only_scenario(&doc).steps, ["Given a step"]);
}

#[rstest]
#[case::spaces("    x", 4)]
#[case::tab("\tx", 4)]
#[case::mixed(" \t x", 6)]
#[case::none("x", 0)]
fn measures_indentation(#[case] line: &str, #[case] expected: usize) {
    assert_eq!(indent_level(line), expected);
}

#[rstest]
#[case::plain("Scenario: Adding", "Adding")]
#[case::outline("Scenario Outline: Adding <x>", "Adding <x>")]
#[case::colon_in_name("Scenario: Ratio 1:2", "Ratio 1:2")]
fn extracts_scenario_names(#[case] heading: &str, #[case] expected: &str) {
    let scenario = RawScenario::new(heading, 1);
    assert_eq!(scenario.name(), expected);
}
