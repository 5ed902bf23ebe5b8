//! Unit tests for example tables.

use rstest::rstest;

use super::*;

fn table(lines: &[&str]) -> ExampleTable {
    ExampleTable::from_lines(lines).unwrap_or_else(|e| panic!("table should build: {e}"))
}

#[test]
fn builds_rows_keyed_by_header() {
    let table = table(&["| x | y | z |", "| 1 | 1 | 2 |", "| 2 | 3 | 5 |"]);
    assert_eq!(table.header(), ["x", "y", "z"]);
    let sums: Vec<_> = table.rows().iter().filter_map(|row| row.get("z")).collect();
    assert_eq!(sums, ["2", "5"]);
}

#[test]
fn outer_pipes_are_optional() {
    let table = table(&["x | y", "1 | 2 |"]);
    assert_eq!(table.rows().first().and_then(|row| row.get("y")), Some("2"));
}

#[test]
fn header_only_table_has_no_rows() {
    assert!(table(&["| x |"]).is_empty());
}

#[rstest]
#[case::missing_header(&[], ExampleTableError::MissingHeader)]
#[case::blank_column(&["| x |  | z |"], ExampleTableError::EmptyColumn { position: 2 })]
#[case::duplicate_column(
    &["| x | y | x |"],
    ExampleTableError::DuplicateColumn { column: "x".into() }
)]
#[case::ragged_row(
    &["| x | y |", "| 1 | 2 |", "| 3 |"],
    ExampleTableError::RaggedRow { row_number: 3, expected: 2, actual: 1 }
)]
fn rejects_malformed_tables(#[case] lines: &[&str], #[case] expected: ExampleTableError) {
    assert_eq!(ExampleTable::from_lines(lines), Err(expected));
}

#[test]
fn delimited_text_matches_inline_table() {
    let inline = table(&["| x | y |", "| 1 | two words |"]);
    let external = ExampleTable::from_delimited("x,y\n\n1,\"two words\"\n")
        .unwrap_or_else(|e| panic!("delimited table should build: {e}"));
    assert_eq!(inline, external);
}

#[test]
fn delimited_errors_carry_line_numbers() {
    let Err(err) = ExampleTable::from_delimited("x,y\n1,\"open\n") else {
        panic!("unterminated quote should be rejected");
    };
    assert!(matches!(
        err,
        ExampleTableError::Delimited { line_number: 2, .. }
    ));
}

#[test]
fn rows_render_with_sorted_keys() {
    let table = table(&["| z | x |", "| 2 | 1 |"]);
    let rendered = table.rows().first().map(ToString::to_string);
    assert_eq!(rendered.as_deref(), Some(r#"{"x": "1", "z": "2"}"#));
}
