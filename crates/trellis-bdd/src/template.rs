//! Placeholder substitution for scenario outlines.
//!
//! A placeholder is `<name>`: the shortest run of characters between a `<`
//! and the next `>` on the same line. Everything else, braces included, is
//! copied through untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::examples::ExampleRow;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(.+?)>").unwrap_or_else(|_| unreachable!("placeholder regex")));

/// Raised when a step names a placeholder the example row lacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{key}\" missing from outline example {example}")]
pub struct SubstitutionError {
    /// Placeholder name without angle brackets.
    pub key: String,
    /// Sorted rendering of the example row.
    pub example: String,
    /// The step as written in the outline.
    pub step: String,
}

/// Replace every `<name>` placeholder in `step` with the row's value.
///
/// # Errors
/// Returns [`SubstitutionError`] for the first placeholder whose name is not
/// a column of `example`.
///
/// # Examples
/// ```
/// use trellis_bdd::ExampleRow;
/// use trellis_bdd::template::substitute;
///
/// let row = ExampleRow::from_pairs([("x", "1"), ("y", "2")]);
/// let step = substitute("Given I add <x> and <y> to {total}", &row)
///     .unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(step, "Given I add 1 and 2 to {total}");
///
/// let err = substitute("Then <z>", &row).err().map(|e| e.to_string());
/// assert_eq!(
///     err.as_deref(),
///     Some(r#""z" missing from outline example {"x": "1", "y": "2"}"#)
/// );
/// ```
pub fn substitute(step: &str, example: &ExampleRow) -> Result<String, SubstitutionError> {
    let mut missing = None;
    let replaced = PLACEHOLDER_RE.replace_all(step, |caps: &Captures<'_>| {
        let key = caps.get(1).map_or("", |m| m.as_str());
        example.get(key).map_or_else(
            || {
                missing.get_or_insert_with(|| key.to_string());
                String::new()
            },
            str::to_string,
        )
    });
    missing.map_or_else(
        || Ok(replaced.into_owned()),
        |key| {
            Err(SubstitutionError {
                key,
                example: example.to_string(),
                step: step.to_string(),
            })
        },
    )
}

/// Substitute every step of an outline against one row.
///
/// # Errors
/// Returns the [`SubstitutionError`] of the first step that fails.
pub fn substitute_all<S: AsRef<str>>(
    steps: &[S],
    example: &ExampleRow,
) -> Result<Vec<String>, SubstitutionError> {
    steps
        .iter()
        .map(|step| substitute(step.as_ref(), example))
        .collect()
}
