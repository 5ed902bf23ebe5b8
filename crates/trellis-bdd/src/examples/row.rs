//! A single row of an example table.

use std::collections::BTreeMap;
use std::fmt;

/// Mapping from column name to cell value for one example row.
///
/// Rows display with their keys sorted, which keeps outline run names and
/// substitution messages stable:
///
/// ```
/// use trellis_bdd::ExampleRow;
///
/// let row = ExampleRow::from_pairs([("y", "1"), ("x", "2")]);
/// assert_eq!(row.to_string(), r#"{"x": "2", "y": "1"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleRow {
    values: BTreeMap<String, String>,
}

impl ExampleRow {
    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Look up the value for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Iterate over `(column, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ExampleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: {value:?}")?;
        }
        f.write_str("}")
    }
}
