//! Arguments captured from a step line.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::StepError;

/// Values captured by the pattern that matched a step.
///
/// Patterns with unnamed groups yield positional arguments; patterns whose
/// groups are all named yield named arguments. Groups that did not take part
/// in the match are empty strings.
///
/// # Examples
/// ```
/// use trellis_bdd::StepArguments;
///
/// let args = StepArguments::Positional(vec!["1".into(), "41".into()]);
/// let first: u32 = args.parse(0).unwrap_or_default();
/// let second: u32 = args.parse(1).unwrap_or_default();
/// let total = first + second;
/// assert_eq!(total, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArguments {
    /// Unnamed captures in group order.
    Positional(Vec<String>),
    /// Named captures keyed by group name.
    Named(BTreeMap<String, String>),
}

impl StepArguments {
    /// Number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(values) => values.len(),
        }
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional value at `index`. Always `None` for named arguments.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            Self::Positional(values) => values.get(index).map(String::as_str),
            Self::Named(_) => None,
        }
    }

    /// Named value called `name`. Always `None` for positional arguments.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        match self {
            Self::Positional(_) => None,
            Self::Named(values) => values.get(name).map(String::as_str),
        }
    }

    /// Parse the positional value at `index`.
    ///
    /// # Errors
    /// Returns [`StepError::Error`] when the value is absent or does not
    /// parse as `T`.
    pub fn parse<T>(&self, index: usize) -> Result<T, StepError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self
            .get(index)
            .ok_or_else(|| StepError::error(format!("step has no argument at position {index}")))?;
        parse_value(raw, &index.to_string())
    }

    /// Parse the named value called `name`.
    ///
    /// # Errors
    /// Returns [`StepError::Error`] when the value is absent or does not
    /// parse as `T`.
    pub fn parse_named<T>(&self, name: &str) -> Result<T, StepError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self
            .named(name)
            .ok_or_else(|| StepError::error(format!("step has no argument named '{name}'")))?;
        parse_value(raw, name)
    }
}

fn parse_value<T>(raw: &str, label: &str) -> Result<T, StepError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|err| {
        StepError::error(format!(
            "failed to parse argument '{label}' from value '{raw}': {err}"
        ))
    })
}
