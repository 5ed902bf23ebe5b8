//! Step keyword type and parsing utilities.
//!
//! Every step line in a feature document starts with one of the keywords
//! modelled here. Matching is case-insensitive, mirroring the lead-in that
//! the pattern compiler prepends to each step definition.

use std::fmt;
use std::str::FromStr;

/// Keyword that opens a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions for a scenario.
    Given,
    /// Perform an action when testing behaviour.
    When,
    /// Assert the expected outcome of a scenario.
    Then,
    /// Additional conditions that share context with the previous step.
    And,
    /// Negative or contrasting conditions.
    But,
}

impl StepKeyword {
    /// Every keyword, in the order used by the compiled lead-in.
    pub const ALL: [Self; 5] = [Self::Given, Self::And, Self::When, Self::Then, Self::But];

    /// Return the keyword as a string slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_bdd_patterns::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::And.as_str(), "And");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from a string fails.
///
/// Contains the unrecognised keyword text for diagnostic purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepKeywordParseError(pub String);

impl fmt::Display for StepKeywordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid step keyword: {}", self.0)
    }
}

impl std::error::Error for StepKeywordParseError {}

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|keyword| trimmed.eq_ignore_ascii_case(keyword.as_str()))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_string()))
    }
}

impl TryFrom<&str> for StepKeyword {
    type Error = StepKeywordParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Split a step line into its keyword and the remaining text.
///
/// Leading whitespace is ignored. The keyword must be followed by at least
/// one whitespace character, exactly as the compiled step lead-in requires.
/// Returns `None` when the line does not open with a recognised keyword.
///
/// # Examples
///
/// ```
/// use trellis_bdd_patterns::{StepKeyword, split_keyword};
///
/// assert_eq!(
///     split_keyword("    given I add 1 and 1"),
///     Some((StepKeyword::Given, "I add 1 and 1"))
/// );
/// assert_eq!(split_keyword("Givenness is not a keyword"), None);
/// ```
#[must_use]
pub fn split_keyword(line: &str) -> Option<(StepKeyword, &str)> {
    let trimmed = line.trim_start();
    let end = trimmed.find(char::is_whitespace)?;
    let (word, rest) = trimmed.split_at(end);
    let keyword = word.parse().ok()?;
    let text = rest.trim_start();
    if text.is_empty() {
        return None;
    }
    Some((keyword, text))
}
