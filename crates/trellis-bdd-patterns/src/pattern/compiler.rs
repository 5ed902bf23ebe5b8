//! Convert step patterns into regular-expression sources.

use crate::errors::PatternError;

/// Regex fragment prepended to every step pattern.
///
/// It allows leading indentation, requires one of the step keywords, and
/// demands at least one whitespace character before the pattern proper.
pub const KEYWORD_LEAD_IN: &str = r"^\s*(?:Given|And|When|Then|But)\s+";

/// How a step pattern treats lines following the first line of a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Multiline {
    /// The step is a single line.
    #[default]
    None,
    /// The remaining lines are captured by an unnamed trailing group.
    Anonymous,
    /// The remaining lines are captured by a trailing group with this name.
    Named(String),
}

impl Multiline {
    /// Whether the step captures trailing lines.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<bool> for Multiline {
    fn from(value: bool) -> Self {
        if value { Self::Anonymous } else { Self::None }
    }
}

impl From<&str> for Multiline {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Build the regular-expression source for a step pattern.
///
/// # Errors
/// Returns [`PatternError::EmptyMultilineName`] when a named multiline
/// capture has an empty name.
///
/// # Examples
/// ```
/// use trellis_bdd_patterns::{Multiline, build_regex_source};
///
/// let source = build_regex_source("a poem", &Multiline::Named("text".into()))
///     .unwrap_or_else(|e| panic!("pattern should build: {e}"));
/// assert_eq!(
///     source,
///     r"^\s*(?:Given|And|When|Then|But)\s+a poem\n(?P<text>(?s:.+))"
/// );
/// ```
pub fn build_regex_source(pattern: &str, multiline: &Multiline) -> Result<String, PatternError> {
    let mut source = String::with_capacity(KEYWORD_LEAD_IN.len() + pattern.len() + 24);
    source.push_str(KEYWORD_LEAD_IN);
    source.push_str(pattern);
    match multiline {
        Multiline::None => {}
        Multiline::Anonymous => source.push_str(r"\n((?s:.+))"),
        Multiline::Named(name) if name.trim().is_empty() => {
            return Err(PatternError::EmptyMultilineName {
                pattern: pattern.to_string(),
            });
        }
        Multiline::Named(name) => {
            source.push_str(r"\n(?P<");
            source.push_str(name);
            source.push_str(">(?s:.+))");
        }
    }
    Ok(source)
}
