//! Error types shared by the pattern compilation modules.

use thiserror::Error;

/// Errors surfaced while converting step patterns into regular expressions.
///
/// # Examples
/// ```
/// use trellis_bdd_patterns::{Multiline, PatternError, compile_step_pattern};
///
/// let Err(err) = compile_step_pattern("I have (unclosed", &Multiline::None) else {
///     panic!("unbalanced group should be rejected");
/// };
/// assert!(matches!(err, PatternError::InvalidRegex { .. }));
/// assert!(err.to_string().contains("I have (unclosed"));
/// ```
#[derive(Debug, Error)]
pub enum PatternError {
    /// The generated regular expression failed to compile.
    #[error("invalid step pattern `{pattern}`: {source}")]
    InvalidRegex {
        /// Pattern text as supplied at registration.
        pattern: String,
        /// Underlying regex compilation failure.
        #[source]
        source: regex::Error,
    },
    /// A named multiline capture was requested with an empty group name.
    #[error("multiline capture name for step pattern `{pattern}` must not be empty")]
    EmptyMultilineName {
        /// Pattern text as supplied at registration.
        pattern: String,
    },
}
