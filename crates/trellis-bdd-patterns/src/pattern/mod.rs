//! Step-pattern compilation helpers.

mod compiler;

use crate::errors::PatternError;
use regex::{Regex, RegexBuilder};

pub use compiler::{KEYWORD_LEAD_IN, Multiline, build_regex_source};

/// Build and compile a regular expression from a step pattern.
///
/// The compiled expression is case-insensitive and anchored at the start of
/// the step text only, so a pattern matches any step line that begins with a
/// keyword followed by text matching the pattern.
///
/// # Errors
/// Returns [`PatternError`] when the multiline capture name is empty or the
/// generated regex source cannot be compiled.
///
/// # Examples
/// ```
/// use trellis_bdd_patterns::{Multiline, compile_step_pattern};
///
/// let regex = compile_step_pattern(r"I add (\d+) and (\d+)", &Multiline::None)
///     .unwrap_or_else(|e| panic!("pattern should compile: {e}"));
/// assert!(regex.is_match("    given I add 1 and 1"));
/// assert!(!regex.is_match("I add 1 and 1"));
/// ```
pub fn compile_step_pattern(pattern: &str, multiline: &Multiline) -> Result<Regex, PatternError> {
    let source = build_regex_source(pattern, multiline)?;
    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str, multiline: &Multiline) -> Regex {
        compile_step_pattern(pattern, multiline)
            .unwrap_or_else(|e| panic!("pattern {pattern:?} should compile: {e}"))
    }

    #[test]
    fn accepts_every_keyword_case_insensitively() {
        let regex = compile("the result should be (\\d+)", &Multiline::None);
        for line in [
            "Given the result should be 2",
            "AND the result should be 2",
            "when the result should be 2",
            "Then the result should be 2",
            "but the result should be 2",
        ] {
            assert!(regex.is_match(line), "{line} should match");
        }
    }

    #[test]
    fn requires_whitespace_after_keyword() {
        let regex = compile("thing", &Multiline::None);
        assert!(!regex.is_match("Giventhing"));
    }

    #[test]
    fn matches_prefix_only() {
        let regex = compile("I add", &Multiline::None);
        assert!(regex.is_match("Given I add 1 and 1"));
    }

    #[test]
    fn multiline_tail_spans_following_lines() {
        let regex = compile("a document", &Multiline::Named("body".into()));
        let text = "Given a document\n    line one\n\n    line two";
        let Some(caps) = regex.captures(text) else {
            panic!("multiline step should match");
        };
        assert_eq!(
            caps.name("body").map(|m| m.as_str()),
            Some("    line one\n\n    line two")
        );
    }

    #[test]
    fn multiline_tail_requires_a_body() {
        let regex = compile("a document", &Multiline::Anonymous);
        assert!(!regex.is_match("Given a document"));
    }

    #[test]
    fn surfaces_regex_compilation_errors() {
        let Err(err) = compile_step_pattern("broken (", &Multiline::None) else {
            panic!("expected regex error");
        };
        assert!(matches!(err, PatternError::InvalidRegex { ref pattern, .. } if pattern == "broken ("));
    }
}
