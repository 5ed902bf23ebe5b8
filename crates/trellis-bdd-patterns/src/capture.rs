//! Regex capture helpers shared by the runtime and tooling crates.

use std::collections::BTreeMap;

use regex::Regex;

/// How a compiled step pattern exposes its capture groups.
///
/// A pattern either uses only unnamed groups, only named groups, or both. The
/// last shape cannot be mapped onto handler arguments and is rejected when a
/// step matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Every group is unnamed (or there are no groups).
    Positional,
    /// Every group carries a name.
    Named,
    /// Named and unnamed groups appear together.
    Mixed,
}

impl CaptureKind {
    /// Classify the user-defined capture groups of `re`.
    ///
    /// # Examples
    /// ```
    /// # use regex::Regex;
    /// # use trellis_bdd_patterns::CaptureKind;
    /// let named = Regex::new(r"(?P<a>\d+) and (?P<b>\d+)")
    ///     .unwrap_or_else(|e| panic!("{e}"));
    /// assert_eq!(CaptureKind::of(&named), CaptureKind::Named);
    /// ```
    #[must_use]
    pub fn of(re: &Regex) -> Self {
        let mut named = 0usize;
        let mut total = 0usize;
        for name in re.capture_names().skip(1) {
            total += 1;
            if name.is_some() {
                named += 1;
            }
        }
        if named == 0 {
            Self::Positional
        } else if named == total {
            Self::Named
        } else {
            Self::Mixed
        }
    }
}

/// Extract the unnamed capture groups when `text` matches `re`, returning
/// `None` otherwise.
///
/// Group 0 is ignored. Groups that do not participate in the match yield empty
/// strings so positions stay aligned with the pattern.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use trellis_bdd_patterns::extract_captured_values;
/// let regex = Regex::new(r"^(\d+)-(\w+)$").unwrap_or_else(|e| panic!("{e}"));
/// let values = extract_captured_values(&regex, "42-answer");
/// assert_eq!(values, Some(vec!["42".to_string(), "answer".to_string()]));
/// assert!(extract_captured_values(&regex, "nope").is_none());
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    let caps = re.captures(text)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|capture| capture.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect(),
    )
}

/// Extract the named capture groups when `text` matches `re`, returning
/// `None` otherwise.
///
/// Unnamed groups are ignored. Named groups that do not participate in the
/// match map to empty strings.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use trellis_bdd_patterns::extract_named_values;
/// let regex = Regex::new(r"^(?P<count>\d+) (?P<unit>\w+)$").unwrap_or_else(|e| panic!("{e}"));
/// let Some(values) = extract_named_values(&regex, "3 apples") else {
///     panic!("pattern should match");
/// };
/// assert_eq!(values.get("count").map(String::as_str), Some("3"));
/// assert_eq!(values.get("unit").map(String::as_str), Some("apples"));
/// ```
#[must_use]
pub fn extract_named_values(re: &Regex, text: &str) -> Option<BTreeMap<String, String>> {
    let caps = re.captures(text)?;
    Some(
        re.capture_names()
            .flatten()
            .map(|name| {
                let value = caps
                    .name(name)
                    .map_or_else(String::new, |m| m.as_str().to_string());
                (name.to_string(), value)
            })
            .collect(),
    )
}
