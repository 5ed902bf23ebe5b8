//! Line-oriented parser for feature documents.
//!
//! The grammar is deliberately small. Everything before the first scenario
//! heading is preamble. A scenario heading opens a block that lasts until a
//! line is indented no deeper than the heading itself; inside the block lines
//! are steps, tag lines, an examples marker, or example rows. A `"""`
//! delimiter appends the lines it encloses, verbatim, to the most recent step
//! or example row.
//!
//! The parser only records structure. Example rows stay raw text and an
//! examples file is recorded as a path, so tables are resolved later by
//! [`crate::Feature`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Delimiter opening and closing a multiline block.
pub const MULTILINE_DELIMITER: &str = r#"""""#;

/// Width a tab contributes to a line's indentation.
const TAB_WIDTH: usize = 4;

static SCENARIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+Scenario(?: Outline)?:").unwrap_or_else(|_| unreachable!("scenario regex"))
});

static SCENARIO_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+Scenario Tag:(.*)$").unwrap_or_else(|_| unreachable!("tag regex"))
});

static EXAMPLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+Examples(?: file:\s*(\S.*?)\s*$|:)")
        .unwrap_or_else(|_| unreachable!("examples regex"))
});

/// Structural errors that make a whole document unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A `"""` block was still open when the input ended.
    #[error("multiline block opened on line {line} is never closed")]
    UnclosedMultilineStep {
        /// 1-based line of the opening delimiter.
        line: usize,
    },
    /// A `"""` block opened before the scenario had any step or example row.
    #[error("multiline block on line {line} has no preceding step or example row")]
    MultilineWithoutEntry {
        /// 1-based line of the opening delimiter.
        line: usize,
    },
    /// The preamble does not start with a `Feature:` line.
    #[error("feature document must start with a `Feature:` line")]
    MissingFeatureHeader,
}

/// A scenario block as it appears in the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawScenario {
    /// The heading line with surrounding whitespace removed.
    pub heading: String,
    /// 1-based line number of the heading.
    pub line: usize,
    /// Indentation of the heading, tabs counted as four columns.
    pub indent: usize,
    /// Step lines in document order.
    pub steps: Vec<String>,
    /// Raw example rows, header first.
    pub examples: Vec<String>,
    /// Path given by an `Examples file:` marker.
    pub example_file: Option<String>,
    /// Tags in the order they were declared.
    pub tags: Vec<String>,
}

impl RawScenario {
    fn new(line: &str, number: usize) -> Self {
        Self {
            heading: line.trim().to_string(),
            line: number,
            indent: indent_level(line),
            ..Self::default()
        }
    }

    /// The scenario name: the heading text after the first colon.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::parsing::parse;
    ///
    /// let doc = parse("Feature: f\n  Scenario Outline: Adding things\n")
    ///     .unwrap_or_else(|e| panic!("{e}"));
    /// let name = doc.scenarios.first().map(|s| s.name());
    /// assert_eq!(name, Some("Adding things"));
    /// ```
    #[must_use]
    pub fn name(&self) -> &str {
        self.heading
            .split_once(':')
            .map_or(self.heading.as_str(), |(_, name)| name.trim())
    }

    fn entries_mut(&mut self, target: Target) -> &mut Vec<String> {
        match target {
            Target::Steps => &mut self.steps,
            Target::Examples => &mut self.examples,
        }
    }
}

/// Preamble lines and scenario blocks of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Lines before the first scenario, and lines between scenarios that are
    /// not part of any block, with surrounding whitespace removed.
    pub preamble: Vec<String>,
    /// Scenario blocks in document order.
    pub scenarios: Vec<RawScenario>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Steps,
    Examples,
}

/// Measure the indentation of `line`, counting a tab as four columns.
///
/// # Examples
/// ```
/// use trellis_bdd::parsing::indent_level;
///
/// assert_eq!(indent_level("    Given a step"), 4);
/// assert_eq!(indent_level("\t  Given a step"), 6);
/// assert_eq!(indent_level("Feature: none"), 0);
/// ```
#[must_use]
pub fn indent_level(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn is_delimiter(line: &str) -> bool {
    line.trim() == MULTILINE_DELIMITER
}

fn tag_names(rest: &str) -> impl Iterator<Item = String> + '_ {
    rest.split(',')
        .map(|tag| tag.split_whitespace().collect::<String>())
        .filter(|tag| !tag.is_empty())
}

/// Parse a feature document into its preamble and scenario blocks.
///
/// Parsing is deterministic and never looks at the filesystem.
///
/// # Errors
/// Returns [`ParseError::UnclosedMultilineStep`] when a `"""` block is left
/// open and [`ParseError::MultilineWithoutEntry`] when one opens before the
/// scenario has anything to append to.
///
/// # Examples
/// ```
/// use trellis_bdd::parsing::parse;
///
/// let text = "Feature: Arithmetic\n    Basic sums\n\n    Scenario: Add\n        Given I add 1 and 1\n        Then the result should be 2\n";
/// let doc = parse(text).unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(doc.preamble, ["Feature: Arithmetic", "Basic sums"]);
/// let steps = doc.scenarios.first().map(|s| s.steps.clone()).unwrap_or_default();
/// assert_eq!(steps, ["Given I add 1 and 1", "Then the result should be 2"]);
/// ```
pub fn parse(text: &str) -> Result<ParsedDocument, ParseError> {
    let mut document = ParsedDocument::default();
    let mut in_scenario = false;
    let mut target = Target::Steps;
    let mut open_block: Option<usize> = None;

    for (index, raw) in text.split('\n').enumerate() {
        let number = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if open_block.is_some() {
            if is_delimiter(line) {
                open_block = None;
            } else if let Some(entry) = document
                .scenarios
                .last_mut()
                .and_then(|scenario| scenario.entries_mut(target).last_mut())
            {
                entry.push('\n');
                entry.push_str(line);
            }
            continue;
        }

        if is_skippable(line) {
            continue;
        }

        if let Some(scenario) = document.scenarios.last_mut().filter(|_| in_scenario) {
            if is_delimiter(line) {
                if scenario.entries_mut(target).is_empty() {
                    return Err(ParseError::MultilineWithoutEntry { line: number });
                }
                open_block = Some(number);
                continue;
            }
            if indent_level(line) <= scenario.indent {
                in_scenario = false;
            } else if let Some(caps) = EXAMPLES_RE.captures(line) {
                target = Target::Examples;
                if let Some(path) = caps.get(1) {
                    scenario.example_file = Some(path.as_str().to_string());
                }
                continue;
            } else if let Some(caps) = SCENARIO_TAG_RE.captures(line) {
                let rest = caps.get(1).map_or("", |m| m.as_str());
                scenario.tags.extend(tag_names(rest));
                continue;
            } else {
                scenario.entries_mut(target).push(line.trim().to_string());
                continue;
            }
        }

        if SCENARIO_RE.is_match(line) {
            document.scenarios.push(RawScenario::new(line, number));
            in_scenario = true;
            target = Target::Steps;
        } else {
            document.preamble.push(line.trim().to_string());
        }
    }

    open_block.map_or(Ok(document), |line| {
        Err(ParseError::UnclosedMultilineStep { line })
    })
}

#[cfg(test)]
mod tests;
