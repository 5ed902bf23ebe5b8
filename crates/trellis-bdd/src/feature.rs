//! Loaded feature documents.
//!
//! [`Feature`] is the immutable, fully resolved form of a document: the
//! header is validated, tags are collected into sets, and every example
//! source, inline or external, has been turned into an [`ExampleTable`].

use std::collections::BTreeSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use log::{debug, warn};
use thiserror::Error;

use crate::examples::{ExampleTable, ExampleTableError};
use crate::parsing::{self, ParseError, RawScenario};
use crate::registry::StepRegistry;
use crate::template;

const FEATURE_KEYWORD: &str = "Feature:";

/// Errors that make a feature document unusable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeatureError {
    /// The document could not be read.
    #[error("failed to read feature {path}: {source}")]
    Read {
        /// Path of the feature document.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The document is structurally invalid.
    #[error("failed to parse feature {path}: {source}")]
    Parse {
        /// Path of the feature document.
        path: Utf8PathBuf,
        /// Underlying parse failure.
        #[source]
        source: ParseError,
    },
    /// An examples file referenced by a scenario could not be read.
    #[error("failed to read examples file {file} for scenario '{scenario}' in {path}: {source}")]
    ExamplesFile {
        /// Path of the feature document.
        path: Utf8PathBuf,
        /// Scenario referencing the file.
        scenario: String,
        /// Resolved path of the examples file.
        file: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A scenario's example rows do not form a valid table.
    #[error("invalid examples for scenario '{scenario}' in {path}: {source}")]
    Examples {
        /// Path of the feature document.
        path: Utf8PathBuf,
        /// Scenario owning the table.
        scenario: String,
        /// Underlying table failure.
        #[source]
        source: ExampleTableError,
    },
}

/// One scenario of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    index: usize,
    name: String,
    line: usize,
    tags: BTreeSet<String>,
    steps: Vec<String>,
    examples: Option<ExampleTable>,
}

impl Scenario {
    /// Zero-based position within the feature.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name as written after `Scenario:` or `Scenario Outline:`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based line of the scenario heading.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Tags declared with `Scenario Tag:` lines.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Step lines in document order.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Example table for an outline.
    #[must_use]
    pub fn examples(&self) -> Option<&ExampleTable> {
        self.examples.as_ref()
    }

    /// Whether the scenario is driven by an example table.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        self.examples.is_some()
    }
}

/// A step line no definition matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedStep {
    /// Index of the scenario containing the step.
    pub scenario_index: usize,
    /// Name of the scenario containing the step.
    pub scenario_name: String,
    /// The step, substituted with the first example row for outlines.
    pub step: String,
    /// Why the step could not be checked, when substitution failed.
    pub reason: Option<String>,
}

/// A parsed and resolved feature document.
///
/// # Examples
/// ```
/// use trellis_bdd::Feature;
///
/// let text = "Feature: Arithmetic\n  Simple sums\n\n  Scenario: Add\n    Given I add 1 and 1\n";
/// let feature = Feature::from_text("features/math.feature", text)
///     .unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(feature.name(), "Arithmetic");
/// assert_eq!(feature.id(), "features:math.feature");
/// assert_eq!(feature.scenarios().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    path: Utf8PathBuf,
    module: String,
    name: String,
    description: Vec<String>,
    scenarios: Vec<Scenario>,
}

impl Feature {
    /// Read and resolve the feature document at `path`.
    ///
    /// # Errors
    /// Returns [`FeatureError`] when the document or one of its examples
    /// files cannot be read, or when either is malformed.
    pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let text = read_utf8(path).map_err(|source| FeatureError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_text(path, &text)
    }

    /// Resolve a feature from in-memory text.
    ///
    /// `path` names the document in ids and diagnostics, and examples files
    /// are looked up relative to its directory.
    ///
    /// # Errors
    /// Returns [`FeatureError`] when the text or one of its examples files is
    /// malformed, or when an examples file cannot be read.
    pub fn from_text(path: impl AsRef<Utf8Path>, text: &str) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let parse_error = |source| FeatureError::Parse {
            path: path.to_owned(),
            source,
        };
        let document = parsing::parse(text).map_err(parse_error)?;
        let mut preamble = document.preamble.into_iter();
        let name = preamble
            .next()
            .and_then(|line| line.strip_prefix(FEATURE_KEYWORD).map(|n| n.trim().to_string()))
            .ok_or_else(|| parse_error(ParseError::MissingFeatureHeader))?;
        let scenarios = document
            .scenarios
            .into_iter()
            .enumerate()
            .map(|(index, raw)| resolve_scenario(path, index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("loaded feature '{name}' from {path} with {} scenario(s)", scenarios.len());
        Ok(Self {
            path: path.to_owned(),
            module: default_module(path),
            name,
            description: preamble.collect(),
            scenarios,
        })
    }

    /// Replace the module path used in ids.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Path of the document.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Module path used in ids. Defaults to the document's directory name.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Name from the `Feature:` line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Advisory lines following the `Feature:` line.
    #[must_use]
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// First advisory line, if any.
    #[must_use]
    pub fn short_description(&self) -> Option<&str> {
        self.description.first().map(String::as_str)
    }

    /// Scenarios in document order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// `<module>:<file name>` address of the whole feature.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}:{}", self.module, self.path.file_name().unwrap_or(self.path.as_str()))
    }

    /// Steps that no definition in `registry` matches.
    ///
    /// Outlines are checked against their first example row; a step whose
    /// placeholders that row cannot fill is reported with the substitution
    /// message as its reason.
    #[must_use]
    pub fn unmatched_steps<W>(&self, registry: &StepRegistry<W>) -> Vec<UnmatchedStep> {
        let mut unmatched = Vec::new();
        for scenario in &self.scenarios {
            let row = match scenario.examples().map(|table| table.rows().first()) {
                Some(None) => continue,
                row => row.flatten(),
            };
            for step in scenario.steps() {
                let report = |step: String, reason| UnmatchedStep {
                    scenario_index: scenario.index,
                    scenario_name: scenario.name.clone(),
                    step,
                    reason,
                };
                let Some(row) = row else {
                    if !registry.matches(step) {
                        unmatched.push(report(step.clone(), None));
                    }
                    continue;
                };
                match template::substitute(step, row) {
                    Ok(concrete) if registry.matches(&concrete) => {}
                    Ok(concrete) => unmatched.push(report(concrete, None)),
                    Err(err) => unmatched.push(report(step.clone(), Some(err.to_string()))),
                }
            }
        }
        unmatched
    }
}

fn resolve_scenario(path: &Utf8Path, index: usize, raw: RawScenario) -> Result<Scenario, FeatureError> {
    let name = raw.name().to_string();
    let examples = resolve_examples(path, &name, &raw)?;
    Ok(Scenario {
        index,
        line: raw.line,
        tags: raw.tags.into_iter().collect(),
        steps: raw.steps,
        examples,
        name,
    })
}

fn resolve_examples(
    path: &Utf8Path,
    scenario: &str,
    raw: &RawScenario,
) -> Result<Option<ExampleTable>, FeatureError> {
    let table_error = |source| FeatureError::Examples {
        path: path.to_owned(),
        scenario: scenario.to_string(),
        source,
    };
    if let Some(relative) = &raw.example_file {
        if !raw.examples.is_empty() {
            warn!("scenario '{scenario}' in {path} uses an examples file; inline rows are ignored");
        }
        let file = parent_dir(path).join(relative);
        let text = read_utf8(&file).map_err(|source| FeatureError::ExamplesFile {
            path: path.to_owned(),
            scenario: scenario.to_string(),
            file: file.clone(),
            source,
        })?;
        return ExampleTable::from_delimited(&text).map(Some).map_err(table_error);
    }
    if raw.examples.is_empty() {
        return Ok(None);
    }
    ExampleTable::from_lines(&raw.examples).map(Some).map_err(table_error)
}

fn parent_dir(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

fn default_module(path: &Utf8Path) -> String {
    parent_dir(path)
        .file_name()
        .or_else(|| path.file_stem())
        .unwrap_or_default()
        .to_string()
}

fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let dir = Dir::open_ambient_dir(parent_dir(path), ambient_authority())?;
    dir.read_to_string(file_name)
}
