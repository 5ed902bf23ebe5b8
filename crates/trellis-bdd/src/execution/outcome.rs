//! Terminal results of scenario runs.

use std::fmt;

/// Where a run stopped and why.
///
/// Built when a step or hook fails, handed to `after` failure and error
/// hooks, and carried by the [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureContext {
    /// Index of the scenario; `None` for feature hooks.
    pub scenario_index: Option<usize>,
    /// Scenario name at the time of failure, outline suffix included.
    pub scenario_name: String,
    /// Steps that completed before the failure, in order.
    pub completed_steps: Vec<String>,
    /// The step that failed, if a step was running.
    pub failed_step: Option<String>,
    /// Description of the failure.
    pub message: String,
}

impl FailureContext {
    /// Render a diagnosis block.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::FailureContext;
    ///
    /// let failure = FailureContext {
    ///     scenario_index: Some(0),
    ///     scenario_name: "Adds".into(),
    ///     completed_steps: vec!["Given I add 1 and 1".into()],
    ///     failed_step: Some("Then the result should be 3".into()),
    ///     message: "expected 3, got 2".into(),
    /// };
    /// assert_eq!(
    ///     failure.render(),
    ///     "Adds\n    Given I add 1 and 1\n    Then the result should be 3\nexpected 3, got 2",
    /// );
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![self.scenario_name.trim().to_string()];
        lines.extend(
            self.completed_steps
                .iter()
                .chain(&self.failed_step)
                .map(|step| format!("    {}", step.trim())),
        );
        lines.push(self.message.clone());
        lines.join("\n")
    }
}

impl fmt::Display for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Terminal classification of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every step and hook completed.
    Success,
    /// A step reported an assertion failure.
    Failure(FailureContext),
    /// A step, hook or lookup failed unexpectedly.
    Error(FailureContext),
    /// The run was skipped on purpose.
    Skipped(String),
}

impl Outcome {
    /// Lowercase label of the outcome.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure(_) => "failure",
            Self::Error(_) => "error",
            Self::Skipped(_) => "skipped",
        }
    }

    /// Diagnosis attached to failures and errors.
    #[must_use]
    pub fn context(&self) -> Option<&FailureContext> {
        match self {
            Self::Failure(context) | Self::Error(context) => Some(context),
            Self::Success | Self::Skipped(_) => None,
        }
    }
}

/// Outcome counts for one feature run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Runs that succeeded.
    pub successes: usize,
    /// Runs that failed an assertion.
    pub failures: usize,
    /// Runs that errored.
    pub errors: usize,
    /// Runs that were skipped.
    pub skips: usize,
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: &Outcome) {
        let counter = match outcome {
            Outcome::Success => &mut self.successes,
            Outcome::Failure(_) => &mut self.failures,
            Outcome::Error(_) => &mut self.errors,
            Outcome::Skipped(_) => &mut self.skips,
        };
        *counter += 1;
    }

    /// Total number of outcomes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.successes + self.failures + self.errors + self.skips
    }

    /// Whether nothing failed or errored.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} run(s): {} passed, {} failed, {} errored, {} skipped",
            self.total(),
            self.successes,
            self.failures,
            self.errors,
            self.skips
        )
    }
}
