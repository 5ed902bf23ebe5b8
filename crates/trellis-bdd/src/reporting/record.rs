//! Stored scenario outcomes.

use super::RunInfo;
use crate::execution::{FailureContext, Outcome};

/// Status of a recorded run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every step and hook completed.
    Passed,
    /// A step reported an assertion failure.
    Failed(FailureContext),
    /// A step, hook or lookup failed unexpectedly.
    Errored(FailureContext),
    /// The run was skipped, with the reason.
    Skipped(String),
}

impl ScenarioStatus {
    /// Lowercase label for the status.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::reporting::ScenarioStatus;
    ///
    /// assert_eq!(ScenarioStatus::Passed.label(), "passed");
    /// assert_eq!(ScenarioStatus::Skipped("later".into()).label(), "skipped");
    /// ```
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Errored(_) => "errored",
            Self::Skipped(_) => "skipped",
        }
    }

    /// Diagnosis attached to failures and errors.
    #[must_use]
    pub fn context(&self) -> Option<&FailureContext> {
        match self {
            Self::Failed(context) | Self::Errored(context) => Some(context),
            Self::Passed | Self::Skipped(_) => None,
        }
    }
}

impl From<&Outcome> for ScenarioStatus {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::Passed,
            Outcome::Failure(context) => Self::Failed(context.clone()),
            Outcome::Error(context) => Self::Errored(context.clone()),
            Outcome::Skipped(reason) => Self::Skipped(reason.clone()),
        }
    }
}

/// Outcome of one run together with its identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioRecord {
    feature_id: String,
    feature_name: String,
    scenario_index: Option<usize>,
    scenario_name: String,
    status: ScenarioStatus,
}

impl ScenarioRecord {
    /// Construct a record for a scenario run.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::reporting::{ScenarioRecord, ScenarioStatus};
    ///
    /// let record = ScenarioRecord::new(
    ///     "features:math.feature",
    ///     "Arithmetic",
    ///     Some(1),
    ///     "Adds",
    ///     ScenarioStatus::Passed,
    /// );
    /// assert_eq!(record.address(), "features:math.feature:1");
    /// ```
    #[must_use]
    pub fn new(
        feature_id: impl Into<String>,
        feature_name: impl Into<String>,
        scenario_index: Option<usize>,
        scenario_name: impl Into<String>,
        status: ScenarioStatus,
    ) -> Self {
        Self {
            feature_id: feature_id.into(),
            feature_name: feature_name.into(),
            scenario_index,
            scenario_name: scenario_name.into(),
            status,
        }
    }

    /// Build a record from a reported outcome.
    ///
    /// Feature-level runs take the feature name as their scenario name.
    #[must_use]
    pub fn from_outcome(run: &RunInfo, outcome: &Outcome) -> Self {
        Self::new(
            run.feature_id.clone(),
            run.feature_name.clone(),
            run.scenario_index,
            run.scenario_name
                .clone()
                .unwrap_or_else(|| run.feature_name.clone()),
            ScenarioStatus::from(outcome),
        )
    }

    /// `<module>:<file>` id of the feature.
    #[must_use]
    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    /// Name of the feature.
    #[must_use]
    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    /// Index of the scenario; `None` for feature-level runs.
    #[must_use]
    pub fn scenario_index(&self) -> Option<usize> {
        self.scenario_index
    }

    /// Name of the scenario run.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    /// Recorded status.
    #[must_use]
    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }

    /// Address selecting the run again: the feature id plus the index.
    #[must_use]
    pub fn address(&self) -> String {
        self.scenario_index.map_or_else(
            || self.feature_id.clone(),
            |index| format!("{}:{index}", self.feature_id),
        )
    }
}
