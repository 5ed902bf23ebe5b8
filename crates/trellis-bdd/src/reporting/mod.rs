//! Outcome sinks.
//!
//! The execution machine never formats results itself. It reports every
//! scenario run to a [`Reporter`] as a `start`, exactly one `outcome`, and a
//! `stop`. [`Collector`] keeps the outcomes as [`ScenarioRecord`]s, which the
//! [`summary`] and `json` writers render for people and tools respectively.

mod collector;
mod record;
pub mod summary;

/// JSON writer for collected records.
#[cfg(feature = "diagnostics")]
pub mod json;

pub use collector::Collector;
pub use record::{ScenarioRecord, ScenarioStatus};

use crate::execution::Outcome;
use crate::feature::Feature;

/// Identity of one reported run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    /// `<module>:<file>` id of the feature.
    pub feature_id: String,
    /// Name from the `Feature:` line.
    pub feature_name: String,
    /// Index of the scenario; `None` for feature-level runs.
    pub scenario_index: Option<usize>,
    /// Name of the scenario run, outline suffix included.
    pub scenario_name: Option<String>,
}

impl RunInfo {
    /// Identity of a feature-level run, used for feature hook outcomes.
    #[must_use]
    pub fn feature(feature: &Feature) -> Self {
        Self {
            feature_id: feature.id(),
            feature_name: feature.name().to_string(),
            scenario_index: None,
            scenario_name: None,
        }
    }

    /// Identity of one scenario run.
    #[must_use]
    pub fn scenario(feature: &Feature, index: usize, name: impl Into<String>) -> Self {
        Self {
            scenario_index: Some(index),
            scenario_name: Some(name.into()),
            ..Self::feature(feature)
        }
    }
}

/// Receives run events from the execution machine.
///
/// # Examples
/// ```
/// use trellis_bdd::Outcome;
/// use trellis_bdd::reporting::{Reporter, RunInfo};
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl Reporter for Count {
///     fn outcome(&mut self, _run: &RunInfo, outcome: &Outcome) {
///         if matches!(outcome, Outcome::Success) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait Reporter {
    /// A run is about to start.
    fn start(&mut self, _run: &RunInfo) {}

    /// A run produced its outcome.
    fn outcome(&mut self, run: &RunInfo, outcome: &Outcome);

    /// A run finished.
    fn stop(&mut self, _run: &RunInfo) {}
}
