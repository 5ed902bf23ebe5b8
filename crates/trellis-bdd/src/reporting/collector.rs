//! In-memory reporter.

use super::{Reporter, RunInfo, ScenarioRecord};
use crate::execution::Outcome;

/// Reporter storing one [`ScenarioRecord`] per outcome.
///
/// # Examples
/// ```
/// use trellis_bdd::Outcome;
/// use trellis_bdd::reporting::{Collector, Reporter, RunInfo};
///
/// let run = RunInfo {
///     feature_id: "features:math.feature".into(),
///     feature_name: "Arithmetic".into(),
///     scenario_index: Some(0),
///     scenario_name: Some("Adds".into()),
/// };
/// let mut collector = Collector::new();
/// collector.outcome(&run, &Outcome::Success);
/// assert_eq!(collector.records().len(), 1);
/// assert_eq!(collector.records()[0].status().label(), "passed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collector {
    records: Vec<ScenarioRecord>,
}

impl Collector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far, in report order.
    #[must_use]
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Take the collected records, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<ScenarioRecord> {
        std::mem::take(&mut self.records)
    }
}

impl Reporter for Collector {
    fn outcome(&mut self, run: &RunInfo, outcome: &Outcome) {
        self.records.push(ScenarioRecord::from_outcome(run, outcome));
    }
}
