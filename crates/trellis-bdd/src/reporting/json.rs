//! JSON writer for scenario records.
//!
//! The schema keeps status labels in lowercase so downstream tools can rely
//! on consistent casing. Failed and errored runs carry their diagnosis;
//! skipped runs carry their reason.

use std::io::Write;

use serde::Serialize;

use super::{ScenarioRecord, ScenarioStatus};

#[derive(Serialize)]
struct JsonReport<'a> {
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    feature_id: &'a str,
    feature_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario_index: Option<usize>,
    scenario_name: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<JsonFailure<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_reason: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    completed_steps: &'a [String],
    failed_step: Option<&'a str>,
    message: &'a str,
}

impl<'a> From<&'a [ScenarioRecord]> for JsonReport<'a> {
    fn from(records: &'a [ScenarioRecord]) -> Self {
        let scenarios = records.iter().map(JsonScenario::from).collect();
        Self { scenarios }
    }
}

impl<'a> From<&'a ScenarioRecord> for JsonScenario<'a> {
    fn from(record: &'a ScenarioRecord) -> Self {
        let failure = record.status().context().map(|context| JsonFailure {
            completed_steps: &context.completed_steps,
            failed_step: context.failed_step.as_deref(),
            message: &context.message,
        });
        let skip_reason = match record.status() {
            ScenarioStatus::Skipped(reason) => Some(reason.as_str()),
            _ => None,
        };
        Self {
            feature_id: record.feature_id(),
            feature_name: record.feature_name(),
            scenario_index: record.scenario_index(),
            scenario_name: record.scenario_name(),
            status: record.status().label(),
            failure,
            skip_reason,
        }
    }
}

/// Serialize `records` into `writer`.
///
/// # Examples
/// ```rust
/// use trellis_bdd::reporting::{json, ScenarioRecord, ScenarioStatus};
///
/// let records = vec![ScenarioRecord::new(
///     "features:math.feature",
///     "Arithmetic",
///     Some(0),
///     "Adds",
///     ScenarioStatus::Passed,
/// )];
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &records).unwrap_or_else(|e| panic!("{e}"));
/// let output = String::from_utf8_lossy(&buffer);
/// assert!(output.contains("\"status\":\"passed\""));
/// ```
///
/// # Errors
/// Returns an error when serialization or writing fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(records))
}

/// Serialize `records` into a string.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn to_string(records: &[ScenarioRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(records))
}
