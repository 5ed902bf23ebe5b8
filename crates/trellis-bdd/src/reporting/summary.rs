//! Plain-text summary of failed and errored runs.

use std::io::{self, Write};

use super::{ScenarioRecord, ScenarioStatus};

/// Write `Failures` and `Errors` sections for `records`.
///
/// Each section lists its records grouped by feature, ordered by feature id
/// and scenario index. A section with no records is omitted.
///
/// # Errors
/// Returns any error raised by `writer`.
///
/// # Examples
/// ```
/// use trellis_bdd::FailureContext;
/// use trellis_bdd::reporting::{ScenarioRecord, ScenarioStatus, summary};
///
/// let failure = FailureContext {
///     scenario_index: Some(2),
///     scenario_name: "Adds".into(),
///     completed_steps: Vec::new(),
///     failed_step: None,
///     message: "boom".into(),
/// };
/// let records = [ScenarioRecord::new(
///     "features:math.feature",
///     "Arithmetic",
///     Some(2),
///     "Adds",
///     ScenarioStatus::Failed(failure),
/// )];
/// let mut out = Vec::new();
/// summary::write_summary(&mut out, &records).unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(
///     String::from_utf8_lossy(&out),
///     "Failures\n========\nFeature: Arithmetic\nAdds\n  features:math.feature:2\n\n",
/// );
/// ```
pub fn write_summary<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> io::Result<()> {
    write_section(writer, "Failures", records, |status| {
        matches!(status, ScenarioStatus::Failed(_))
    })?;
    write_section(writer, "Errors", records, |status| {
        matches!(status, ScenarioStatus::Errored(_))
    })
}

fn write_section<W: Write>(
    writer: &mut W,
    title: &str,
    records: &[ScenarioRecord],
    include: impl Fn(&ScenarioStatus) -> bool,
) -> io::Result<()> {
    let mut selected: Vec<&ScenarioRecord> =
        records.iter().filter(|record| include(record.status())).collect();
    if selected.is_empty() {
        return Ok(());
    }
    selected.sort_by(|a, b| {
        (a.feature_id(), a.scenario_index()).cmp(&(b.feature_id(), b.scenario_index()))
    });
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(title.len()))?;
    for group in selected.chunk_by(|a, b| a.feature_id() == b.feature_id()) {
        if let Some(first) = group.first() {
            writeln!(writer, "Feature: {}", first.feature_name())?;
        }
        for record in group {
            writeln!(writer, "{}", record.scenario_name())?;
            writeln!(writer, "  {}", record.address())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
