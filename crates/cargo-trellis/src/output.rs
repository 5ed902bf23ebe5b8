//! Helpers for rendering listings and check reports.

use std::io::Write;

use eyre::{Context, Result};
use serde::Serialize;
use trellis_bdd::{Feature, FeatureError, Scenario};

/// Selective-run address of one scenario: `<module>:<file>:<index>`.
pub(crate) fn scenario_address(feature: &Feature, scenario: &Scenario) -> String {
    format!("{}:{}", feature.id(), scenario.index())
}

fn example_count(scenario: &Scenario) -> Option<usize> {
    scenario.examples().map(|table| table.rows().len())
}

pub(crate) fn write_scenario(
    writer: &mut dyn Write,
    feature: &Feature,
    scenario: &Scenario,
) -> Result<()> {
    let address = scenario_address(feature, scenario);
    let mut line = format!("{address}  {}", scenario.name());
    if !scenario.tags().is_empty() {
        let tags: Vec<&str> = scenario.tags().iter().map(String::as_str).collect();
        line.push_str("  [");
        line.push_str(&tags.join(", "));
        line.push(']');
    }
    if let Some(count) = example_count(scenario) {
        let noun = if count == 1 { "example" } else { "examples" };
        line.push_str(&format!("  ({count} {noun})"));
    }
    writeln!(writer, "{line}").wrap_err_with(|| format!("failed to write scenario {address}"))
}

/// One scenario in the JSON listing.
#[derive(Serialize)]
pub(crate) struct ScenarioListing<'a> {
    address: String,
    feature: &'a str,
    index: usize,
    name: &'a str,
    line: usize,
    tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    examples: Option<usize>,
}

impl<'a> ScenarioListing<'a> {
    pub(crate) fn new(feature: &'a Feature, scenario: &'a Scenario) -> Self {
        Self {
            address: scenario_address(feature, scenario),
            feature: feature.name(),
            index: scenario.index(),
            name: scenario.name(),
            line: scenario.line(),
            tags: scenario.tags().iter().map(String::as_str).collect(),
            examples: example_count(scenario),
        }
    }
}

pub(crate) fn write_listing_json(
    writer: &mut dyn Write,
    listings: &[ScenarioListing<'_>],
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, listings)
        .wrap_err("failed to serialise scenario listing")?;
    writeln!(writer).wrap_err("failed to terminate scenario listing")
}

pub(crate) fn write_keyword_issue(writer: &mut dyn Write, address: &str, step: &str) -> Result<()> {
    writeln!(
        writer,
        "warning: {address}: step `{step}` does not start with a step keyword"
    )
    .wrap_err_with(|| format!("failed to write keyword warning for {address}"))
}

pub(crate) fn write_load_error(writer: &mut dyn Write, error: &FeatureError) -> Result<()> {
    writeln!(writer, "error: {error}").wrap_err("failed to write load error")
}

pub(crate) fn write_feature_checked(
    writer: &mut dyn Write,
    feature: &Feature,
    issues: usize,
) -> Result<()> {
    let scenarios = feature.scenarios().len();
    let verdict = if issues == 0 { "ok" } else { "warn" };
    writeln!(
        writer,
        "{verdict} {}: {scenarios} scenario(s), {issues} step(s) without a keyword",
        feature.id()
    )
    .wrap_err_with(|| format!("failed to write check result for {}", feature.id()))
}

pub(crate) fn write_check_total(writer: &mut dyn Write, checked: usize, failed: usize) -> Result<()> {
    writeln!(writer, "checked {checked} feature(s), {failed} failed to load")
        .wrap_err("failed to write check summary")
}
