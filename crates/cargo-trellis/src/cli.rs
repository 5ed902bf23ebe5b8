//! Command dispatch for the `cargo trellis` entrypoint.

use std::ffi::OsString;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result};
use tracing::{debug, info};
use trellis_bdd::{Feature, Scenario};
use trellis_bdd_patterns::split_keyword;

use crate::config::LogLevel;
use crate::output::{
    ScenarioListing, scenario_address, write_check_total, write_feature_checked,
    write_keyword_issue, write_listing_json, write_load_error, write_scenario,
};

/// Argument cargo inserts when the binary runs as `cargo trellis`.
const CARGO_SUBCOMMAND: &str = "trellis";

/// Diagnostics for trellis-bdd feature files.
#[derive(Parser, Debug)]
#[command(name = "cargo-trellis", bin_name = "cargo trellis", author, version, about)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

/// Supported diagnostic commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every scenario with its selective-run address.
    Scenarios(ScenariosArgs),
    /// Load feature files and report structural problems.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ScenariosArgs {
    /// Feature files to list.
    #[arg(required = true)]
    features: Vec<Utf8PathBuf>,
    /// Module path used in addresses instead of the parent directory name.
    #[arg(long)]
    module: Option<String>,
    /// Emit JSON instead of human-readable text.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Feature files to check.
    #[arg(required = true)]
    features: Vec<Utf8PathBuf>,
}

/// Overall result of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing went wrong.
    Clean,
    /// At least one feature could not be loaded.
    Failed,
}

impl Status {
    /// Whether the process should exit successfully.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Clean
    }
}

/// Drop the subcommand name cargo passes as the first argument.
///
/// Running `cargo trellis check x` invokes the binary as
/// `cargo-trellis trellis check x`.
#[must_use]
pub fn normalise_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    if args.get(1).is_some_and(|arg| arg == CARGO_SUBCOMMAND) {
        args.remove(1);
    }
    args
}

/// Parse the process arguments, exiting with usage on error.
#[must_use]
pub fn parse_from_env() -> Cli {
    Cli::parse_from(normalise_args(std::env::args_os()))
}

/// Execute the parsed command, writing its report to `writer`.
///
/// # Errors
///
/// Returns an error if a listed feature cannot be loaded or output cannot be
/// written. `check` reports load failures through [`Status::Failed`]
/// instead.
pub fn run(cli: &Cli, writer: &mut dyn Write) -> Result<Status> {
    let status = match &cli.command {
        Commands::Scenarios(args) => list_scenarios(args, writer).map(|()| Status::Clean)?,
        Commands::Check(args) => check_features(args, writer)?,
    };
    writer.flush().wrap_err("failed to flush output")?;
    Ok(status)
}

fn load(path: &Utf8Path, module: Option<&str>) -> Result<Feature> {
    debug!(%path, "loading feature");
    let feature = Feature::from_path(path).wrap_err_with(|| format!("failed to load {path}"))?;
    Ok(module
        .into_iter()
        .fold(feature, |feature, module| feature.with_module(module)))
}

fn list_scenarios(args: &ScenariosArgs, writer: &mut dyn Write) -> Result<()> {
    let features = args
        .features
        .iter()
        .map(|path| load(path, args.module.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    if args.json {
        let listings: Vec<ScenarioListing<'_>> = features
            .iter()
            .flat_map(|feature| {
                feature
                    .scenarios()
                    .iter()
                    .map(move |scenario| ScenarioListing::new(feature, scenario))
            })
            .collect();
        return write_listing_json(writer, &listings);
    }
    for feature in &features {
        for scenario in feature.scenarios() {
            write_scenario(writer, feature, scenario)?;
        }
    }
    Ok(())
}

/// Steps whose first line does not open with a recognised keyword.
fn unkeyworded_steps(feature: &Feature) -> impl Iterator<Item = (&Scenario, &str)> {
    feature.scenarios().iter().flat_map(|scenario| {
        scenario
            .steps()
            .iter()
            .map(|step| step.lines().next().unwrap_or_default())
            .filter(|line| split_keyword(line).is_none())
            .map(move |line| (scenario, line))
    })
}

fn check_features(args: &CheckArgs, writer: &mut dyn Write) -> Result<Status> {
    let mut failed = 0_usize;
    for path in &args.features {
        debug!(%path, "checking feature");
        match Feature::from_path(path) {
            Ok(feature) => {
                let mut issues = 0_usize;
                for (scenario, line) in unkeyworded_steps(&feature) {
                    issues += 1;
                    write_keyword_issue(writer, &scenario_address(&feature, scenario), line)?;
                }
                write_feature_checked(writer, &feature, issues)?;
            }
            Err(err) => {
                failed += 1;
                write_load_error(writer, &err)?;
            }
        }
    }
    write_check_total(writer, args.features.len(), failed)?;
    info!(checked = args.features.len(), failed, "check finished");
    Ok(if failed == 0 {
        Status::Clean
    } else {
        Status::Failed
    })
}
