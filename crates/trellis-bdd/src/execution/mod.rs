//! The feature execution machine.
//!
//! [`FeatureRunner`] drives one [`Feature`] against a step registry and a
//! hook registry. Every scenario run moves strictly forward:
//!
//! ```text
//! not started -> running step 1 .. n -> succeeded | failed | errored | skipped
//! ```
//!
//! Outlines are driven once per example row, each row an independent run with
//! a fresh [`ExecutionContext`]. `before` and `after` feature hooks wrap the
//! whole set of runs exactly once.
//!
//! Control flow is threaded through return values. A stage that ends a run
//! early yields [`Halt::Ended`] with the run's outcome already decided, and
//! the enclosing scenario scope absorbs it. [`Halt::Interrupted`] is never
//! absorbed: it unwinds to the caller as [`RunError::Interrupted`].

mod error;
mod outcome;

use std::collections::BTreeSet;

use log::{debug, info, warn};

pub use error::RunError;
pub use outcome::{FailureContext, Outcome, RunSummary};

use crate::config::RunConfig;
use crate::feature::{Feature, Scenario, UnmatchedStep};
use crate::hooks::{HookFailure, HookRegistry, Stage, Timing};
use crate::panic::catch_panic;
use crate::registry::StepRegistry;
use crate::reporting::{Reporter, RunInfo};
use crate::selection::{Selector, render_selectors};
use crate::template;
use crate::{ExecutionContext, StepError};

/// Reason given for outlines whose table has no rows.
pub const EMPTY_OUTLINE_REASON: &str = "scenario outline has no example rows";

/// Early end of a scope.
#[derive(Debug)]
enum Halt {
    /// The run ended with this outcome; enclosing stages are skipped.
    Ended(Outcome),
    /// Propagates to the caller without an outcome.
    Interrupted,
}

/// Forwards run events to the reporter and counts outcomes.
struct Sink<'r> {
    reporter: &'r mut dyn Reporter,
    summary: RunSummary,
}

impl Sink<'_> {
    fn start(&mut self, run: &RunInfo) {
        self.reporter.start(run);
    }

    fn finish(&mut self, run: &RunInfo, outcome: &Outcome) {
        debug!(
            "{} {}: {}",
            run.feature_id,
            run.scenario_name.as_deref().unwrap_or("(feature)"),
            outcome.label()
        );
        self.summary.record(outcome);
        self.reporter.outcome(run, outcome);
        self.reporter.stop(run);
    }

    fn report(&mut self, run: &RunInfo, outcome: &Outcome) {
        self.start(run);
        self.finish(run, outcome);
    }

    /// Closes a started run without recording an outcome.
    fn abandon(&mut self, run: &RunInfo) {
        debug!(
            "{} {}: interrupted",
            run.feature_id,
            run.scenario_name.as_deref().unwrap_or("(feature)")
        );
        self.reporter.stop(run);
    }
}

/// Runs the scenarios of one feature.
///
/// # Examples
/// ```
/// use trellis_bdd::reporting::Collector;
/// use trellis_bdd::{Feature, FeatureRunner, HookRegistry, StepRegistry};
///
/// let feature = Feature::from_text(
///     "features/math.feature",
///     "Feature: Arithmetic\n  Scenario: Add\n    Given I add 1 and 1\n    Then the result should be 2\n",
/// )
/// .unwrap_or_else(|e| panic!("{e}"));
///
/// let mut steps = StepRegistry::<i64>::new();
/// steps
///     .step(r"I add (\d+) and (\d+)", |ctx, args| {
///         let sum = args.parse::<i64>(0)? + args.parse::<i64>(1)?;
///         *ctx.world_mut() = sum;
///         Ok(())
///     })
///     .and_then(|steps| {
///         steps.step(r"the result should be (\d+)", |ctx, args| {
///             assert_eq!(*ctx.world(), args.parse::<i64>(0)?);
///             Ok(())
///         })
///     })
///     .unwrap_or_else(|e| panic!("{e}"));
///
/// let hooks = HookRegistry::new();
/// let mut total = 0;
/// let mut collector = Collector::new();
/// let summary = FeatureRunner::new(&feature, &steps, &hooks)
///     .run(&mut total, &mut collector)
///     .unwrap_or_else(|e| panic!("{e}"));
/// assert!(summary.is_success());
/// assert_eq!(summary.successes, 1);
/// ```
pub struct FeatureRunner<'a, W> {
    feature: &'a Feature,
    steps: &'a StepRegistry<W>,
    hooks: &'a HookRegistry<W>,
    selection: Option<BTreeSet<Selector>>,
    config: RunConfig,
}

impl<'a, W> FeatureRunner<'a, W> {
    /// Create a runner for every scenario of `feature`.
    ///
    /// The runner starts with a default [`RunConfig`]; pass
    /// [`RunConfig::from_env`] to [`Self::with_config`] to honour the
    /// environment.
    #[must_use]
    pub fn new(
        feature: &'a Feature,
        steps: &'a StepRegistry<W>,
        hooks: &'a HookRegistry<W>,
    ) -> Self {
        Self {
            feature,
            steps,
            hooks,
            selection: None,
            config: RunConfig::default(),
        }
    }

    /// Restrict the run to the scenarios `selectors` address.
    ///
    /// An empty selection runs the whole feature.
    #[must_use]
    pub fn select(mut self, selectors: impl IntoIterator<Item = Selector>) -> Self {
        let selectors: BTreeSet<Selector> = selectors.into_iter().collect();
        self.selection = (!selectors.is_empty()).then_some(selectors);
        self
    }

    /// Apply a tag filter and check-only flag.
    #[must_use]
    pub fn with_config(mut self, config: &RunConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Address of what this runner executes.
    ///
    /// The feature id, followed by the selector list when a subset is
    /// selected.
    #[must_use]
    pub fn id(&self) -> String {
        self.selection.as_ref().map_or_else(
            || self.feature.id(),
            |selectors| format!("{}:{}", self.feature.id(), render_selectors(selectors)),
        )
    }

    /// Steps no registered definition matches.
    #[must_use]
    pub fn check(&self) -> Vec<UnmatchedStep> {
        self.feature.unmatched_steps(self.steps)
    }

    /// Execute the feature, reporting every run to `reporter`.
    ///
    /// # Errors
    /// Returns [`RunError::Interrupted`] when a step or hook requests an
    /// interrupt. Every other failure is reported as an outcome.
    pub fn run(
        &self,
        world: &mut W,
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, RunError> {
        let mut sink = Sink {
            reporter,
            summary: RunSummary::default(),
        };
        if self.config.check_only() {
            self.report_unmatched(&mut sink);
            return Ok(sink.summary);
        }
        info!("running feature '{}' ({})", self.feature.name(), self.id());
        let result = self
            .feature_hooks(world, Timing::Before, &mut sink)
            .and_then(|()| self.run_scenarios(world, &mut sink))
            .and_then(|()| self.feature_hooks(world, Timing::After, &mut sink));
        match result {
            Err(Halt::Interrupted) => {
                warn!("feature '{}' interrupted", self.feature.name());
                Err(RunError::Interrupted)
            }
            Ok(()) | Err(Halt::Ended(_)) => {
                info!("finished feature '{}': {}", self.feature.name(), sink.summary);
                Ok(sink.summary)
            }
        }
    }

    fn report_unmatched(&self, sink: &mut Sink<'_>) {
        let unmatched = self.check();
        if unmatched.is_empty() {
            debug!("every step of '{}' matches a definition", self.feature.name());
            return;
        }
        let mut message = String::from("Unmatched steps:");
        for entry in &unmatched {
            message.push_str("\n    ");
            message.push_str(&entry.step);
            if let Some(reason) = &entry.reason {
                message.push_str(" (");
                message.push_str(reason);
                message.push(')');
            }
        }
        let outcome = Outcome::Error(FailureContext {
            scenario_index: None,
            scenario_name: self.feature.name().to_string(),
            completed_steps: Vec::new(),
            failed_step: None,
            message,
        });
        sink.report(&RunInfo::feature(self.feature), &outcome);
    }

    /// Runs feature hooks, reporting a failure as a feature-level outcome.
    fn feature_hooks(&self, world: &mut W, timing: Timing, sink: &mut Sink<'_>) -> Result<(), Halt> {
        let mut ctx = ExecutionContext::new(world, self.feature.name());
        let Err(failure) = self.hooks.run(&mut ctx, timing, Stage::Feature) else {
            return Ok(());
        };
        let halt = self.hook_halt(&ctx, failure);
        if let Halt::Ended(outcome) = &halt {
            sink.report(&RunInfo::feature(self.feature), outcome);
        }
        Err(halt)
    }

    fn run_scenarios(&self, world: &mut W, sink: &mut Sink<'_>) -> Result<(), Halt> {
        for scenario in self.feature.scenarios() {
            if !self.is_selected(scenario) {
                debug!("scenario {} '{}' not selected", scenario.index(), scenario.name());
                continue;
            }
            if !self.config.matches_tags(scenario.tags()) {
                debug!("scenario {} '{}' filtered by tags", scenario.index(), scenario.name());
                continue;
            }
            let Some(table) = scenario.examples() else {
                self.run_scenario(world, sink, scenario.index(), scenario.name(), scenario.steps())?;
                continue;
            };
            if table.rows().is_empty() {
                warn!("scenario outline '{}' has no example rows", scenario.name());
                let run = RunInfo::scenario(self.feature, scenario.index(), scenario.name());
                sink.report(&run, &Outcome::Skipped(EMPTY_OUTLINE_REASON.to_string()));
                continue;
            }
            for row in table.rows() {
                let name = format!("{} <- {row}", scenario.name());
                match template::substitute_all(scenario.steps(), row) {
                    Ok(steps) => self.run_scenario(world, sink, scenario.index(), &name, &steps)?,
                    Err(err) => {
                        let run = RunInfo::scenario(self.feature, scenario.index(), name.as_str());
                        let outcome = Outcome::Error(FailureContext {
                            scenario_index: Some(scenario.index()),
                            scenario_name: name.clone(),
                            completed_steps: Vec::new(),
                            message: err.to_string(),
                            failed_step: Some(err.step),
                        });
                        sink.report(&run, &outcome);
                    }
                }
            }
        }
        Ok(())
    }

    fn is_selected(&self, scenario: &Scenario) -> bool {
        self.selection.as_ref().is_none_or(|selectors| {
            selectors
                .iter()
                .any(|selector| selector.matches(scenario.index(), scenario.name()))
        })
    }

    /// One isolated scenario run. Only an interrupt escapes.
    fn run_scenario(
        &self,
        world: &mut W,
        sink: &mut Sink<'_>,
        index: usize,
        name: &str,
        steps: &[String],
    ) -> Result<(), Halt> {
        let run = RunInfo::scenario(self.feature, index, name);
        sink.start(&run);
        let mut ctx = ExecutionContext::new(world, self.feature.name()).with_scenario(index, name);
        let outcome = match self.execute(&mut ctx, steps) {
            Ok(()) => Outcome::Success,
            Err(Halt::Ended(outcome)) => outcome,
            Err(Halt::Interrupted) => {
                sink.abandon(&run);
                return Err(Halt::Interrupted);
            }
        };
        sink.finish(&run, &outcome);
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_, W>, steps: &[String]) -> Result<(), Halt> {
        self.hooks_at(ctx, Timing::Before, Stage::Scenario)?;
        for step in steps {
            self.execute_step(ctx, step)?;
        }
        self.hooks_at(ctx, Timing::After, Stage::Scenario)
    }

    fn execute_step(&self, ctx: &mut ExecutionContext<'_, W>, step: &str) -> Result<(), Halt> {
        let matched = self
            .steps
            .find(step)
            .map_err(|err| self.fail(ctx, step, Stage::Error, err.to_string()))?;
        ctx.begin_step(step, matched.definition.name());
        self.hooks_at(ctx, Timing::Before, Stage::Step)?;
        let result = catch_panic(|| matched.definition.invoke(ctx, &matched.arguments))
            .unwrap_or_else(|message| Err(StepError::Failure { message }));
        match result {
            Ok(()) => {}
            Err(StepError::Interrupted) => return Err(Halt::Interrupted),
            Err(StepError::Skip { reason }) => return Err(Halt::Ended(Outcome::Skipped(reason))),
            Err(StepError::Failure { message }) => {
                return Err(self.fail(ctx, step, Stage::Failure, message));
            }
            Err(StepError::Error { message }) => {
                return Err(self.fail(ctx, step, Stage::Error, message));
            }
        }
        ctx.complete_step(step);
        self.hooks_at(ctx, Timing::After, Stage::Step)
    }

    fn hooks_at(
        &self,
        ctx: &mut ExecutionContext<'_, W>,
        timing: Timing,
        stage: Stage,
    ) -> Result<(), Halt> {
        self.hooks
            .run(ctx, timing, stage)
            .map_err(|failure| self.hook_halt(ctx, failure))
    }

    /// Converts a failed hook into the outcome of the scope it ran in.
    fn hook_halt(&self, ctx: &ExecutionContext<'_, W>, failure: HookFailure) -> Halt {
        let HookFailure {
            hook,
            timing,
            stage,
            error,
        } = failure;
        match error {
            StepError::Interrupted => Halt::Interrupted,
            StepError::Skip { reason } => {
                debug!("hook `{hook}` skipped the run at {timing}:{stage}: {reason}");
                Halt::Ended(Outcome::Skipped(reason))
            }
            StepError::Failure { message } | StepError::Error { message } => {
                let failed_step = (stage == Stage::Step)
                    .then(|| ctx.current_step().map(str::to_string))
                    .flatten();
                Halt::Ended(Outcome::Error(FailureContext {
                    scenario_index: ctx.scenario_index(),
                    scenario_name: self.scenario_name(ctx),
                    completed_steps: ctx.completed_steps().to_vec(),
                    failed_step,
                    message: format!("hook `{hook}` failed at {timing}:{stage}: {message}"),
                }))
            }
        }
    }

    /// Records a step failure or error and runs the matching `after` hooks.
    ///
    /// A hook failing here is logged; the step's outcome stands.
    fn fail(
        &self,
        ctx: &mut ExecutionContext<'_, W>,
        step: &str,
        stage: Stage,
        message: String,
    ) -> Halt {
        let failure = FailureContext {
            scenario_index: ctx.scenario_index(),
            scenario_name: self.scenario_name(ctx),
            completed_steps: ctx.completed_steps().to_vec(),
            failed_step: Some(step.to_string()),
            message,
        };
        ctx.set_failure(failure.clone());
        if let Err(hook_failure) = self.hooks.run(ctx, Timing::After, stage) {
            if hook_failure.error.is_interrupt() {
                return Halt::Interrupted;
            }
            warn!(
                "hook `{}` failed while handling a {stage}: {}",
                hook_failure.hook, hook_failure.error
            );
        }
        let outcome = if stage == Stage::Failure {
            Outcome::Failure(failure)
        } else {
            Outcome::Error(failure)
        };
        Halt::Ended(outcome)
    }

    fn scenario_name(&self, ctx: &ExecutionContext<'_, W>) -> String {
        ctx.scenario_name()
            .unwrap_or_else(|| self.feature.name())
            .to_string()
    }
}

#[cfg(test)]
mod tests;
