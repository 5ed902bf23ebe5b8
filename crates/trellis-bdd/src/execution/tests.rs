//! Unit tests for the execution machine.

use rstest::{fixture, rstest};

use super::*;
use crate::reporting::{Collector, ScenarioRecord, ScenarioStatus};

type Trace = Vec<String>;

const STAGES: [Stage; 5] = [
    Stage::Feature,
    Stage::Scenario,
    Stage::Step,
    Stage::Error,
    Stage::Failure,
];

fn feature(text: &str) -> Feature {
    Feature::from_text("features/sample.feature", text)
        .unwrap_or_else(|e| panic!("fixture feature should load: {e}"))
}

#[fixture]
fn steps() -> StepRegistry<Trace> {
    let mut steps = StepRegistry::<Trace>::new();
    steps
        .step(r"step (\w+)", |ctx, args| {
            let name = args.get(0).unwrap_or_default().to_string();
            ctx.world_mut().push(format!("step {name}"));
            Ok(())
        })
        .and_then(|s| {
            s.step("record (.+)", |ctx, args| {
                let text = args.get(0).unwrap_or_default().to_string();
                ctx.world_mut().push(text);
                Ok(())
            })
        })
        .and_then(|s| {
            s.step("the trail is recorded", |ctx, _| {
                let entry = format!(
                    "{} done, at {}",
                    ctx.completed_steps().len(),
                    ctx.current_step().unwrap_or_default()
                );
                ctx.world_mut().push(entry);
                Ok(())
            })
        })
        .and_then(|s| s.step("a failing step", |_, _| Err(StepError::failure("expected 3"))))
        .and_then(|s| s.step("an erroring step", |_, _| Err(StepError::error("broken"))))
        .and_then(|s| s.step("a skipping step", |_, _| Err(StepError::skip("not today"))))
        .and_then(|s| s.step("a panicking step", |_, _| panic!("assertion exploded")))
        .and_then(|s| s.step("an interrupting step", |_, _| Err(StepError::Interrupted)))
        .and_then(|s| s.step(r"I mix (?P<a>\d+) and (\d+)", |_, _| Ok(())))
        .unwrap_or_else(|e| panic!("fixture patterns should compile: {e}"));
    steps
}

#[fixture]
fn hooks() -> HookRegistry<Trace> {
    let mut hooks = HookRegistry::<Trace>::new();
    for timing in [Timing::Before, Timing::After] {
        for stage in STAGES {
            hooks.on(timing, stage, move |ctx| {
                ctx.world_mut().push(format!("{timing}:{stage}"));
                Ok(())
            });
        }
    }
    hooks
}

/// Reporter recording the sequence of events it receives.
#[derive(Default)]
struct Events(Vec<String>);

impl Reporter for Events {
    fn start(&mut self, run: &RunInfo) {
        self.0
            .push(format!("start {}", run.scenario_name.as_deref().unwrap_or_default()));
    }

    fn outcome(&mut self, _run: &RunInfo, outcome: &Outcome) {
        self.0.push(format!("outcome {}", outcome.label()));
    }

    fn stop(&mut self, run: &RunInfo) {
        self.0
            .push(format!("stop {}", run.scenario_name.as_deref().unwrap_or_default()));
    }
}

struct Run {
    trace: Trace,
    records: Vec<ScenarioRecord>,
    result: Result<RunSummary, RunError>,
}

fn run_with(runner: &FeatureRunner<'_, Trace>) -> Run {
    let mut trace = Trace::new();
    let mut collector = Collector::new();
    let result = runner.run(&mut trace, &mut collector);
    Run {
        trace,
        records: collector.drain(),
        result,
    }
}

fn run(text: &str, steps: &StepRegistry<Trace>, hooks: &HookRegistry<Trace>) -> Run {
    let feature = feature(text);
    run_with(&FeatureRunner::new(&feature, steps, hooks))
}

fn labels(records: &[ScenarioRecord]) -> Vec<&str> {
    records.iter().map(|r| r.status().label()).collect()
}

fn only_context(records: &[ScenarioRecord]) -> &FailureContext {
    let [record] = records else {
        panic!("expected exactly one record, got {records:?}");
    };
    record
        .status()
        .context()
        .unwrap_or_else(|| panic!("expected a failure context, got {record:?}"))
}

const TWO_STEPS: &str = "\
Feature: Sample
  Scenario: Two steps
    Given step one
    Then step two
";

#[rstest]
fn success_runs_hooks_around_every_step(steps: StepRegistry<Trace>, hooks: HookRegistry<Trace>) {
    let run = run(TWO_STEPS, &steps, &hooks);
    assert_eq!(
        run.trace,
        [
            "before:feature",
            "before:scenario",
            "before:step",
            "step one",
            "after:step",
            "before:step",
            "step two",
            "after:step",
            "after:scenario",
            "after:feature",
        ]
    );
    assert_eq!(labels(&run.records), ["passed"]);
    let summary = run.result.unwrap_or_else(|e| panic!("run should finish: {e}"));
    assert_eq!(summary.successes, 1);
    assert!(summary.is_success());
}

#[rstest]
fn feature_hooks_fire_once_for_many_scenarios(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
) {
    let text = "\
Feature: Sample
  Scenario: First
    Given step one
  Scenario: Second
    Given step two
";
    let run = run(text, &steps, &hooks);
    let count = |entry: &str| run.trace.iter().filter(|t| *t == entry).count();
    assert_eq!(count("before:feature"), 1);
    assert_eq!(count("after:feature"), 1);
    assert_eq!(count("before:scenario"), 2);
    assert_eq!(run.trace.last().map(String::as_str), Some("after:feature"));
    assert_eq!(labels(&run.records), ["passed", "passed"]);
}

#[rstest]
fn unmatched_step_errors_and_stops_the_scenario(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
) {
    let text = "\
Feature: Sample
  Scenario: Lost
    Given step one
    When nothing matches this
    Then step three
";
    let run = run(text, &steps, &hooks);
    assert_eq!(labels(&run.records), ["errored"]);
    let context = only_context(&run.records);
    assert_eq!(context.failed_step.as_deref(), Some("When nothing matches this"));
    assert_eq!(context.completed_steps, ["Given step one"]);
    assert!(context.message.contains("no step definition matches"));
    assert!(!run.trace.iter().any(|t| t == "step three"));
    assert!(run.trace.iter().any(|t| t == "after:error"));
    assert!(!run.trace.iter().any(|t| t == "after:scenario"));
}

#[rstest]
#[case::failure("a failing step", "failed", "after:failure", "expected 3")]
#[case::panic("a panicking step", "failed", "after:failure", "assertion exploded")]
#[case::error("an erroring step", "errored", "after:error", "broken")]
fn failing_steps_capture_context(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
    #[case] step: &str,
    #[case] label: &str,
    #[case] hook: &str,
    #[case] message: &str,
) {
    let text = format!(
        "Feature: Sample\n  Scenario: Breaks.\n    Given step one\n    When {step}\n    Then step three\n"
    );
    let run = run(&text, &steps, &hooks);
    assert_eq!(labels(&run.records), [label]);
    let context = only_context(&run.records);
    assert_eq!(context.scenario_index, Some(0));
    assert_eq!(context.scenario_name, "Breaks.");
    assert_eq!(context.completed_steps, ["Given step one"]);
    assert_eq!(context.failed_step, Some(format!("When {step}")));
    assert_eq!(context.message, message);
    assert!(run.trace.iter().any(|t| t == hook));
    assert!(!run.trace.iter().any(|t| t == "step three"));
    assert_eq!(run.trace.last().map(String::as_str), Some("after:feature"));
}

#[rstest]
fn skip_bypasses_failure_hooks(steps: StepRegistry<Trace>, hooks: HookRegistry<Trace>) {
    let text = "\
Feature: Sample
  Scenario: Skips
    Given a skipping step
    Then step two
";
    let run = run(text, &steps, &hooks);
    assert_eq!(
        run.records.first().map(|r| r.status().clone()),
        Some(ScenarioStatus::Skipped("not today".into()))
    );
    assert!(!run.trace.iter().any(|t| t.ends_with(":error") || t.ends_with(":failure")));
    assert!(!run.trace.iter().any(|t| t == "step two"));
}

#[rstest]
fn interrupt_propagates_without_an_outcome(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
) {
    let feature = feature(
        "\
Feature: Sample
  Scenario: Stops
    Given an interrupting step
  Scenario: Never
    Given step two
",
    );
    let mut trace = Trace::new();
    let mut events = Events::default();
    let result = FeatureRunner::new(&feature, &steps, &hooks).run(&mut trace, &mut events);
    assert_eq!(result, Err(RunError::Interrupted));
    assert_eq!(events.0, ["start Stops", "stop Stops"]);
    assert!(!trace.iter().any(|t| t == "step two" || t == "after:feature"));
}

#[rstest]
fn every_started_run_is_stopped(steps: StepRegistry<Trace>, hooks: HookRegistry<Trace>) {
    let feature = feature(TWO_STEPS);
    let mut trace = Trace::new();
    let mut events = Events::default();
    FeatureRunner::new(&feature, &steps, &hooks)
        .run(&mut trace, &mut events)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        events.0,
        ["start Two steps", "outcome success", "stop Two steps"]
    );
}

#[rstest]
fn mixed_capture_groups_end_the_scenario_as_an_error(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
) {
    let text = "\
Feature: Sample
  Scenario: Mixed
    Given step one
    When I mix 1 and 2
    Then step three
";
    let run = run(text, &steps, &hooks);
    assert_eq!(labels(&run.records), ["errored"]);
    let context = only_context(&run.records);
    assert_eq!(context.failed_step.as_deref(), Some("When I mix 1 and 2"));
    assert_eq!(context.completed_steps, ["Given step one"]);
    assert!(context.message.contains("mixes named and positional groups"));
    assert!(run.trace.iter().any(|t| t == "after:error"));
    assert!(!run.trace.iter().any(|t| t == "step three" || t == "after:scenario"));
}

const OUTLINES: &str = "\
Feature: Sample
  Scenario Outline: Missing value
    Given step <x>
    Then record <undefined>
    Examples:
      | x | y | z |
      | 1 | 1 | 2 |
  Scenario Outline: Complete
    Given record <x>+<y>={z}
    Examples:
      | x | y | z |
      | 1 | 1 | 2 |
      | 2 | 3 | 5 |
";

#[rstest]
fn substitution_failure_is_isolated_to_its_row(steps: StepRegistry<Trace>) {
    let hooks = HookRegistry::<Trace>::new();
    let run = run(OUTLINES, &steps, &hooks);
    assert_eq!(labels(&run.records), ["errored", "passed", "passed"]);
    let Some(context) = run.records.first().and_then(|r| r.status().context()) else {
        panic!("first row should error");
    };
    assert!(context.message.contains("\"undefined\""));
    assert_eq!(context.failed_step.as_deref(), Some("Then record <undefined>"));
    assert_eq!(
        context.scenario_name,
        r#"Missing value <- {"x": "1", "y": "1", "z": "2"}"#
    );
    assert!(!run.trace.iter().any(|t| t == "step 1"));
    assert_eq!(run.trace, ["1+1={z}", "2+3={z}"]);
}

#[rstest]
fn outline_without_rows_is_skipped(steps: StepRegistry<Trace>, hooks: HookRegistry<Trace>) {
    let text = "\
Feature: Sample
  Scenario Outline: Empty
    Given step <x>
    Examples:
      | x |
";
    let run = run(text, &steps, &hooks);
    assert_eq!(
        run.records.first().map(|r| r.status().clone()),
        Some(ScenarioStatus::Skipped(EMPTY_OUTLINE_REASON.into()))
    );
    assert!(!run.trace.iter().any(|t| t == "before:scenario"));
}

const THREE: &str = "\
Feature: Sample
  Scenario: Zero
    Given step zero
  Scenario: One.
    Scenario Tag: fast
    Given step one
  Scenario: Two
    Scenario Tag: slow, db
    Given step two
";

#[rstest]
#[case::by_index(vec![Selector::Index(1)], vec!["step one"])]
#[case::by_name_without_period(vec![Selector::Name("One".into())], vec!["step one"])]
#[case::several(vec![Selector::Index(2), Selector::Name("Zero".into())], vec!["step zero", "step two"])]
#[case::nothing_matches(vec![Selector::Index(9)], vec![])]
#[case::empty_selection(vec![], vec!["step zero", "step one", "step two"])]
fn selection_runs_only_addressed_scenarios(
    steps: StepRegistry<Trace>,
    #[case] selectors: Vec<Selector>,
    #[case] expected: Vec<&str>,
) {
    let hooks = HookRegistry::<Trace>::new();
    let feature = feature(THREE);
    let run = run_with(&FeatureRunner::new(&feature, &steps, &hooks).select(selectors));
    assert_eq!(run.trace, expected);
    assert_eq!(run.records.len(), expected.len());
}

#[rstest]
fn tag_filter_skips_untagged_scenarios(steps: StepRegistry<Trace>) {
    let hooks = HookRegistry::<Trace>::new();
    let feature = feature(THREE);
    let config = RunConfig::default().with_tags(["db"]);
    let run = run_with(&FeatureRunner::new(&feature, &steps, &hooks).with_config(&config));
    assert_eq!(run.trace, ["step two"]);
    assert_eq!(run.records.len(), 1);
}

#[rstest]
fn id_lists_selected_scenarios(steps: StepRegistry<Trace>) {
    let hooks = HookRegistry::<Trace>::new();
    let feature = feature(THREE);
    let runner = FeatureRunner::new(&feature, &steps, &hooks);
    assert_eq!(runner.id(), "features:sample.feature");
    let runner = runner.select([Selector::Name("Two".into()), Selector::Index(0)]);
    assert_eq!(runner.id(), "features:sample.feature:0,\"Two\"");
}

#[rstest]
fn literal_braces_survive_outlines(steps: StepRegistry<Trace>) {
    let hooks = HookRegistry::<Trace>::new();
    let text = "\
Feature: Sample
  Scenario Outline: Braces
    Given record {literal} and {{double}}
    Examples:
      | unused |
      | 1      |
";
    let run = run(text, &steps, &hooks);
    assert_eq!(run.trace, ["{literal} and {{double}}"]);
}

#[rstest]
fn handlers_see_the_trail(steps: StepRegistry<Trace>) {
    let hooks = HookRegistry::<Trace>::new();
    let text = "\
Feature: Sample
  Scenario: Trail
    Given step one
    Then the trail is recorded
";
    let run = run(text, &steps, &hooks);
    assert_eq!(run.trace, ["step one", "1 done, at Then the trail is recorded"]);
}

fn failing_hook(timing: Timing, stage: Stage, error: StepError) -> HookRegistry<Trace> {
    let mut hooks = HookRegistry::<Trace>::new();
    hooks.on(timing, stage, move |_| Err(error.clone()));
    hooks
}

#[rstest]
fn before_feature_failure_skips_everything(steps: StepRegistry<Trace>) {
    let hooks = failing_hook(Timing::Before, Stage::Feature, StepError::error("no db"));
    let run = run(TWO_STEPS, &steps, &hooks);
    assert!(run.trace.is_empty());
    let [record] = run.records.as_slice() else {
        panic!("expected one feature-level record");
    };
    assert_eq!(record.scenario_index(), None);
    assert_eq!(record.status().label(), "errored");
    assert!(only_context(&run.records).message.contains("no db"));
}

#[rstest]
fn before_scenario_skip_records_a_skip_and_moves_on(steps: StepRegistry<Trace>) {
    let hooks = failing_hook(Timing::Before, Stage::Scenario, StepError::skip("later"));
    let text = "\
Feature: Sample
  Scenario: First
    Given step one
  Scenario: Second
    Given step two
";
    let run = run(text, &steps, &hooks);
    assert!(run.trace.is_empty());
    assert_eq!(labels(&run.records), ["skipped", "skipped"]);
}

#[rstest]
fn before_step_error_names_the_step(steps: StepRegistry<Trace>) {
    let hooks = failing_hook(Timing::Before, Stage::Step, StepError::failure("nope"));
    let run = run(TWO_STEPS, &steps, &hooks);
    let context = only_context(&run.records);
    assert_eq!(context.failed_step.as_deref(), Some("Given step one"));
    assert!(context.completed_steps.is_empty());
    assert_eq!(labels(&run.records), ["errored"]);
}

#[rstest]
fn panicking_hook_is_an_error(steps: StepRegistry<Trace>) {
    let mut hooks = HookRegistry::<Trace>::new();
    hooks.on(Timing::After, Stage::Scenario, |_| panic!("cleanup exploded"));
    let run = run(TWO_STEPS, &steps, &hooks);
    assert_eq!(labels(&run.records), ["errored"]);
    assert!(only_context(&run.records).message.contains("cleanup exploded"));
    assert_eq!(run.trace, ["step one", "step two"]);
}

#[rstest]
fn failure_hooks_see_the_failure_and_cannot_replace_it(steps: StepRegistry<Trace>) {
    let mut hooks = HookRegistry::<Trace>::new();
    hooks.on(Timing::After, Stage::Failure, |ctx| {
        let step = ctx
            .failure()
            .and_then(|failure| failure.failed_step.clone())
            .unwrap_or_default();
        ctx.world_mut().push(format!("saw {step}"));
        Err(StepError::error("hook broke too"))
    });
    let text = "\
Feature: Sample
  Scenario: Breaks
    Given a failing step
";
    let run = run(text, &steps, &hooks);
    assert_eq!(run.trace, ["saw Given a failing step"]);
    assert_eq!(labels(&run.records), ["failed"]);
    assert_eq!(only_context(&run.records).message, "expected 3");
}

#[rstest]
fn check_only_reports_unmatched_steps_without_running(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
) {
    let text = "\
Feature: Sample
  Scenario: Partly known
    Given step one
    When something unknown happens
  Scenario Outline: Rows
    Given record <x>
    Then <missing> is unknown
    Examples:
      | x |
      | 1 |
";
    let feature = feature(text);
    let config = RunConfig::default().with_check_only(true);
    let run = run_with(&FeatureRunner::new(&feature, &steps, &hooks).with_config(&config));
    assert!(run.trace.is_empty());
    let context = only_context(&run.records);
    assert!(context.message.starts_with("Unmatched steps:"));
    assert!(context.message.contains("When something unknown happens"));
    assert!(context.message.contains("\"missing\" missing from outline example"));
    assert!(!context.message.contains("step one"));
}

#[rstest]
fn check_only_with_every_step_known_reports_nothing(
    steps: StepRegistry<Trace>,
    hooks: HookRegistry<Trace>,
) {
    let feature = feature(TWO_STEPS);
    let config = RunConfig::default().with_check_only(true);
    let run = run_with(&FeatureRunner::new(&feature, &steps, &hooks).with_config(&config));
    assert!(run.records.is_empty());
    assert!(run.trace.is_empty());
    assert_eq!(run.result.map(|s| s.total()), Ok(0));
}
