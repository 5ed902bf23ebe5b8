//! Per-run execution context handed to step handlers and hooks.
//!
//! A context is created when a scenario run starts and dropped when it ends.
//! It borrows the caller's world mutably for that time and records where the
//! run has got to: the scenario, the step being executed, and the steps that
//! already completed. Feature hooks receive a context with no scenario.

use crate::execution::FailureContext;

/// Position of the running scenario within its feature.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScenarioSlot {
    index: usize,
    name: String,
}

/// Mutable state of one scenario run.
///
/// # Examples
/// ```
/// use trellis_bdd::ExecutionContext;
///
/// let mut total = 0_i64;
/// let mut ctx = ExecutionContext::new(&mut total, "Arithmetic").with_scenario(0, "Addition");
/// *ctx.world_mut() += 2;
/// assert_eq!(ctx.scenario_name(), Some("Addition"));
/// assert_eq!(*ctx.world(), 2);
/// ```
#[derive(Debug)]
pub struct ExecutionContext<'w, W> {
    world: &'w mut W,
    feature_name: String,
    scenario: Option<ScenarioSlot>,
    current_step: Option<String>,
    current_step_handler: Option<String>,
    completed_steps: Vec<String>,
    failure: Option<FailureContext>,
}

impl<'w, W> ExecutionContext<'w, W> {
    /// Create a feature-level context with no scenario.
    pub fn new(world: &'w mut W, feature_name: impl Into<String>) -> Self {
        Self {
            world,
            feature_name: feature_name.into(),
            scenario: None,
            current_step: None,
            current_step_handler: None,
            completed_steps: Vec::new(),
            failure: None,
        }
    }

    /// Attach the scenario this context runs.
    #[must_use]
    pub fn with_scenario(mut self, index: usize, name: impl Into<String>) -> Self {
        self.scenario = Some(ScenarioSlot {
            index,
            name: name.into(),
        });
        self
    }

    /// Shared access to the world.
    #[must_use]
    pub fn world(&self) -> &W {
        self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut W {
        self.world
    }

    /// Name of the feature being run.
    #[must_use]
    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    /// Zero-based index of the running scenario.
    #[must_use]
    pub fn scenario_index(&self) -> Option<usize> {
        self.scenario.as_ref().map(|slot| slot.index)
    }

    /// Name of the running scenario, including any example-row suffix.
    #[must_use]
    pub fn scenario_name(&self) -> Option<&str> {
        self.scenario.as_ref().map(|slot| slot.name.as_str())
    }

    /// Step currently executing, once it has been matched.
    #[must_use]
    pub fn current_step(&self) -> Option<&str> {
        self.current_step.as_deref()
    }

    /// Name of the definition handling the current step.
    #[must_use]
    pub fn current_step_handler(&self) -> Option<&str> {
        self.current_step_handler.as_deref()
    }

    /// Steps that completed, in execution order.
    #[must_use]
    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    /// Diagnosis of the failure or error being handled.
    ///
    /// Only set while `after` failure and error hooks run.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureContext> {
        self.failure.as_ref()
    }

    pub(crate) fn begin_step(&mut self, step: &str, handler: &str) {
        self.current_step = Some(step.to_string());
        self.current_step_handler = Some(handler.to_string());
    }

    pub(crate) fn complete_step(&mut self, step: &str) {
        self.completed_steps.push(step.to_string());
    }

    pub(crate) fn set_failure(&mut self, failure: FailureContext) {
        self.failure = Some(failure);
    }
}
