//! Lifecycle hooks.
//!
//! A hook is a callback attached to one or more `(timing, stage)` points.
//! The execution machine asks the registry to run every hook attached to a
//! point, in registration order, and stops at the first one that fails.

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

use crate::{ExecutionContext, StepError};

/// Signature shared by all hooks.
pub type HookFn<W> = dyn Fn(&mut ExecutionContext<'_, W>) -> Result<(), StepError>;

/// Whether a hook runs before or after its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    /// Runs before the stage.
    Before,
    /// Runs after the stage.
    After,
}

/// The part of a run a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Once around all scenarios of a feature.
    Feature,
    /// Around each scenario run, each example row included.
    Scenario,
    /// Around each step.
    Step,
    /// After a scenario run ends in an error.
    Error,
    /// After a scenario run ends in a failure.
    Failure,
}

impl Timing {
    /// Lowercase name of the timing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl Stage {
    /// Lowercase name of the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Scenario => "scenario",
            Self::Step => "step",
            Self::Error => "error",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a hook names an unknown timing or stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HookRegistrationError {
    /// Timing other than `before` or `after`.
    #[error("invalid hook timing '{0}': expected 'before' or 'after'")]
    InvalidTiming(String),
    /// Stage other than `feature`, `scenario`, `step`, `error` or `failure`.
    #[error("invalid hook stage '{0}': expected one of feature, scenario, step, error, failure")]
    InvalidStage(String),
}

impl FromStr for Timing {
    type Err = HookRegistrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(HookRegistrationError::InvalidTiming(other.to_string())),
        }
    }
}

impl FromStr for Stage {
    type Err = HookRegistrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "feature" => Ok(Self::Feature),
            "scenario" => Ok(Self::Scenario),
            "step" => Ok(Self::Step),
            "error" => Ok(Self::Error),
            "failure" => Ok(Self::Failure),
            other => Err(HookRegistrationError::InvalidStage(other.to_string())),
        }
    }
}

/// A hook callback and the points it is attached to.
pub struct HookDefinition<W> {
    name: String,
    points: Vec<(Timing, Stage)>,
    handler: Box<HookFn<W>>,
}

impl<W> HookDefinition<W> {
    /// Create a hook attached to no point yet.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_, W>) -> Result<(), StepError> + 'static,
    {
        Self {
            name: name.into(),
            points: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Attach the hook to another point.
    #[must_use]
    pub fn at(mut self, timing: Timing, stage: Stage) -> Self {
        if !self.points.contains(&(timing, stage)) {
            self.points.push((timing, stage));
        }
        self
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the hook is attached to `(timing, stage)`.
    #[must_use]
    pub fn runs_at(&self, timing: Timing, stage: Stage) -> bool {
        self.points.contains(&(timing, stage))
    }
}

impl<W> fmt::Debug for HookDefinition<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDefinition")
            .field("name", &self.name)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

/// A hook that did not return `Ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    /// Name of the failing hook.
    pub hook: String,
    /// Point the hook ran at.
    pub timing: Timing,
    /// Point the hook ran at.
    pub stage: Stage,
    /// What the hook returned, or the panic it raised as an error.
    pub error: StepError,
}

/// Ordered collection of hooks.
///
/// # Examples
/// ```
/// use trellis_bdd::{ExecutionContext, HookRegistry, Stage, Timing};
///
/// let mut hooks = HookRegistry::<Vec<String>>::new();
/// hooks.on(Timing::Before, Stage::Scenario, |ctx| {
///     ctx.world_mut().push("before scenario".to_string());
///     Ok(())
/// });
/// assert!(hooks.hook("during", "scenario", |_| Ok(())).is_err());
///
/// let mut log = Vec::new();
/// let mut ctx = ExecutionContext::new(&mut log, "F");
/// assert!(hooks.run(&mut ctx, Timing::Before, Stage::Scenario).is_ok());
/// assert_eq!(log, ["before scenario"]);
/// ```
#[derive(Debug)]
pub struct HookRegistry<W> {
    hooks: Vec<HookDefinition<W>>,
}

impl<W> Default for HookRegistry<W> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<W> HookRegistry<W> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully built hook.
    pub fn register(&mut self, hook: HookDefinition<W>) -> &mut Self {
        self.hooks.push(hook);
        self
    }

    /// Register a hook for a single point.
    pub fn on<F>(&mut self, timing: Timing, stage: Stage, handler: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext<'_, W>) -> Result<(), StepError> + 'static,
    {
        let name = format!("{timing}:{stage}#{}", self.hooks.len());
        self.register(HookDefinition::new(name, handler).at(timing, stage))
    }

    /// Register a hook for a point named by strings.
    ///
    /// # Errors
    /// Returns [`HookRegistrationError`] when `timing` or `stage` is not a
    /// known name. Nothing is registered in that case.
    pub fn hook<F>(
        &mut self,
        timing: &str,
        stage: &str,
        handler: F,
    ) -> Result<&mut Self, HookRegistrationError>
    where
        F: Fn(&mut ExecutionContext<'_, W>) -> Result<(), StepError> + 'static,
    {
        let timing = timing.parse()?;
        let stage = stage.parse()?;
        Ok(self.on(timing, stage, handler))
    }

    /// Run every hook attached to `(timing, stage)` in registration order.
    ///
    /// Panics raised by a hook are caught and returned as
    /// [`StepError::Error`].
    ///
    /// # Errors
    /// Returns the first [`HookFailure`]; later hooks do not run.
    pub fn run(
        &self,
        ctx: &mut ExecutionContext<'_, W>,
        timing: Timing,
        stage: Stage,
    ) -> Result<(), HookFailure> {
        for hook in self.hooks.iter().filter(|hook| hook.runs_at(timing, stage)) {
            debug!("running hook `{}` at {timing}:{stage}", hook.name);
            let result = crate::panic::catch_panic(|| (hook.handler)(ctx))
                .unwrap_or_else(|message| Err(StepError::Error { message }));
            if let Err(error) = result {
                return Err(HookFailure {
                    hook: hook.name.clone(),
                    timing,
                    stage,
                    error,
                });
            }
        }
        Ok(())
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
