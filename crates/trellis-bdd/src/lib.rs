//! Core library for `trellis-bdd`.
//!
//! The crate reads indentation-structured feature documents, matches their
//! step lines against an explicit registry of step definitions, and runs them
//! through a staged execution machine with lifecycle hooks.
//!
//! A typical run:
//!
//! 1. Load a [`Feature`] from disk or text. Structural problems surface here,
//!    before anything executes.
//! 2. Register handlers in a [`StepRegistry`] and callbacks in a
//!    [`HookRegistry`].
//! 3. Drive the feature with a [`FeatureRunner`], reporting every scenario
//!    run to a [`reporting::Reporter`].

mod context;
mod delimited;
mod examples;
mod feature;
mod hooks;
mod panic;
mod registry;
mod step_args;
mod types;

pub mod config;
pub mod execution;
pub mod parsing;
pub mod reporting;
pub mod selection;
pub mod template;

pub use context::ExecutionContext;
pub use delimited::DelimitedError;
pub use examples::{ExampleRow, ExampleTable, ExampleTableError};
pub use execution::{FailureContext, FeatureRunner, Outcome, RunError, RunSummary};
pub use feature::{Feature, FeatureError, Scenario, UnmatchedStep};
pub use hooks::{
    HookDefinition, HookFailure, HookFn, HookRegistrationError, HookRegistry, Stage, Timing,
};
pub use panic::panic_message;
pub use registry::{MatchError, StepDefinition, StepFn, StepMatch, StepRegistry};
pub use step_args::StepArguments;
pub use template::SubstitutionError;
pub use trellis_bdd_patterns::{Multiline, PatternError, StepKeyword};
pub use types::StepError;
