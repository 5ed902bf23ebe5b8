//! Error type returned by step handlers and hooks.
//!
//! Handlers report how they ended through [`StepError`] rather than by
//! unwinding. A panic inside a step handler is still accepted and treated as
//! an assertion failure, so `assert!` and friends work as expected.

use std::fmt;

use thiserror::Error;

/// How a step handler or hook stopped short of success.
///
/// # Examples
/// ```
/// use trellis_bdd::StepError;
///
/// let err = StepError::skip("not on this platform");
/// assert!(err.is_skip());
/// assert_eq!(err.to_string(), "skipped: not on this platform");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StepError {
    /// An expectation did not hold. Reported as a failure.
    #[error("{message}")]
    Failure {
        /// Description of the broken expectation.
        message: String,
    },
    /// Something unexpected went wrong. Reported as an error.
    #[error("{message}")]
    Error {
        /// Description of the problem.
        message: String,
    },
    /// The scenario should not run to completion. Reported as skipped.
    #[error("skipped: {reason}")]
    Skip {
        /// Why the scenario was skipped.
        reason: String,
    },
    /// The whole run must stop now. Never recorded as an outcome.
    #[error("run interrupted")]
    Interrupted,
}

impl StepError {
    /// Build a [`StepError::Failure`].
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Build a [`StepError::Error`] from anything displayable.
    ///
    /// This makes `.map_err(StepError::error)?` convenient inside handlers.
    #[must_use]
    pub fn error(message: impl fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    /// Build a [`StepError::Skip`].
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }

    /// Whether this is a skip request.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// Whether this is an interrupt.
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
