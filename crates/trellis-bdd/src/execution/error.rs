//! Errors that end a feature run without an outcome.

use thiserror::Error;

/// Why a feature run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RunError {
    /// A step or hook requested an interrupt.
    ///
    /// No outcome is reported for the interrupted run and no further hooks
    /// execute.
    #[error("feature run interrupted")]
    Interrupted,
}
