//! Shared step-pattern utilities for trellis-bdd.
//!
//! Step definitions are written as regular expressions that match the text
//! after a step keyword. This crate owns the pieces both the runtime and the
//! command-line tooling need: the keyword vocabulary, the compiler that adds
//! the keyword lead-in and optional multiline tail, and the helpers that
//! classify and extract capture groups.

mod capture;
mod errors;
mod keyword;
mod pattern;

pub use capture::{CaptureKind, extract_captured_values, extract_named_values};
pub use errors::PatternError;
pub use keyword::{StepKeyword, StepKeywordParseError, split_keyword};
pub use pattern::{KEYWORD_LEAD_IN, Multiline, build_regex_source, compile_step_pattern};
