//! Shared helpers for the feature tests.

pub mod calculator;
