//! Diagnostic tooling for `trellis-bdd` feature files.
//!
//! This library powers the `cargo trellis` command. It lists the scenarios
//! of feature files together with their selective-run addresses and checks
//! documents for structural problems before any step runs.

pub mod cli;
pub mod config;
pub mod logging;
mod output;
