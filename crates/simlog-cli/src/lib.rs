//! simlog CLI: library crate behind the `simlog` binary.
//!
//! Exposes config loading and the run driver so `simlog-e2e-tests` can
//! exercise the same code paths as the binary.

pub mod config;
pub mod run;
