//! Command-line tooling for the annotation dataset.

pub mod checker_run;
pub mod config;

pub use checker_run::{run_sanity_checks, RunOptions};
pub use config::load_checker_config;
