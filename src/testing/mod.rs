//! Scenario runner
//!
//! Reads YAML scenarios describing user actions (navigate, click, choose a
//! file, submit) and expectations, and replays them against the mock store.

mod config;
mod runner;

pub use config::*;
pub use runner::{load_scenario, parse_scenario, run, run_scenario, TestResult};
