//! End-to-end scenarios over the page objects, and the runner that executes
//! them with per-test setup, teardown and failure screenshots.

pub mod catalog;
pub mod context;
pub mod runner;
pub mod scenario_model;
