//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod app;
pub mod force_download;
pub mod health;
pub mod item;
pub mod schedule;
