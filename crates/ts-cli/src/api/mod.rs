//! API client module
//!
//! HTTP client for the Train Search server, plus the process-wide shared
//! instance configured at startup.

pub mod client;
pub mod defaults;
pub mod endpoints;
pub mod types;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use defaults::HttpDefaults;
pub use types::*;
