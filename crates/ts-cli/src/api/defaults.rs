//! Process-wide shared client
//!
//! The shared client's base address is written once, before the first
//! request, and never changes afterwards. Code that issues requests calls
//! [`shared`] instead of threading a client through every call.

use std::sync::OnceLock;

use crate::api::ApiClient;
use crate::error::{CliError, Result};

/// Holder for a set-once shared [`ApiClient`]
#[derive(Debug, Default)]
pub struct HttpDefaults {
    client: OnceLock<ApiClient>,
}

impl HttpDefaults {
    pub const fn new() -> Self {
        Self {
            client: OnceLock::new(),
        }
    }

    /// Set the base address. Fails if it has already been set.
    pub fn configure(&self, base_url: &str) -> Result<&ApiClient> {
        let client = ApiClient::new(base_url)?;

        // A concurrent or repeated call loses; the first address stays.
        let mut installed = false;
        let shared = self.client.get_or_init(|| {
            installed = true;
            client
        });

        if installed {
            tracing::debug!(base_url = %shared.base_url(), "Configured shared HTTP client");
            Ok(shared)
        } else {
            Err(CliError::AlreadyConfigured(shared.base_url().to_string()))
        }
    }

    /// The shared client, once configured
    pub fn client(&self) -> Result<&ApiClient> {
        self.client.get().ok_or(CliError::NotConfigured)
    }

    /// The configured base address, if any
    pub fn base_url(&self) -> Option<&str> {
        self.client.get().map(ApiClient::base_url)
    }
}

static DEFAULTS: HttpDefaults = HttpDefaults::new();

/// The process-global defaults
pub fn global() -> &'static HttpDefaults {
    &DEFAULTS
}

/// Set the process-global base address
pub fn configure(base_url: &str) -> Result<&'static ApiClient> {
    DEFAULTS.configure(base_url)
}

/// The process-global shared client
pub fn shared() -> Result<&'static ApiClient> {
    DEFAULTS.client()
}
