//! Front-end bootstrap
//!
//! Startup runs three steps, in order:
//!
//! 1. Point the shared HTTP client at the Train Search server
//! 2. Build the root [`App`] component
//! 3. Mount it at the configured element of the host [`Document`]
//!
//! The base address is written before the root component exists, so every
//! request issued from the component tree resolves against it.

pub mod component;
pub mod document;

pub use component::{App, Component};
pub use document::{Document, Element};

use crate::api::{defaults, ApiClient, HttpDefaults, DEFAULT_BASE_URL};
use crate::error::Result;

/// Selector of the element the root component is mounted into
pub const DEFAULT_MOUNT_SELECTOR: &str = "#app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub base_url: String,
    pub mount_selector: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mount_selector: DEFAULT_MOUNT_SELECTOR.to_string(),
        }
    }
}

impl BootstrapConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A started front-end
#[derive(Debug)]
pub struct Bootstrapped<'a> {
    pub client: &'a ApiClient,
    pub root: App,
    /// Id of the element the root is mounted into
    pub mount_id: String,
}

/// Configure `defaults`, build the root component and mount it into `document`.
///
/// Fails with `AlreadyConfigured` when `defaults` already holds an address;
/// the earlier address is kept and nothing is mounted.
pub fn bootstrap<'a>(
    defaults: &'a HttpDefaults,
    document: &mut Document,
    config: &BootstrapConfig,
) -> Result<Bootstrapped<'a>> {
    let client = defaults.configure(&config.base_url)?;

    let root = App::new(client.base_url());

    let mount_id = document.mount(&config.mount_selector, &root)?.id.clone();

    tracing::info!(
        base_url = %client.base_url(),
        mount = %config.mount_selector,
        "Front-end mounted"
    );

    Ok(Bootstrapped {
        client,
        root,
        mount_id,
    })
}

/// [`bootstrap`] against the process-global shared client
pub fn start(document: &mut Document, config: &BootstrapConfig) -> Result<Bootstrapped<'static>> {
    bootstrap(defaults::global(), document, config)
}
