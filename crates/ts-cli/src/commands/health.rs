//! `ts health` command implementation

use colored::Colorize;

use crate::api::defaults;
use crate::error::{CliError, Result};

/// Check that the server answers on `/health`
pub async fn run() -> Result<()> {
    let client = defaults::shared()?;

    if client.health_check().await? {
        println!("{} Server at {} is healthy", "✓".green(), client.base_url());
        Ok(())
    } else {
        Err(CliError::api(format!("server at {} is not reachable", client.base_url())))
    }
}
