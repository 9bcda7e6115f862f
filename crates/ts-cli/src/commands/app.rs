//! `ts app` command implementation
//!
//! Starts the front-end against the server and prints the mounted host page.

use std::path::PathBuf;

use colored::Colorize;

use crate::app::{self, BootstrapConfig, Document};
use crate::error::Result;

/// Bootstrap the front-end and emit the rendered page
pub async fn run(server_url: String, output: Option<PathBuf>) -> Result<()> {
    let mut document = Document::host_page();
    let config = BootstrapConfig::default().with_base_url(server_url);

    let started = app::start(&mut document, &config)?;
    let html = document.to_html();

    match output {
        Some(path) => {
            tokio::fs::write(&path, html).await?;
            eprintln!(
                "{} {} mounted at #{} (API: {})",
                "✓".green(),
                "App".bold(),
                started.mount_id,
                started.client.base_url().cyan()
            );
            eprintln!("  Page written to {}", path.display());
        },
        None => print!("{}", html),
    }

    Ok(())
}
