//! Train Search CLI - Main entry point

use clap::Parser;
use std::process;
use tracing::error;
use ts_cli::api::defaults;
use ts_cli::{Cli, Commands};
use ts_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("ts-cli".to_string())
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(command, cli.server_url).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(command: Commands, server_url: String) -> ts_cli::Result<()> {
    use ts_cli::commands;

    match command {
        Commands::App { output } => commands::app::run(server_url, output).await,
        Commands::Schedule { date, json } => {
            defaults::configure(&server_url)?;
            commands::schedule::run(date, json).await
        },
        Commands::ForceDownload { date } => {
            defaults::configure(&server_url)?;
            commands::force_download::run(date).await
        },
        Commands::Item { item_id, q } => {
            defaults::configure(&server_url)?;
            commands::item::run(item_id, q).await
        },
        Commands::Health => {
            defaults::configure(&server_url)?;
            commands::health::run().await
        },
    }
}
