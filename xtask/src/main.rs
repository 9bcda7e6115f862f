//! Build automation tasks for Train Search
//!
//! - Generate the `ts` CLI reference from the clap definitions
//! - Write the static host page the front-end is mounted into

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for Train Search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },

    /// Write the empty host page with its `#app` mount point
    GenerateHostPage {
        #[arg(short, long, default_value = "public/index.html")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
        Command::GenerateHostPage { output } => generate_host_page(&output)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<ts_cli::Cli>();

    let content = format!(
        r#"# Train Search CLI Reference

Generated from the CLI source code on {}.

The `ts` client talks to the Train Search server (default `http://localhost:8899`).

## Quick Start

```bash
# Start the server (serves /json/<YYYYMMDD>, /force-download, /items/<id>)
cargo run -p ts-server

# Print the bootstrapped front-end page
ts app

# Show a day's timetable
ts schedule 20250318

# Re-fetch one day from upstream
ts force-download --date 20250318
```

## Commands

{}

## Environment Variables

- `TS_SERVER_URL` - Server base URL (default: `http://localhost:8899`)
- `TS_API_TIMEOUT_SECS` - Request timeout in seconds (default: `120`)
- `LOG_LEVEL` - Logging level (`trace`, `debug`, `info`, `warn`, `error`)

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());
    Ok(())
}

fn generate_host_page(output: &str) -> anyhow::Result<()> {
    let path = PathBuf::from(output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, ts_cli::app::Document::host_page().to_html())?;

    println!("✅ Wrote host page to: {}", path.display());
    Ok(())
}
