//! # keylessons: Extract key lessons from a book
//!
//! Thin entrypoint for the `keylessons` command-line interface. All logic lives in
//! the `keylessons_cli` library crate.

use anyhow::Result;
use clap::Parser;
use keylessons_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration from `.env`, if present
    dotenvy::dotenv().ok();

    // 2. Setup logging. Logs go to stderr so stdout only carries results.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("keylessons=info".parse()?))
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 3. Parse CLI arguments
    let cli = Cli::parse();

    // 4. Run the command
    if let Err(e) = run(cli).await {
        eprintln!("[keylessons error] {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
