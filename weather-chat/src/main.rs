//! Binary crate for the `weather-chat` front-end.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the web chat page
//! - The terminal chat loop and interactive configuration

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
