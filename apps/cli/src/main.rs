//! seopress CLI: enrich content records with generated SEO metadata.
//!
//! Reads a normalized content record, runs the enrichment orchestrator
//! against the configured generation providers, and writes the enriched
//! record as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
