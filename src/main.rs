mod application;
mod cli;
mod data;
mod domain;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clarity_prep=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    cli.run()
}
