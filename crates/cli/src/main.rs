use anyhow::Result;
use clap::Parser;
use rulegen_cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var; stdout carries build files
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().execute()
}
