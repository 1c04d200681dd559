use anyhow::Result;
use clap::Parser;
use esbuild_manifest::cli::ManifestCommands;
use tracing_subscriber::EnvFilter;

/// Map esbuild entry points to their emitted output files.
#[derive(Parser, Debug)]
#[command(name = "esbuild-manifest", version, about)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: ManifestCommands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli.command.run().await
}
