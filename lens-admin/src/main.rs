use anyhow::Result;
use clap::{Parser, Subcommand};

use lens_admin::{cli, server, upstream::UpstreamArgs};

#[derive(Debug, Parser)]
#[command(name = "lens-admin")]
#[command(about = "Kafka Lens - cluster topology, metrics and partition reassignment", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    upstream: UpstreamArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// [Server] Start the HTTP API server
    #[command(alias = "server")]
    #[command(display_order = 1)]
    Serve(server::ServerArgs),

    /// [CLI] Inspect brokers
    #[command(display_order = 10)]
    Brokers(cli::brokers::Brokers),

    /// [CLI] Manage topics
    #[command(display_order = 11)]
    Topics(cli::topics::Topics),

    /// [CLI] Reassign partition replicas
    #[command(display_order = 12)]
    Reassign(cli::reassign::Reassign),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting lens-admin server");
            server::run(args, &cli.upstream).await
        }
        Commands::Brokers(cmd) => cli::brokers::handle(cmd, &cli.upstream).await,
        Commands::Topics(cmd) => cli::topics::handle(cmd, &cli.upstream).await,
        Commands::Reassign(cmd) => cli::reassign::handle(cmd, &cli.upstream).await,
    }
}
