mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use courier_channels::{RelayContext, TelegramRelay};
use courier_core::Uploader;
use courier_metrics::RelayMetrics;
use courier_uploader::ImmichClient;

use config::Config;

#[derive(Parser)]
#[command(name = "immich-courier")]
#[command(about = "immich-courier — relay Telegram media into Immich")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay: Telegram listener plus the metrics sidecar
    Serve {
        /// Port for the health/metrics sidecar (overrides METRICS_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Probe a running relay's readiness endpoint
    Status {
        /// Port the sidecar listens on (overrides METRICS_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let mut config = Config::from_env()?;
            if let Some(port) = port {
                config.metrics_port = port;
            }

            // Initialize structured logging
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
                )
                .json()
                .init();

            run(config).await?;
        }
        Commands::Status { port } => {
            let port = port.unwrap_or_else(config::metrics_port);
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/readyz", port))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    println!("immich-courier is up ({})", resp.text().await?);
                }
                Ok(resp) => {
                    println!("immich-courier responded with status {}", resp.status());
                }
                Err(_) => {
                    println!("immich-courier is not running on port {}", port);
                }
            }
        }
    }

    Ok(())
}

async fn run(config: Config) -> Result<()> {
    info!(
        metrics_port = config.metrics_port,
        server = %config.immich_server,
        "Starting immich-courier"
    );
    if let Some(ids) = &config.allowed_chat_ids {
        info!("Allow-list active for {} chat(s)", ids.len());
    }

    let metrics = RelayMetrics::new()?;

    // The sidecar runs on its own task; failing to bind it is fatal.
    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let sidecar = metrics.clone();
    tokio::spawn(async move {
        if let Err(e) = courier_metrics::serve(addr, sidecar).await {
            error!("Metrics server failed: {}", e);
            std::process::exit(1);
        }
    });

    let uploader: Arc<dyn Uploader> =
        Arc::new(ImmichClient::new(&config.immich_server, &config.immich_token));
    let ctx = Arc::new(RelayContext::new(
        uploader,
        metrics,
        config.allowed_chat_ids,
    ));

    TelegramRelay::new(&config.telegram_bot_token, ctx).run().await;

    Ok(())
}
