use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clinicflow_server::{create_app, ClinicServer, ServerConfig};

/// ClinicFlow Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "clinicflow-server")]
#[command(about = "Booking and payment ledger HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed demo accounts and catalog items on startup
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose);

    info!("🏥 Starting ClinicFlow Engine HTTP server");
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig {
        name: "ClinicFlow Engine".to_string(),
        seed_demo_data: args.seed_demo,
    };
    let server = ClinicServer::from_env(config).await?;
    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("🚀 ClinicFlow Engine server running on http://{addr}");
    info!("📋 Health check available at: http://{addr}/health");
    info!("📋 API v1 available at: http://{addr}/api/v1");

    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
