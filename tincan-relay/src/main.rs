use anyhow::Result;
use axum::{Router, routing::get};
use clap::Parser;
use std::net::SocketAddr;
use tracing::{Level, info};

use tincan_relay::{Relay, RelayConfig, ws_handler};

#[derive(Parser)]
#[command(name = "tincan-relay")]
#[command(about = "Signaling relay for pairwise peer-to-peer audio calls")]
struct Args {
    /// Address the WebSocket endpoint listens on.
    #[arg(long, default_value = "0.0.0.0:3198")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let config = RelayConfig {
        listen_addr: args.listen,
        ..RelayConfig::default()
    };

    let relay = Relay::new(&config);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(relay);

    info!("Relay listening on http://{}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
