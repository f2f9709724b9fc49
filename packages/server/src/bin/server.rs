//! Multi-room chat relay server.
//!
//! Accepts newline-delimited text connections, tracks rooms and presence,
//! and relays chat, typing, reactions and receipts.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin serambi-server
//! cargo run --bin serambi-server -- --host 127.0.0.1 --port 12345 --http-port 8080
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use serambi_server::{
    ServerConfig,
    config::DEFAULT_PORT,
    domain::entity::DEFAULT_HISTORY_CAPACITY,
    ui::{AppState, Server},
};
use serambi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "serambi-server")]
#[command(about = "Multi-room chat relay over a line-delimited TCP protocol", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number of the chat listener
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Also serve the HTTP status API on this port
    #[arg(long)]
    http_port: Option<u16>,

    /// Directory where shared files are stored
    #[arg(long, default_value = "uploads")]
    uploads_dir: PathBuf,

    /// Number of frames kept per room
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY, value_parser = parse_history_capacity)]
    history_capacity: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

fn parse_history_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("history capacity must be at least 1".to_string()),
        Ok(capacity) => Ok(capacity),
        Err(e) => Err(e.to_string()),
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            http_port: args.http_port,
            uploads_dir: args.uploads_dir,
            history_capacity: args.history_capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    tracing::debug!("Starting with {:?}", config);

    let state = Arc::new(AppState::new(&config));
    let server = Server::new(state);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
