//! Terminal chat client for the Serambi relay.
//!
//! Sends the username as the handshake line, then plain lines as chat and
//! slash commands (`/create`, `/join`, `/switch`, `/file`, ...) as protocol
//! frames. Automatically reconnects on disconnection (max 5 attempts with
//! 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin serambi-client -- --username alice
//! cargo run --bin serambi-client -- -u bob -a 127.0.0.1:12345
//! ```

use clap::Parser;

use serambi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "serambi-client")]
#[command(about = "Terminal client for the Serambi chat relay", long_about = None)]
struct Args {
    /// Username announced to the server
    #[arg(short = 'u', long)]
    username: String,

    /// Address of the chat relay
    #[arg(short = 'a', long, default_value = "127.0.0.1:12345")]
    addr: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = serambi_client::run_client(args.addr, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
