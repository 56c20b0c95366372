//! Match lobby and tic-tac-toe session server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin matchroom-server
//! cargo run --bin matchroom-server -- --host 0.0.0.0 --port 3000 --exit-grace-ms 250
//! ```

use std::time::Duration;

use clap::Parser;
use matchroom_server::{config::ServerConfig, ui::Server};
use matchroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "matchroom-server")]
#[command(about = "Tic-tac-toe match lobby server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Grace interval in milliseconds between match end and session teardown
    #[arg(long, default_value = "100")]
    exit_grace_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            exit_grace: Duration::from_millis(args.exit_grace_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    let server = Server::new(&config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
