//! fs-proxy - Entry Point
//!
//! Serves host filesystem operations to local, less-privileged callers.

use log::{error, info};

use fs_proxy::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching filesystem proxy...");

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };
    server.start().await;
}
