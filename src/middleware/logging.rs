//! Logging middleware
//!
//! Provides request logging functionality.

use log::{debug, info};
use std::net::SocketAddr;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr) {
    info!("Client connected: {}", client_addr);
}

/// Log a client request
pub fn log_request(client_addr: &SocketAddr, request: &str) {
    debug!("Client {} requested: {}", client_addr, request);
}

pub fn log_disconnect(client_addr: &SocketAddr) {
    info!("Client {} disconnected", client_addr);
}
