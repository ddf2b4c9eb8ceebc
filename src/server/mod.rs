//! Server core functionality
//!
//! Accepts local connections and serves proxy requests, one task per
//! connection.

pub mod connection;
pub mod core;

pub use self::core::Server;
