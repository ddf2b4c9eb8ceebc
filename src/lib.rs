//! Host filesystem proxy
//!
//! Performs privileged filesystem operations on behalf of a less-privileged
//! local caller. Every request passes path checks and the preconditions of
//! its operation before a single call reaches the host filesystem.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mediation;
pub mod middleware;
pub mod mount;
pub mod protocol;
pub mod server;
pub mod validation;

pub use client::ProxyClient;
pub use config::ServerConfig;
pub use mediation::FsProxy;
pub use server::Server;
