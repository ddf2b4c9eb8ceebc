//! Error handling
//!
//! Defines error types and handling for the proxy.

pub mod handlers;
pub mod types;

pub use types::*;
