//! Server middleware
//!
//! Provides connection and request logging.

pub mod logging;
