//! Wire protocol
//!
//! Line-oriented requests, one response line per request.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Request, parse_request};
pub use handlers::{RequestResult, ResponseStatus, handle_line, handle_request};
