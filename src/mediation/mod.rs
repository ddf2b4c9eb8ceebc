//! Request mediation layer
//!
//! Enforces validate-then-mutate ordering for externally requested
//! operations.

pub mod checks;
mod operations;

pub use checks::check_request_path;
pub use operations::FsProxy;
