//! Primitive filesystem gateway
//!
//! Thin adapters exposing existence checks, directory create/remove and
//! symlink primitives as atomic operations.

pub mod api;
pub mod host;
pub mod memory;

pub use api::{EntryKind, Filesystem};
pub use host::HostFs;
pub use memory::MemoryFs;
