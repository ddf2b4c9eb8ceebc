//! Mount-point classifier
//!
//! Composes the gateway's lstat, readlink and existence primitives.

mod classifier;

pub use classifier::is_mount_point;
