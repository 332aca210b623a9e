//! Concurrency-safe room admission for Roomgate.
//!
//! Every room changes only through the [`RoomRegistry`]. It serializes
//! mutations per room and retries on optimistic-version conflicts, so
//! no room ever exceeds its capacity no matter how many users race for
//! the last slot.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates rooms, admits users, drives status changes
//! - [`RegistryConfig`]: capacity, retry budget, timeouts, and policies
//! - [`RejoinPolicy`] / [`JoinCodePasswordPolicy`]: how the admission
//!   checks handle repeat joins and join-by-code
//! - [`RoomError`] / [`ErrorKind`]: failure outcomes

mod config;
mod error;
mod registry;

pub use config::{JoinCodePasswordPolicy, RegistryConfig, RejoinPolicy};
pub use error::{ErrorKind, RoomError};
pub use registry::RoomRegistry;
