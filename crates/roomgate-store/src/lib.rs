//! Room aggregate and persistence contract for Roomgate.
//!
//! # Key types
//!
//! - [`Room`] / [`RoomUser`]: the aggregate and its members
//! - [`NewRoom`]: everything needed to open a room
//! - [`RoomStore`]: the storage contract the registry depends on
//! - [`InMemoryRoomStore`]: a reference store for tests and single-process
//!   deployments
//!
//! The store is the only place rooms are durable. It must detect stale
//! writes through [`Room::version`] and enforce join-code uniqueness; the
//! registry builds its admission guarantees on those two checks.

mod error;
mod memory;
mod room;
mod store;

pub use error::StoreError;
pub use memory::InMemoryRoomStore;
pub use room::{NewRoom, Room, RoomUser};
pub use store::RoomStore;
