//! The storage contract the admission engine depends on.
//!
//! Roomgate does not pick a database. Postgres, Redis, DynamoDB, or a
//! plain map all work, as long as the implementation honours two rules:
//!
//! 1. **Versioned writes**: `save` succeeds only if the room's
//!    [`version`](Room::version) equals the stored version (0 for a room
//!    that doesn't exist yet). On success the stored and returned room
//!    carry `version + 1`. Otherwise it fails with
//!    [`StoreError::ConcurrentModification`].
//! 2. **Unique join codes**: inserting a room whose join code is already
//!    taken fails with [`StoreError::DuplicateJoinCode`], checked
//!    atomically with the insert.
//!
//! Everything else (retention, indexing, replication) is up to the store.

use std::future::Future;

use roomgate_types::{JoinCode, RoomId};

use crate::{Room, StoreError};

/// Durable keyed storage for [`Room`] aggregates.
///
/// # Trait bounds
///
/// - `Send + Sync`: one store is shared by every request task.
/// - `'static`: it lives as long as the registry that owns it.
///
/// Methods return `impl Future + Send` so the registry's futures stay
/// `Send` and can be spawned onto a multi-threaded runtime. Implementors
/// can still write plain `async fn`s.
pub trait RoomStore: Send + Sync + 'static {
    /// Creates or updates a room, enforcing the version check.
    ///
    /// # Returns
    /// - `Ok(room)`: the committed room, with its version bumped
    /// - `Err(StoreError::ConcurrentModification)`: stale write
    /// - `Err(StoreError::DuplicateJoinCode)`: new room, code taken
    fn save(
        &self,
        room: Room,
    ) -> impl Future<Output = Result<Room, StoreError>> + Send;

    /// Loads a room by id.
    fn find_by_id(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<Room>, StoreError>> + Send;

    /// Loads a room by its (normalized) join code.
    fn find_by_join_code(
        &self,
        code: &JoinCode,
    ) -> impl Future<Output = Result<Option<Room>, StoreError>> + Send;

    /// Loads every room, in the store's iteration order.
    fn find_all(
        &self,
    ) -> impl Future<Output = Result<Vec<Room>, StoreError>> + Send;
}
