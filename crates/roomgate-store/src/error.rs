//! Error types for the storage layer.

use roomgate_types::{JoinCode, RoomId};

/// Errors a [`RoomStore`](crate::RoomStore) can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write was based on a stale version of the room.
    ///
    /// `expected` is the version the writer read; `actual` is what the
    /// store holds now (0 if the room does not exist).
    #[error("room {room_id} changed underneath the writer (expected version {expected}, found {actual})")]
    ConcurrentModification {
        room_id: RoomId,
        expected: u64,
        actual: u64,
    },

    /// Another room already owns this join code.
    #[error("join code {0} is already in use")]
    DuplicateJoinCode(JoinCode),

    /// The backing technology failed (connection lost, corrupt row, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}
