//! Error types for the admission layer.

use roomgate_store::StoreError;
use roomgate_types::{GameStatus, JoinCode, RoomId, RoomRef, UserId};

/// Errors that can occur during room operations.
///
/// Every variant is scoped to a single request; none of them means the
/// registry itself is broken.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room matches the given id or join code.
    #[error("room {0} not found")]
    NotFound(RoomRef),

    /// The room is at capacity.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The room has left `Open`, so membership is frozen.
    #[error("room {room_id} is not open (status {status})")]
    NotOpen { room_id: RoomId, status: GameStatus },

    /// The room is password-protected and no password was given.
    #[error("room {0} requires a password")]
    PasswordRequired(RoomId),

    /// The given password does not match the room's.
    #[error("wrong password for room {0}")]
    PasswordMismatch(RoomId),

    /// Another room already uses this join code.
    #[error("join code {0} is already in use")]
    DuplicateJoinCode(JoinCode),

    /// The user is already a member (under `RejoinPolicy::Reject`).
    #[error("user {0} already in room {1}")]
    AlreadyJoined(UserId, RoomId),

    /// Version conflicts persisted past the retry budget.
    #[error("room {0} kept changing concurrently, giving up")]
    ConcurrentModification(RoomId),

    /// The caller's deadline passed while waiting for the room.
    /// The user was not admitted.
    #[error("timed out waiting for room {0}")]
    Timeout(RoomRef),

    /// A status change that would skip or reverse the lifecycle.
    #[error("room {room_id} cannot move from {from} to {to}")]
    InvalidTransition {
        room_id: RoomId,
        from: GameStatus,
        to: GameStatus,
    },

    /// A host-only operation was attempted by someone else.
    #[error("user {0} is not the host of room {1}")]
    NotHost(UserId, RoomId),

    /// The request itself is malformed (empty title, bad join code, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Store(String),
}

/// Fieldless mirror of [`RoomError`], for mapping errors to status codes
/// or metrics labels without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RoomNotFound,
    RoomFull,
    RoomNotOpen,
    PasswordRequired,
    PasswordMismatch,
    DuplicateJoinCode,
    AlreadyJoined,
    ConcurrentModification,
    Timeout,
    InvalidTransition,
    NotHost,
    InvalidRequest,
    Store,
}

impl RoomError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::RoomNotFound,
            Self::RoomFull(_) => ErrorKind::RoomFull,
            Self::NotOpen { .. } => ErrorKind::RoomNotOpen,
            Self::PasswordRequired(_) => ErrorKind::PasswordRequired,
            Self::PasswordMismatch(_) => ErrorKind::PasswordMismatch,
            Self::DuplicateJoinCode(_) => ErrorKind::DuplicateJoinCode,
            Self::AlreadyJoined(..) => ErrorKind::AlreadyJoined,
            Self::ConcurrentModification(_) => {
                ErrorKind::ConcurrentModification
            }
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::NotHost(..) => ErrorKind::NotHost,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<StoreError> for RoomError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConcurrentModification { room_id, .. } => {
                Self::ConcurrentModification(room_id)
            }
            StoreError::DuplicateJoinCode(code) => Self::DuplicateJoinCode(code),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}
