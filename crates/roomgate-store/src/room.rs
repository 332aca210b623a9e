//! The room aggregate and its members.

use chrono::{DateTime, Utc};
use roomgate_types::{GameStatus, JoinCode, RoomId, UserId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomUser
// ---------------------------------------------------------------------------

/// One member of a room.
///
/// The host is marked explicitly with `is_host` rather than by position
/// in the member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUser {
    pub user_id: UserId,
    pub display_name: String,
    pub is_host: bool,
    pub joined_at: DateTime<Utc>,
}

impl RoomUser {
    /// The creator's entry.
    pub fn host(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            is_host: true,
            joined_at: Utc::now(),
        }
    }

    /// A joining user's entry.
    pub fn member(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            is_host: false,
            joined_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// NewRoom
// ---------------------------------------------------------------------------

/// Everything needed to open a room.
///
/// There is no separate `has_password` flag: a room is protected exactly
/// when `password_digest` is `Some`.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub title: String,
    pub host: RoomUser,
    pub password_digest: Option<String>,
    pub join_code: JoinCode,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A bounded-capacity lobby.
///
/// Fields are private so the aggregate's invariants can only be broken
/// through the few mutators below, and those are meant for the registry
/// (membership, status) and for stores (version).
///
/// Invariants after every committed mutation:
/// - `users.len() <= capacity`
/// - at most one entry per `user_id`
/// - exactly one entry has `is_host`, and it is the first
/// - status only moves forward: `Open → InProgress → Closed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    join_code: JoinCode,
    title: String,
    password_digest: Option<String>,
    status: GameStatus,
    capacity: usize,
    users: Vec<RoomUser>,
    version: u64,
    created_at: DateTime<Utc>,
}

impl Room {
    /// Builds a fresh, unsaved room (version 0) with the host as its only
    /// member.
    pub fn open(new_room: NewRoom, capacity: usize) -> Self {
        let mut host = new_room.host;
        host.is_host = true;

        Self {
            id: RoomId::new(),
            join_code: new_room.join_code,
            title: new_room.title,
            password_digest: new_room.password_digest,
            status: GameStatus::Open,
            capacity,
            users: vec![host],
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn join_code(&self) -> &JoinCode {
        &self.join_code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns `true` if joining by id requires a password.
    pub fn has_password(&self) -> bool {
        self.password_digest.is_some()
    }

    pub fn password_digest(&self) -> Option<&str> {
        self.password_digest.as_deref()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Maximum number of members, host included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Members in join order; the host is first.
    pub fn users(&self) -> &[RoomUser] {
        &self.users
    }

    pub fn member_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_full(&self) -> bool {
        self.users.len() >= self.capacity
    }

    pub fn host(&self) -> Option<&RoomUser> {
        self.users.iter().find(|u| u.is_host)
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.users.iter().any(|u| &u.user_id == user_id)
    }

    /// Optimistic-concurrency token. 0 means "never saved".
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Appends a member. The entry is never a host, whatever the caller
    /// passed in.
    ///
    /// Capacity, status and duplicate checks are the registry's job; this
    /// method does not repeat them.
    pub fn push_member(&mut self, mut user: RoomUser) {
        user.is_host = false;
        self.users.push(user);
    }

    /// Overwrites the status. Transition legality is checked by the caller.
    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Sets the version token. Only [`RoomStore`](crate::RoomStore)
    /// implementations should call this, when a save commits.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}
