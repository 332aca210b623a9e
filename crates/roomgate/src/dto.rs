//! Request and response shapes for the admission service.
//!
//! These are plain serde structs so an API layer can expose them in
//! whatever wire format it likes. Responses are built from a committed
//! [`Room`] snapshot and never carry the password digest.

use std::time::Duration;

use chrono::{DateTime, Utc};
use roomgate_store::{Room, RoomUser};
use roomgate_types::{GameStatus, JoinCode, RoomId, UserId};
use serde::{Deserialize, Serialize};

// =========================================================================
// Requests
// =========================================================================

/// Asks for a new room. The caller becomes its host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreateRequest {
    pub title: String,

    /// Plaintext password. `None` or `""` creates an open room.
    #[serde(default)]
    pub password: Option<String>,

    /// A caller-chosen join code. Generated when absent.
    #[serde(default)]
    pub join_code: Option<String>,
}

impl RoomCreateRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_join_code(mut self, join_code: impl Into<String>) -> Self {
        self.join_code = Some(join_code.into());
        self
    }
}

/// Asks to join a room by its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomJoinRequest {
    pub room_id: RoomId,

    #[serde(default)]
    pub password: Option<String>,

    /// How long to wait for a busy room. Falls back to the service's
    /// admission timeout.
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl RoomJoinRequest {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =========================================================================
// Responses
// =========================================================================

/// One member as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub user_id: UserId,
    pub display_name: String,
    pub is_host: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<&RoomUser> for MemberView {
    fn from(user: &RoomUser) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name.clone(),
            is_host: user.is_host,
            joined_at: user.joined_at,
        }
    }
}

fn members(room: &Room) -> Vec<MemberView> {
    room.users().iter().map(MemberView::from).collect()
}

/// Returned by `create_room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreateResponse {
    pub room_id: RoomId,
    pub join_code: JoinCode,
    pub title: String,
    pub has_password: bool,
    pub status: GameStatus,
    pub capacity: usize,
    pub members: Vec<MemberView>,
    pub created_at: DateTime<Utc>,
}

impl From<&Room> for RoomCreateResponse {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id(),
            join_code: room.join_code().clone(),
            title: room.title().to_string(),
            has_password: room.has_password(),
            status: room.status(),
            capacity: room.capacity(),
            members: members(room),
            created_at: room.created_at(),
        }
    }
}

/// Returned by `join_room` and `join_room_by_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomJoinResponse {
    pub room_id: RoomId,
    pub join_code: JoinCode,
    pub has_password: bool,
    pub status: GameStatus,
    pub capacity: usize,
    pub members: Vec<MemberView>,
}

impl From<&Room> for RoomJoinResponse {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id(),
            join_code: room.join_code().clone(),
            has_password: room.has_password(),
            status: room.status(),
            capacity: room.capacity(),
            members: members(room),
        }
    }
}

/// One line of a room listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub join_code: JoinCode,
    pub title: String,
    pub has_password: bool,
    pub status: GameStatus,
    pub member_count: usize,
    pub capacity: usize,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id(),
            join_code: room.join_code().clone(),
            title: room.title().to_string(),
            has_password: room.has_password(),
            status: room.status(),
            member_count: room.member_count(),
            capacity: room.capacity(),
        }
    }
}

/// Returned by `get_room_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub status: GameStatus,
    pub rooms: Vec<RoomSummary>,
}

/// Returned by `get_room_detail` and the host-only status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailResponse {
    pub room_id: RoomId,
    pub join_code: JoinCode,
    pub title: String,
    pub has_password: bool,
    pub status: GameStatus,
    pub capacity: usize,
    pub members: Vec<MemberView>,
    pub created_at: DateTime<Utc>,
}

impl From<&Room> for RoomDetailResponse {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id(),
            join_code: room.join_code().clone(),
            title: room.title().to_string(),
            has_password: room.has_password(),
            status: room.status(),
            capacity: room.capacity(),
            members: members(room),
            created_at: room.created_at(),
        }
    }
}
