//! Registry configuration and admission policies.

use std::time::Duration;

use roomgate_types::MAX_ROOM_USERS;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What happens when a user who is already a member joins again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejoinPolicy {
    /// Fail with [`RoomError::AlreadyJoined`](crate::RoomError::AlreadyJoined).
    #[default]
    Reject,
    /// Succeed without changing the room. The existing entry (and its
    /// original display name) is kept.
    Idempotent,
}

/// Whether joining by join code goes through the password gate.
///
/// Joining by id always checks the password of a protected room. Joining
/// by code historically did not; `Bypass` keeps that behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCodePasswordPolicy {
    /// Knowing the code is enough; no password is asked for.
    #[default]
    Bypass,
    /// Apply the same password gate as joining by id.
    Enforce,
}

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`RoomRegistry`](crate::RoomRegistry).
///
/// Start from `RegistryConfig::default()` and override what you need:
///
/// ```rust
/// use std::time::Duration;
/// use roomgate_room::{RegistryConfig, RejoinPolicy};
///
/// let config = RegistryConfig {
///     capacity: 6,
///     rejoin_policy: RejoinPolicy::Idempotent,
///     admission_timeout: Duration::from_secs(2),
///     ..RegistryConfig::default()
/// };
/// assert_eq!(config.effective_capacity(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum members per room, host included. Clamped to
    /// `1..=MAX_ROOM_USERS` when rooms are created.
    pub capacity: usize,

    /// Behaviour when a member joins the same room again.
    pub rejoin_policy: RejoinPolicy,

    /// Whether join-by-code checks the room password.
    pub join_code_password_policy: JoinCodePasswordPolicy,

    /// Extra attempts after a version conflict before giving up with
    /// `ConcurrentModification`. 0 means "try once".
    pub max_conflict_retries: u32,

    /// Deadline for acquiring a room when the caller gives none.
    pub admission_timeout: Duration,
}

impl RegistryConfig {
    /// The capacity new rooms actually get.
    pub fn effective_capacity(&self) -> usize {
        self.capacity.clamp(1, MAX_ROOM_USERS)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_ROOM_USERS,
            rejoin_policy: RejoinPolicy::Reject,
            join_code_password_policy: JoinCodePasswordPolicy::Bypass,
            max_conflict_retries: 3,
            admission_timeout: Duration::from_secs(5),
        }
    }
}
