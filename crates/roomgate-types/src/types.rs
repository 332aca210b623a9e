//! Core identity and lifecycle types.
//!
//! These are the values that cross every layer boundary: the registry
//! locks rooms by [`RoomId`], the store indexes them by [`JoinCode`], and
//! the service filters listings by [`GameStatus`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TypeError;

/// Hard upper bound on the number of users in one room, host included.
pub const MAX_ROOM_USERS: usize = 10;

/// Longest join code accepted from a caller, dashes included.
const MAX_JOIN_CODE_LEN: usize = 16;

/// Shortest join code accepted from a caller.
const MIN_JOIN_CODE_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a room.
///
/// Newtype over a UUID v4. `#[serde(transparent)]` keeps the JSON form a
/// plain string (`"67e5…"`) instead of `{"0": "67e5…"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Generates a fresh random room id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TypeError::InvalidId(s.to_string()))
    }
}

/// A reference to a user owned by an external identity system.
///
/// Roomgate never creates users; it only records which ones joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generates a random user id. Mostly useful in tests and demos.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TypeError::InvalidId(s.to_string()))
    }
}

/// A short, human-shareable alias for a room (e.g. `"7K2P-9QXH"`).
///
/// Always stored in normalized form: trimmed and upper-cased. Two codes
/// that differ only in case or surrounding whitespace are the same code,
/// so `JoinCode::parse(" 7k2p-9qxh ")` equals `JoinCode::parse("7K2P-9QXH")`.
///
/// Deserialization goes through [`JoinCode::parse`], so a `JoinCode`
/// obtained from JSON is always valid too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JoinCode(String);

impl JoinCode {
    /// Normalizes and validates a join code.
    ///
    /// # Errors
    /// Returns [`TypeError::InvalidJoinCode`] if the normalized code is
    /// shorter than 4 or longer than 16 characters, contains anything
    /// other than ASCII letters, digits and `-`, or is made only of dashes.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let normalized = raw.trim().to_ascii_uppercase();

        let len_ok = (MIN_JOIN_CODE_LEN..=MAX_JOIN_CODE_LEN)
            .contains(&normalized.len());
        let chars_ok = normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
        let has_symbol = normalized.chars().any(|c| c != '-');

        if len_ok && chars_ok && has_symbol {
            Ok(Self(normalized))
        } else {
            Err(TypeError::InvalidJoinCode(raw.to_string()))
        }
    }

    /// Returns the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JoinCode {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JoinCode> for String {
    fn from(code: JoinCode) -> Self {
        code.0
    }
}

impl FromStr for JoinCode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a room.
///
/// Transitions are strictly ordered, with no skipping and no going back:
///
/// ```text
/// Open → InProgress → Closed
/// ```
///
/// - **Open**: the lobby is accepting joins.
/// - **InProgress**: the game has started; membership is frozen.
/// - **Closed**: the game is over and the room is ready for archival.
///
/// Serialized as `"OPEN"`, `"IN_PROGRESS"`, `"CLOSED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Open,
    InProgress,
    Closed,
}

impl GameStatus {
    /// Returns `true` if the room is accepting new users.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns the next status, or `None` once the room is closed.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Open => Some(Self::InProgress),
            Self::InProgress => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns `true` if moving to `target` is a legal single step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(TypeError::UnknownStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomRef
// ---------------------------------------------------------------------------

/// How a caller names the room it wants to join.
///
/// The distinction matters beyond lookup: joining by id goes through the
/// password gate, joining by code does not (unless the registry is
/// configured to enforce it).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum RoomRef {
    Id(RoomId),
    Code(JoinCode),
}

impl From<RoomId> for RoomRef {
    fn from(id: RoomId) -> Self {
        Self::Id(id)
    }
}

impl From<JoinCode> for RoomRef {
    fn from(code: JoinCode) -> Self {
        Self::Code(code)
    }
}

impl fmt::Display for RoomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Code(code) => write!(f, "code {code}"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // RoomId / UserId
    // =====================================================================

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let id = RoomId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_room_id_parse_round_trips_display() {
        let id = RoomId::new();
        let parsed: RoomId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_room_id_parse_rejects_garbage() {
        let result = "not-a-uuid".parse::<RoomId>();
        assert!(matches!(result, Err(TypeError::InvalidId(_))));
    }

    #[test]
    fn test_user_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
    }

    // =====================================================================
    // JoinCode
    // =====================================================================

    #[test]
    fn test_join_code_parse_normalizes_case_and_whitespace() {
        let code = JoinCode::parse("  7k2p-9qxh ").unwrap();
        assert_eq!(code.as_str(), "7K2P-9QXH");
        assert_eq!(code, JoinCode::parse("7K2P-9QXH").unwrap());
    }

    #[test]
    fn test_join_code_parse_rejects_bad_input() {
        for raw in ["", "ab", "----", "AB CD", "ABCD!", "ABCDEFGHJKLMNPQRS"] {
            assert!(
                matches!(JoinCode::parse(raw), Err(TypeError::InvalidJoinCode(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_join_code_deserialize_validates() {
        let ok: JoinCode = serde_json::from_str("\"abcd-1234\"").unwrap();
        assert_eq!(ok.as_str(), "ABCD-1234");

        let bad = serde_json::from_str::<JoinCode>("\"a!\"");
        assert!(bad.is_err());
    }

    // =====================================================================
    // GameStatus
    // =====================================================================

    #[test]
    fn test_game_status_next_follows_strict_order() {
        assert_eq!(GameStatus::Open.next(), Some(GameStatus::InProgress));
        assert_eq!(GameStatus::InProgress.next(), Some(GameStatus::Closed));
        assert_eq!(GameStatus::Closed.next(), None);
    }

    #[test]
    fn test_game_status_can_transition_to() {
        assert!(GameStatus::Open.can_transition_to(GameStatus::InProgress));
        assert!(!GameStatus::Open.can_transition_to(GameStatus::Closed));
        assert!(!GameStatus::Closed.can_transition_to(GameStatus::Open));
        assert!(!GameStatus::InProgress.can_transition_to(GameStatus::InProgress));
    }

    #[test]
    fn test_game_status_is_joinable() {
        assert!(GameStatus::Open.is_joinable());
        assert!(!GameStatus::InProgress.is_joinable());
        assert!(!GameStatus::Closed.is_joinable());
    }

    #[test]
    fn test_game_status_json_uses_screaming_snake_case() {
        let json = serde_json::to_string(&GameStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_game_status_from_str_is_case_insensitive() {
        assert_eq!("open".parse::<GameStatus>(), Ok(GameStatus::Open));
        assert_eq!("In_Progress".parse::<GameStatus>(), Ok(GameStatus::InProgress));
        assert!(matches!(
            "paused".parse::<GameStatus>(),
            Err(TypeError::UnknownStatus(_))
        ));
    }

    // =====================================================================
    // RoomRef
    // =====================================================================

    #[test]
    fn test_room_ref_json_is_tagged() {
        let code = JoinCode::parse("WXYZ-2345").unwrap();
        let json = serde_json::to_string(&RoomRef::Code(code)).unwrap();
        assert_eq!(json, r#"{"by":"code","value":"WXYZ-2345"}"#);
    }

    #[test]
    fn test_room_ref_display() {
        let code = JoinCode::parse("WXYZ-2345").unwrap();
        assert_eq!(RoomRef::from(code).to_string(), "code WXYZ-2345");
    }
}
