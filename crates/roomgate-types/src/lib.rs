//! Shared vocabulary for Roomgate.
//!
//! Every other crate in the workspace speaks in terms of these types:
//!
//! - **Identity** ([`RoomId`], [`UserId`], [`JoinCode`]): newtype
//!   wrappers so a user id can never be passed where a room id is
//!   expected.
//! - **Lifecycle** ([`GameStatus`]): the monotonic
//!   `Open → InProgress → Closed` state machine of a room.
//! - **Addressing** ([`RoomRef`]): a room named either by id or by its
//!   join code.
//!
//! # Architecture
//!
//! ```text
//! Service (roomgate) → Registry (roomgate-room) → Store (roomgate-store)
//!                              ↘ uses types from this crate ↙
//! ```

mod error;
mod types;

pub use error::TypeError;
pub use types::{GameStatus, JoinCode, MAX_ROOM_USERS, RoomId, RoomRef, UserId};
