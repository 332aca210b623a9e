//! # Roomgate
//!
//! Concurrency-safe room admission for multiplayer lobbies.
//!
//! Roomgate creates password-protected or open rooms, admits users by
//! room id or by a short join code, and guarantees that no room ever
//! holds more members than its capacity, however many users race for the
//! last slot. Storage and password hashing are pluggable through the
//! [`RoomStore`](roomgate_store::RoomStore) and
//! [`PasswordVerifier`](roomgate_auth::PasswordVerifier) traits.
//!
//! ## Quick Start
//!
//! ```rust
//! use roomgate::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), RoomError> {
//! let service = RoomAdmissionService::builder()
//!     .build(InMemoryRoomStore::new(), Sha256PasswordVerifier::new());
//!
//! let host = UserId::random();
//! let created = service
//!     .create_room(RoomCreateRequest::new("friday night"), host, "alice")
//!     .await?;
//!
//! let joined = service
//!     .join_room_by_code(created.join_code.as_str(), UserId::random(), "bob")
//!     .await?;
//! assert_eq!(joined.members.len(), 2);
//! # Ok(())
//! # }
//! ```

mod dto;
mod service;

pub use dto::{
    MemberView, RoomCreateRequest, RoomCreateResponse, RoomDetailResponse,
    RoomJoinRequest, RoomJoinResponse, RoomListResponse, RoomSummary,
};
pub use service::{MAX_NAME_LEN, RoomAdmissionService, RoomAdmissionServiceBuilder};

pub use roomgate_auth as auth;
pub use roomgate_room as room;
pub use roomgate_store as store;
pub use roomgate_types as types;

/// Everything needed to build and call a service.
pub mod prelude {
    pub use crate::{
        MemberView, RoomAdmissionService, RoomAdmissionServiceBuilder,
        RoomCreateRequest, RoomCreateResponse, RoomDetailResponse,
        RoomJoinRequest, RoomJoinResponse, RoomListResponse, RoomSummary,
    };
    pub use roomgate_auth::{PasswordVerifier, Sha256PasswordVerifier};
    pub use roomgate_room::{
        ErrorKind, JoinCodePasswordPolicy, RegistryConfig, RejoinPolicy, RoomError,
    };
    pub use roomgate_store::{InMemoryRoomStore, Room, RoomStore, RoomUser, StoreError};
    pub use roomgate_types::{GameStatus, JoinCode, RoomId, RoomRef, UserId};
}
