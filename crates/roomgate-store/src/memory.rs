//! In-memory [`RoomStore`] implementation.
//!
//! Good enough for tests, demos, and single-process deployments that can
//! afford to lose rooms on restart. All tables sit behind one `RwLock`,
//! so the version check and the join-code check in `save` happen in the
//! same critical section as the write itself.

use std::collections::HashMap;

use roomgate_types::{JoinCode, RoomId};
use tokio::sync::RwLock;

use crate::{Room, RoomStore, StoreError};

/// A [`RoomStore`] backed by hash maps.
///
/// `find_all` returns rooms in creation order.
#[derive(Debug, Default)]
pub struct InMemoryRoomStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    rooms: HashMap<RoomId, Room>,
    /// Join code → room, kept in sync with `rooms`.
    codes: HashMap<JoinCode, RoomId>,
    /// Creation order, for stable listings.
    order: Vec<RoomId>,
}

impl InMemoryRoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rooms.
    pub async fn len(&self) -> usize {
        self.tables.read().await.rooms.len()
    }

    /// Returns `true` if no room has been stored.
    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.rooms.is_empty()
    }
}

impl RoomStore for InMemoryRoomStore {
    async fn save(&self, mut room: Room) -> Result<Room, StoreError> {
        let mut tables = self.tables.write().await;
        let room_id = room.id();

        match tables.rooms.get(&room_id) {
            Some(stored) => {
                if stored.version() != room.version() {
                    return Err(StoreError::ConcurrentModification {
                        room_id,
                        expected: room.version(),
                        actual: stored.version(),
                    });
                }
                if stored.join_code() != room.join_code() {
                    return Err(StoreError::Backend(format!(
                        "join code of room {room_id} is immutable"
                    )));
                }
            }
            None => {
                if room.version() != 0 {
                    return Err(StoreError::ConcurrentModification {
                        room_id,
                        expected: room.version(),
                        actual: 0,
                    });
                }
                if tables.codes.contains_key(room.join_code()) {
                    return Err(StoreError::DuplicateJoinCode(
                        room.join_code().clone(),
                    ));
                }
                tables.codes.insert(room.join_code().clone(), room_id);
                tables.order.push(room_id);
            }
        }

        room.set_version(room.version() + 1);
        tables.rooms.insert(room_id, room.clone());

        tracing::trace!(%room_id, version = room.version(), "room saved");
        Ok(room)
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self.tables.read().await.rooms.get(&id).cloned())
    }

    async fn find_by_join_code(
        &self,
        code: &JoinCode,
    ) -> Result<Option<Room>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .codes
            .get(code)
            .and_then(|id| tables.rooms.get(id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Room>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .order
            .iter()
            .filter_map(|id| tables.rooms.get(id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use roomgate_types::{GameStatus, UserId};

    use super::*;
    use crate::{NewRoom, RoomUser};

    fn draft(code: &str) -> Room {
        Room::open(
            NewRoom {
                title: "lobby".into(),
                host: RoomUser::host(UserId::random(), "host"),
                password_digest: None,
                join_code: JoinCode::parse(code).unwrap(),
            },
            10,
        )
    }

    #[tokio::test]
    async fn test_save_new_room_assigns_version_one() {
        let store = InMemoryRoomStore::new();

        let saved = store.save(draft("AAAA-2222")).await.unwrap();

        assert_eq!(saved.version(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_update_bumps_version() {
        let store = InMemoryRoomStore::new();
        let mut room = store.save(draft("AAAA-2222")).await.unwrap();

        room.push_member(RoomUser::member(UserId::random(), "guest"));
        let updated = store.save(room).await.unwrap();

        assert_eq!(updated.version(), 2);
        let loaded = store.find_by_id(updated.id()).await.unwrap().unwrap();
        assert_eq!(loaded.member_count(), 2);
    }

    #[tokio::test]
    async fn test_save_stale_version_is_rejected() {
        let store = InMemoryRoomStore::new();
        let saved = store.save(draft("AAAA-2222")).await.unwrap();

        // Two writers read version 1; the first one wins.
        let mut first = saved.clone();
        let mut second = saved;
        first.push_member(RoomUser::member(UserId::random(), "a"));
        second.push_member(RoomUser::member(UserId::random(), "b"));
        store.save(first).await.unwrap();

        let result = store.save(second).await;

        assert!(matches!(
            result,
            Err(StoreError::ConcurrentModification {
                expected: 1,
                actual: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_save_duplicate_join_code_is_rejected() {
        let store = InMemoryRoomStore::new();
        store.save(draft("AAAA-2222")).await.unwrap();

        let result = store.save(draft("aaaa-2222")).await;

        assert!(matches!(result, Err(StoreError::DuplicateJoinCode(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_unknown_room_with_version_is_rejected() {
        let store = InMemoryRoomStore::new();
        let mut room = draft("AAAA-2222");
        room.set_version(4);

        let result = store.save(room).await;

        assert!(matches!(
            result,
            Err(StoreError::ConcurrentModification { actual: 0, .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_by_join_code() {
        let store = InMemoryRoomStore::new();
        let saved = store.save(draft("AAAA-2222")).await.unwrap();

        let code = JoinCode::parse("aaaa-2222").unwrap();
        let found = store.find_by_join_code(&code).await.unwrap();
        assert_eq!(found.map(|r| r.id()), Some(saved.id()));

        let missing = JoinCode::parse("ZZZZ-9999").unwrap();
        assert!(store.find_by_join_code(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_keeps_creation_order() {
        let store = InMemoryRoomStore::new();
        let a = store.save(draft("AAAA-2222")).await.unwrap();
        let b = store.save(draft("BBBB-3333")).await.unwrap();
        let mut c = store.save(draft("CCCC-4444")).await.unwrap();

        // Updating a room must not move it in the listing.
        c.set_status(GameStatus::InProgress);
        store.save(c.clone()).await.unwrap();

        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(Room::id)
            .collect();
        assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
    }
}
