//! Room registry: the only component allowed to change a room.
//!
//! Admission is a read-check-write cycle: load the room, check status,
//! capacity, password and membership, append the user, save. Run
//! naively, two users racing for the last slot both pass the capacity
//! check and the room ends up over capacity. The registry closes that
//! race two ways:
//!
//! - **Per-room lock.** Every mutation of a room runs under that room's
//!   own `tokio::sync::Mutex`, held for the whole cycle. Different rooms
//!   never contend with each other.
//! - **Versioned save.** The store rejects a save whose version is stale
//!   (another process got there first). The registry then re-loads,
//!   re-checks everything, and tries again, a bounded number of times.
//!
//! Reads (`get_detail`, `list_by_status`) skip the locks entirely and
//! return whatever the store holds at that moment.

use std::collections::HashMap;
use std::sync::Arc;

use roomgate_auth::PasswordVerifier;
use roomgate_store::{NewRoom, Room, RoomStore, RoomUser, StoreError};
use roomgate_types::{GameStatus, RoomId, RoomRef};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;

use crate::{JoinCodePasswordPolicy, RegistryConfig, RejoinPolicy, RoomError};

/// What a mutation decided after checking the freshly loaded room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The room was changed and must be saved.
    Commit,
    /// Nothing to save; hand the room back as is.
    Unchanged,
}

/// Admission authority for all rooms in one process.
///
/// Holds the store and password verifier it was given, plus a table of
/// per-room locks that grows as rooms are touched and shrinks when they
/// close.
pub struct RoomRegistry<S, V> {
    store: Arc<S>,
    verifier: Arc<V>,
    config: RegistryConfig,

    /// One lock per room that has seen a mutation.
    locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl<S: RoomStore, V: PasswordVerifier> RoomRegistry<S, V> {
    /// Creates a registry over `store`, checking passwords with `verifier`.
    pub fn new(store: Arc<S>, verifier: Arc<V>, config: RegistryConfig) -> Self {
        Self {
            store,
            verifier,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Opens and persists a new room with the host as its only member.
    ///
    /// Join-code uniqueness is enforced by the store in the same step as
    /// the insert.
    ///
    /// # Errors
    /// - [`RoomError::DuplicateJoinCode`] if the code is taken
    /// - [`RoomError::Store`] if the backend fails
    pub async fn create_room(&self, new_room: NewRoom) -> Result<Room, RoomError> {
        let room = Room::open(new_room, self.config.effective_capacity());
        let join_code = room.join_code().clone();

        let saved = self.store.save(room).await.map_err(|e| {
            tracing::debug!(%join_code, error = %e, "room creation rejected");
            RoomError::from(e)
        })?;

        tracing::info!(
            room_id = %saved.id(),
            %join_code,
            host = ?saved.host().map(|h| h.user_id),
            protected = saved.has_password(),
            capacity = saved.capacity(),
            "room created"
        );
        Ok(saved)
    }

    /// Admits `candidate` into the room named by `target`, waiting at most
    /// the configured admission timeout for the room to become available.
    ///
    /// See [`admit_until`](Self::admit_until) for the full contract.
    pub async fn admit(
        &self,
        target: RoomRef,
        candidate: RoomUser,
        password: Option<&str>,
    ) -> Result<Room, RoomError> {
        let deadline = Instant::now() + self.config.admission_timeout;
        self.admit_until(target, candidate, password, deadline).await
    }

    /// Admits `candidate` into the room named by `target`.
    ///
    /// Runs as one atomic unit per room, in this order:
    ///
    /// 1. the room must exist, else `NotFound`
    /// 2. its status must be `Open`, else `NotOpen`
    /// 3. it must have a free slot, else `RoomFull`
    /// 4. for a protected room joined by id (or by code under
    ///    [`JoinCodePasswordPolicy::Enforce`]): a non-empty password is
    ///    required (`PasswordRequired`) and must verify
    ///    (`PasswordMismatch`)
    /// 5. the user must not already be a member, else `AlreadyJoined`.
    ///    Under [`RejoinPolicy::Idempotent`] an existing member gets the
    ///    unchanged room back instead, right after step 2.
    /// 6. the user is appended (never as host) and the room saved
    ///
    /// If `deadline` passes while the room is being looked up or while
    /// another mutation holds it, the call fails with `Timeout` and the
    /// user is not admitted. Once the room is acquired the attempt runs to
    /// completion.
    pub async fn admit_until(
        &self,
        target: RoomRef,
        candidate: RoomUser,
        password: Option<&str>,
        deadline: Instant,
    ) -> Result<Room, RoomError> {
        let snapshot = self.resolve(&target, deadline).await?;
        let room_id = snapshot.id();
        let check_password = match target {
            RoomRef::Id(_) => true,
            RoomRef::Code(_) => {
                self.config.join_code_password_policy
                    == JoinCodePasswordPolicy::Enforce
            }
        };
        let user_id = candidate.user_id;

        let result = self
            .mutate(&target, snapshot, deadline, |room| {
                let step =
                    self.check_admission(room, &candidate, password, check_password)?;
                if step == Step::Commit {
                    room.push_member(candidate.clone());
                }
                Ok(step)
            })
            .await;

        match result {
            Ok((room, Step::Commit)) => {
                tracing::info!(
                    %room_id,
                    %user_id,
                    members = room.member_count(),
                    capacity = room.capacity(),
                    "user admitted"
                );
                Ok(room)
            }
            Ok((room, Step::Unchanged)) => {
                tracing::debug!(%room_id, %user_id, "user already a member");
                Ok(room)
            }
            Err(e) => {
                tracing::debug!(%room_id, %user_id, error = %e, "admission rejected");
                Err(e)
            }
        }
    }

    /// Moves a room one step along `Open → InProgress → Closed`.
    ///
    /// Serialized with admissions on the same room, so a join can never
    /// land after the game has started.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] if the room doesn't exist
    /// - [`RoomError::InvalidTransition`] if `target` is not the next status
    /// - [`RoomError::Timeout`] if the room stays busy past the admission
    ///   timeout
    pub async fn transition(
        &self,
        room_id: RoomId,
        target: GameStatus,
    ) -> Result<Room, RoomError> {
        let room_ref = RoomRef::Id(room_id);
        let deadline = Instant::now() + self.config.admission_timeout;
        let snapshot = self.resolve(&room_ref, deadline).await?;

        let (room, _) = self
            .mutate(&room_ref, snapshot, deadline, |room| {
                let from = room.status();
                if !from.can_transition_to(target) {
                    return Err(RoomError::InvalidTransition {
                        room_id,
                        from,
                        to: target,
                    });
                }
                room.set_status(target);
                Ok(Step::Commit)
            })
            .await?;

        tracing::info!(%room_id, status = %target, "room status changed");
        Ok(room)
    }

    /// Returns a snapshot of every room with the given status, in store
    /// order.
    pub async fn list_by_status(
        &self,
        status: GameStatus,
    ) -> Result<Vec<Room>, RoomError> {
        let rooms = self.store.find_all().await?;
        Ok(rooms
            .into_iter()
            .filter(|room| room.status() == status)
            .collect())
    }

    /// Returns a snapshot of one room.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] if the room doesn't exist.
    pub async fn get_detail(&self, room_id: RoomId) -> Result<Room, RoomError> {
        self.store
            .find_by_id(room_id)
            .await?
            .ok_or(RoomError::NotFound(RoomRef::Id(room_id)))
    }

    /// Number of rooms that currently have an entry in the lock table.
    pub async fn tracked_rooms(&self) -> usize {
        self.locks.lock().await.len()
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Loads a snapshot of the room `target` points at, giving up with
    /// `Timeout` at `deadline`.
    async fn resolve(&self, target: &RoomRef, deadline: Instant) -> Result<Room, RoomError> {
        let lookup = async {
            match target {
                RoomRef::Id(id) => self.store.find_by_id(*id).await,
                RoomRef::Code(code) => self.store.find_by_join_code(code).await,
            }
        };

        tokio::time::timeout_at(deadline, lookup)
            .await
            .map_err(|_| RoomError::Timeout(target.clone()))??
            .ok_or_else(|| RoomError::NotFound(target.clone()))
    }

    /// Waits for exclusive access to a room until `deadline`.
    async fn acquire(
        &self,
        target: &RoomRef,
        room_id: RoomId,
        deadline: Instant,
    ) -> Result<OwnedMutexGuard<()>, RoomError> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(room_id).or_default())
        };

        tokio::time::timeout_at(deadline, lock.lock_owned())
            .await
            .map_err(|_| RoomError::Timeout(target.clone()))
    }

    /// Runs `apply` against the latest stored room under the room's lock
    /// and saves the result, re-running on version conflicts up to the
    /// configured retry budget.
    ///
    /// `apply` sees a freshly loaded room on every attempt, so all of its
    /// checks are repeated against the state that will actually be
    /// overwritten.
    ///
    /// A room whose `snapshot` is already `Closed` is checked against the
    /// snapshot without touching the lock table. When a locked attempt
    /// sees the room `Closed`, the room's lock entry is dropped on the way
    /// out. Closed is terminal, so anyone still holding that lock can only
    /// observe `Closed` too.
    async fn mutate<F>(
        &self,
        target: &RoomRef,
        snapshot: Room,
        deadline: Instant,
        mut apply: F,
    ) -> Result<(Room, Step), RoomError>
    where
        F: FnMut(&mut Room) -> Result<Step, RoomError>,
    {
        let room_id = snapshot.id();

        if snapshot.status() == GameStatus::Closed {
            let mut room = snapshot;
            return match apply(&mut room)? {
                Step::Unchanged => Ok((room, Step::Unchanged)),
                Step::Commit => Err(RoomError::NotOpen {
                    room_id,
                    status: GameStatus::Closed,
                }),
            };
        }

        let guard = self.acquire(target, room_id, deadline).await?;
        let mut closed = false;
        let result = self
            .load_check_save(target, room_id, &mut apply, &mut closed)
            .await;
        drop(guard);

        if closed {
            self.locks.lock().await.remove(&room_id);
        }
        result
    }

    /// The locked part of [`mutate`](Self::mutate). Sets `closed` whenever
    /// it loads or commits a `Closed` room.
    async fn load_check_save<F>(
        &self,
        target: &RoomRef,
        room_id: RoomId,
        apply: &mut F,
        closed: &mut bool,
    ) -> Result<(Room, Step), RoomError>
    where
        F: FnMut(&mut Room) -> Result<Step, RoomError>,
    {
        let mut conflicts: u32 = 0;

        loop {
            let mut room = self
                .store
                .find_by_id(room_id)
                .await?
                .ok_or_else(|| RoomError::NotFound(target.clone()))?;
            *closed = room.status() == GameStatus::Closed;

            let step = apply(&mut room)?;
            if step == Step::Unchanged {
                return Ok((room, step));
            }

            match self.store.save(room).await {
                Ok(saved) => {
                    *closed = saved.status() == GameStatus::Closed;
                    return Ok((saved, step));
                }
                Err(StoreError::ConcurrentModification {
                    expected, actual, ..
                }) if conflicts < self.config.max_conflict_retries => {
                    conflicts += 1;
                    tracing::debug!(
                        %room_id,
                        expected,
                        actual,
                        attempt = conflicts,
                        "version conflict, re-checking room"
                    );
                }
                Err(StoreError::ConcurrentModification { .. }) => {
                    tracing::warn!(
                        %room_id,
                        retries = conflicts,
                        "version conflicts exhausted the retry budget"
                    );
                    return Err(RoomError::ConcurrentModification(room_id));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Decides whether `candidate` may join `room` as loaded right now.
    fn check_admission(
        &self,
        room: &Room,
        candidate: &RoomUser,
        password: Option<&str>,
        check_password: bool,
    ) -> Result<Step, RoomError> {
        let room_id = room.id();

        if !room.status().is_joinable() {
            return Err(RoomError::NotOpen {
                room_id,
                status: room.status(),
            });
        }

        let already_member = room.is_member(&candidate.user_id);
        if already_member && self.config.rejoin_policy == RejoinPolicy::Idempotent {
            return Ok(Step::Unchanged);
        }

        if room.is_full() {
            return Err(RoomError::RoomFull(room_id));
        }

        if check_password {
            if let Some(digest) = room.password_digest() {
                let presented = password
                    .filter(|p| !p.is_empty())
                    .ok_or(RoomError::PasswordRequired(room_id))?;
                if !self.verifier.verify(presented, digest) {
                    return Err(RoomError::PasswordMismatch(room_id));
                }
            }
        }

        if already_member {
            return Err(RoomError::AlreadyJoined(candidate.user_id, room_id));
        }

        Ok(Step::Commit)
    }
}
