//! `RoomAdmissionService` builder and request handling.
//!
//! The service is the entry point for an API layer. It validates requests,
//! hashes passwords, builds the host and member entries, and hands every
//! mutation to the [`RoomRegistry`]. It holds no mutation authority of its
//! own.

use std::sync::Arc;
use std::time::Duration;

use roomgate_auth::{PasswordVerifier, Sha256PasswordVerifier, generate_join_code};
use roomgate_room::{
    JoinCodePasswordPolicy, RegistryConfig, RejoinPolicy, RoomError, RoomRegistry,
};
use roomgate_store::{InMemoryRoomStore, NewRoom, Room, RoomStore, RoomUser};
use roomgate_types::{GameStatus, JoinCode, RoomId, RoomRef, UserId};
use tokio::time::Instant;

use crate::dto::{
    RoomCreateRequest, RoomCreateResponse, RoomDetailResponse, RoomJoinRequest,
    RoomJoinResponse, RoomListResponse, RoomSummary,
};

/// Longest accepted title or display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Builder for configuring a [`RoomAdmissionService`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use roomgate::prelude::*;
///
/// let service = RoomAdmissionService::builder()
///     .capacity(6)
///     .rejoin_policy(RejoinPolicy::Idempotent)
///     .admission_timeout(Duration::from_secs(2))
///     .build(InMemoryRoomStore::new(), Sha256PasswordVerifier::new());
///
/// assert_eq!(service.config().capacity, 6);
/// ```
#[derive(Debug, Clone)]
pub struct RoomAdmissionServiceBuilder {
    config: RegistryConfig,
    join_code_attempts: u32,
}

impl RoomAdmissionServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            join_code_attempts: 5,
        }
    }

    /// Replaces the whole registry configuration.
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the member limit for new rooms (host included).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn rejoin_policy(mut self, policy: RejoinPolicy) -> Self {
        self.config.rejoin_policy = policy;
        self
    }

    pub fn join_code_password_policy(mut self, policy: JoinCodePasswordPolicy) -> Self {
        self.config.join_code_password_policy = policy;
        self
    }

    /// Sets how many times a version conflict is retried.
    pub fn max_conflict_retries(mut self, retries: u32) -> Self {
        self.config.max_conflict_retries = retries;
        self
    }

    /// Sets the default wait for a busy room.
    pub fn admission_timeout(mut self, timeout: Duration) -> Self {
        self.config.admission_timeout = timeout;
        self
    }

    /// Sets how many generated join codes to try before giving up on a
    /// collision. At least one is always tried.
    pub fn join_code_attempts(mut self, attempts: u32) -> Self {
        self.join_code_attempts = attempts.max(1);
        self
    }

    /// Builds the service over the given store and password verifier.
    pub fn build<S: RoomStore, V: PasswordVerifier>(
        self,
        store: S,
        verifier: V,
    ) -> RoomAdmissionService<S, V> {
        let verifier = Arc::new(verifier);
        let registry =
            RoomRegistry::new(Arc::new(store), Arc::clone(&verifier), self.config);

        tracing::debug!(config = ?registry.config(), "room admission service built");

        RoomAdmissionService {
            registry,
            verifier,
            join_code_attempts: self.join_code_attempts,
        }
    }
}

impl Default for RoomAdmissionServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Room creation, admission, and lookup for one process.
///
/// Share it across request tasks behind an `Arc`; every method takes
/// `&self`.
pub struct RoomAdmissionService<S = InMemoryRoomStore, V = Sha256PasswordVerifier> {
    registry: RoomRegistry<S, V>,
    verifier: Arc<V>,
    join_code_attempts: u32,
}

impl RoomAdmissionService {
    /// Creates a new builder.
    pub fn builder() -> RoomAdmissionServiceBuilder {
        RoomAdmissionServiceBuilder::new()
    }
}

impl<S: RoomStore, V: PasswordVerifier> RoomAdmissionService<S, V> {
    pub fn config(&self) -> &RegistryConfig {
        self.registry.config()
    }

    /// The registry behind this service.
    pub fn registry(&self) -> &RoomRegistry<S, V> {
        &self.registry
    }

    /// Creates a room hosted by the caller.
    ///
    /// With no join code in the request, one is generated and regenerated
    /// on collision up to the configured number of attempts.
    ///
    /// # Errors
    /// - [`RoomError::InvalidRequest`] for a bad title, display name, or
    ///   join code
    /// - [`RoomError::DuplicateJoinCode`] if the requested code is taken,
    ///   or every generated one was
    pub async fn create_room(
        &self,
        request: RoomCreateRequest,
        user_id: UserId,
        display_name: &str,
    ) -> Result<RoomCreateResponse, RoomError> {
        let title = validate_name("title", &request.title)?;
        let host = RoomUser::host(user_id, validate_name("display name", display_name)?);
        let password_digest = request
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.verifier.hash(p));

        let draft = |join_code: JoinCode| NewRoom {
            title: title.clone(),
            host: host.clone(),
            password_digest: password_digest.clone(),
            join_code,
        };

        let room = match request.join_code.as_deref() {
            Some(raw) => self.registry.create_room(draft(parse_join_code(raw)?)).await?,
            None => self.create_with_generated_code(draft).await?,
        };

        Ok(RoomCreateResponse::from(&room))
    }

    /// Joins a room by id. A protected room needs the right password.
    pub async fn join_room(
        &self,
        request: RoomJoinRequest,
        user_id: UserId,
        display_name: &str,
    ) -> Result<RoomJoinResponse, RoomError> {
        let candidate =
            RoomUser::member(user_id, validate_name("display name", display_name)?);
        let deadline = self.deadline(request.timeout);

        let room = self
            .registry
            .admit_until(
                RoomRef::Id(request.room_id),
                candidate,
                request.password.as_deref(),
                deadline,
            )
            .await?;

        Ok(RoomJoinResponse::from(&room))
    }

    /// Joins a room by its join code, waiting at most the configured
    /// admission timeout.
    ///
    /// Under the default [`JoinCodePasswordPolicy::Bypass`] the code alone
    /// is enough, even for a protected room.
    pub async fn join_room_by_code(
        &self,
        join_code: &str,
        user_id: UserId,
        display_name: &str,
    ) -> Result<RoomJoinResponse, RoomError> {
        self.join_by_code(join_code, user_id, display_name, None).await
    }

    /// Like [`join_room_by_code`](Self::join_room_by_code), but gives up
    /// with `Timeout` once `timeout` has passed.
    pub async fn join_room_by_code_within(
        &self,
        join_code: &str,
        user_id: UserId,
        display_name: &str,
        timeout: Duration,
    ) -> Result<RoomJoinResponse, RoomError> {
        self.join_by_code(join_code, user_id, display_name, Some(timeout)).await
    }

    /// Lists rooms with the given status.
    pub async fn get_room_list(
        &self,
        status: GameStatus,
    ) -> Result<RoomListResponse, RoomError> {
        let rooms = self.registry.list_by_status(status).await?;
        Ok(RoomListResponse {
            status,
            rooms: rooms.iter().map(RoomSummary::from).collect(),
        })
    }

    pub async fn get_room_detail(
        &self,
        room_id: RoomId,
    ) -> Result<RoomDetailResponse, RoomError> {
        let room = self.registry.get_detail(room_id).await?;
        Ok(RoomDetailResponse::from(&room))
    }

    /// Starts the game, freezing membership. Host only.
    pub async fn start_game(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<RoomDetailResponse, RoomError> {
        self.host_transition(room_id, user_id, GameStatus::InProgress)
            .await
    }

    /// Closes a started room. Host only.
    pub async fn close_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<RoomDetailResponse, RoomError> {
        self.host_transition(room_id, user_id, GameStatus::Closed)
            .await
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    async fn create_with_generated_code(
        &self,
        draft: impl Fn(JoinCode) -> NewRoom,
    ) -> Result<Room, RoomError> {
        let mut attempt = 1;
        loop {
            match self.registry.create_room(draft(generate_join_code())).await {
                Err(RoomError::DuplicateJoinCode(code))
                    if attempt < self.join_code_attempts =>
                {
                    tracing::debug!(%code, attempt, "generated join code taken, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn host_transition(
        &self,
        room_id: RoomId,
        user_id: UserId,
        target: GameStatus,
    ) -> Result<RoomDetailResponse, RoomError> {
        // The host never changes, so a snapshot is enough to check it.
        let room = self.registry.get_detail(room_id).await?;
        if room.host().map(|h| h.user_id) != Some(user_id) {
            return Err(RoomError::NotHost(user_id, room_id));
        }

        let room = self.registry.transition(room_id, target).await?;
        Ok(RoomDetailResponse::from(&room))
    }

    async fn join_by_code(
        &self,
        join_code: &str,
        user_id: UserId,
        display_name: &str,
        timeout: Option<Duration>,
    ) -> Result<RoomJoinResponse, RoomError> {
        let join_code = parse_join_code(join_code)?;
        let candidate =
            RoomUser::member(user_id, validate_name("display name", display_name)?);
        let deadline = self.deadline(timeout);

        let room = self
            .registry
            .admit_until(RoomRef::Code(join_code), candidate, None, deadline)
            .await?;

        Ok(RoomJoinResponse::from(&room))
    }

    fn deadline(&self, timeout: Option<Duration>) -> Instant {
        Instant::now() + timeout.unwrap_or(self.registry.config().admission_timeout)
    }
}

/// Trims `raw` and checks it is non-empty and at most [`MAX_NAME_LEN`]
/// characters.
fn validate_name(field: &str, raw: &str) -> Result<String, RoomError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RoomError::InvalidRequest(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(RoomError::InvalidRequest(format!(
            "{field} is longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_join_code(raw: &str) -> Result<JoinCode, RoomError> {
    JoinCode::parse(raw).map_err(|e| RoomError::InvalidRequest(e.to_string()))
}
