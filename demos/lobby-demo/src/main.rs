use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use roomgate::prelude::*;
use tracing_subscriber::EnvFilter;

type Service = RoomAdmissionService<InMemoryRoomStore, Sha256PasswordVerifier>;

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// How a crowd of joiners fared against one room.
#[derive(Debug, Default, PartialEq, Eq)]
struct RaceOutcome {
    admitted: usize,
    full: usize,
    other: usize,
}

/// Sends `racers` joiners at the room at once, half by id (with the
/// password) and half by join code.
async fn race(
    service: &Arc<Service>,
    room: &RoomCreateResponse,
    password: &str,
    racers: usize,
) -> RaceOutcome {
    let tasks = (0..racers).map(|i| {
        let service = Arc::clone(service);
        let room_id = room.room_id;
        let join_code = room.join_code.clone();
        let password = password.to_string();
        tokio::spawn(async move {
            let name = format!("player-{i:02}");
            if i % 2 == 0 {
                let request = RoomJoinRequest::new(room_id).with_password(password);
                service.join_room(request, UserId::random(), &name).await
            } else {
                service
                    .join_room_by_code(join_code.as_str(), UserId::random(), &name)
                    .await
            }
        })
    });

    let mut outcome = RaceOutcome::default();
    for joined in join_all(tasks).await {
        match joined {
            Ok(Ok(_)) => outcome.admitted += 1,
            Ok(Err(e)) if e.kind() == ErrorKind::RoomFull => outcome.full += 1,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "unexpected join failure");
                outcome.other += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "join task panicked");
                outcome.other += 1;
            }
        }
    }
    outcome
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn build_service() -> Service {
    let verifier = match std::env::var("ROOMGATE_PEPPER") {
        Ok(pepper) => Sha256PasswordVerifier::with_pepper(pepper),
        Err(_) => Sha256PasswordVerifier::new(),
    };

    RoomAdmissionService::builder()
        .admission_timeout(Duration::from_secs(2))
        .build(InMemoryRoomStore::new(), verifier)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,roomgate=debug")),
        )
        .init();

    let service = Arc::new(build_service());
    let host = UserId::random();
    let password = "open sesame";

    let room = service
        .create_room(
            RoomCreateRequest::new("friday night lobby").with_password(password),
            host,
            "host",
        )
        .await?;
    tracing::info!(room_id = %room.room_id, join_code = %room.join_code, "lobby is open");

    let outcome = race(&service, &room, password, 12).await;
    tracing::info!(
        admitted = outcome.admitted,
        full = outcome.full,
        other = outcome.other,
        "race finished"
    );

    let open = service.get_room_list(GameStatus::Open).await?;
    println!("{}", serde_json::to_string_pretty(&open)?);

    service.start_game(room.room_id, host).await?;
    let closed = service.close_room(room.room_id, host).await?;
    tracing::info!(status = %closed.status, members = closed.members.len(), "lobby done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn lobby(service: &Service, password: &str) -> RoomCreateResponse {
        service
            .create_room(
                RoomCreateRequest::new("test lobby").with_password(password),
                UserId::random(),
                "host",
            )
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_race_twelve_racers_fill_room() {
        let service = Arc::new(build_service());
        let room = lobby(&service, "pw").await;

        let outcome = race(&service, &room, "pw", 12).await;

        assert_eq!(
            outcome,
            RaceOutcome {
                admitted: 9,
                full: 3,
                other: 0
            }
        );
        let detail = service.get_room_detail(room.room_id).await.unwrap();
        assert_eq!(detail.members.len(), 10);
    }

    #[tokio::test]
    async fn test_race_wrong_password_only_code_joiners_get_in() {
        let service = Arc::new(build_service());
        let room = lobby(&service, "pw").await;

        let outcome = race(&service, &room, "not it", 4).await;

        assert_eq!(outcome.admitted, 2);
        assert_eq!(outcome.other, 2);
    }
}
