use podium_service::{Service, ServiceConfig, ServiceError};
use podium_store::{
    CreateLeaderboardParams, Error, EventKind, Identity, LeaderboardRegistry, ManualClock,
    MemoryEmitter, Score,
};

fn identity(byte: u8) -> Identity {
    Identity::new([byte; 32])
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn spawn_service(owner: Identity) -> (podium_service::ServiceHandle, MemoryEmitter) {
    let emitter = MemoryEmitter::new();
    let registry =
        LeaderboardRegistry::new(owner, emitter.clone(), ManualClock::new(1_700_000_000)).unwrap();
    let (service, handle) = Service::new(registry, ServiceConfig::default());
    let _ = service.spawn();
    (handle, emitter)
}

#[tokio::test]
async fn sprint_scenario_end_to_end() -> Result<(), ServiceError> {
    setup_tracing();
    let owner = identity(1);
    let (handle, _emitter) = spawn_service(owner);

    let id = handle
        .create_leaderboard(
            owner,
            CreateLeaderboardParams::builder()
                .name("Sprint1")
                .description("desc")
                .build(),
        )
        .await?;
    assert_eq!(id, 0);
    assert!(handle.leaderboard_info(0).await?.is_active());

    let (alice, bob) = (identity(10), identity(11));
    handle
        .set_score(owner, 0, alice, "alice", Score::from(100u64))
        .await?;
    handle
        .set_score(owner, 0, bob, "bob", Score::from(150u64))
        .await?;

    let top = handle.top_n(0, 1).await?;
    assert_eq!(top[0].username, "bob");
    assert_eq!(top[0].score, Score::from(150u64));

    handle.remove_participant(owner, 0, bob).await?;
    let top = handle.top_n(0, 1).await?;
    assert_eq!(top[0].username, "alice");
    assert_eq!(handle.participant_count(0).await?, 1);
    assert!(handle.user_info(0, bob).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn authorization_errors_surface_through_the_handle() -> Result<(), ServiceError> {
    setup_tracing();
    let owner = identity(1);
    let (handle, _emitter) = spawn_service(owner);
    let outsider = identity(9);

    let err = handle
        .create_leaderboard(
            outsider,
            CreateLeaderboardParams::builder().name("nope").build(),
        )
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Store(Error::Unauthorized));

    let err = handle.remove_admin(owner, owner).await.unwrap_err();
    assert_eq!(err, ServiceError::Store(Error::CannotRemoveOwner));

    assert_eq!(handle.leaderboard_count().await?, 0);
    assert_eq!(handle.owner().await?, owner);
    assert_eq!(handle.admins().await?, vec![owner]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_submitters_serialize_into_one_commit_order() -> Result<(), ServiceError> {
    setup_tracing();
    let owner = identity(1);
    let (handle, emitter) = spawn_service(owner);

    let id = handle
        .create_leaderboard(owner, CreateLeaderboardParams::builder().name("open").build())
        .await?;

    let mut tasks = Vec::new();
    for byte in 10..26u8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let who = identity(byte);
            for round in 0..4u64 {
                handle
                    .submit_score(who, id, format!("user-{byte}"), Score::from(round))
                    .await
                    .unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(handle.participant_count(id).await?, 16);

    // One creation plus every submission, committed one at a time with
    // contiguous sequence numbers.
    let events = emitter.events();
    assert_eq!(events.len(), 1 + 16 * 4);
    for (expected, (seq, _)) in events.iter().enumerate() {
        assert_eq!(*seq, expected as u64);
    }
    let score_writes = events
        .iter()
        .filter(|(_, event)| event.kind() == EventKind::ScoreUpdated)
        .count();
    assert_eq!(score_writes, 16 * 4);
    Ok(())
}

#[tokio::test]
async fn handle_fails_closed_once_the_worker_is_gone() {
    setup_tracing();
    let owner = identity(1);
    let registry =
        LeaderboardRegistry::new(owner, MemoryEmitter::new(), ManualClock::new(0)).unwrap();
    let (service, handle) = Service::new(registry, ServiceConfig::builder().capacity(4).build());
    drop(service);

    let err = handle.leaderboard_count().await.unwrap_err();
    assert_eq!(err, ServiceError::Closed);
}

#[tokio::test]
async fn run_returns_the_registry_after_the_last_handle_drops() {
    setup_tracing();
    let owner = identity(1);
    let registry =
        LeaderboardRegistry::new(owner, MemoryEmitter::new(), ManualClock::new(0)).unwrap();
    let (service, handle) = Service::new(registry, ServiceConfig::default());
    let worker = service.spawn();

    handle
        .create_leaderboard(owner, CreateLeaderboardParams::builder().name("kept").build())
        .await
        .unwrap();
    drop(handle);

    let registry = worker.await.unwrap();
    assert_eq!(registry.leaderboard_count(), 1);
    assert_eq!(registry.leaderboard_info(0).unwrap().name(), "kept");
}
