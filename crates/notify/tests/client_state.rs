//! Integration tests for the client notification state over the in-memory
//! backend.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::MemoryBackend;
use pawsome_core::types::DbId;
use pawsome_db::models::notification::NewNotification;
use pawsome_notify::client::PushPermission;
use pawsome_notify::store::NotificationStore;
use pawsome_notify::{ClientNotificationState, NotifyBus};
use tokio_util::sync::CancellationToken;

const USER: DbId = 1;

fn record_for(user_id: DbId, title: &str) -> NewNotification {
    NewNotification {
        recipient_user_id: user_id,
        kind: "adoption".into(),
        title: title.into(),
        body: "body".into(),
        source_event_id: 500,
        distance_km: Some(6),
    }
}

fn harness() -> (Arc<MemoryBackend>, Arc<NotifyBus>, ClientNotificationState) {
    let backend = Arc::new(MemoryBackend::default());
    let bus = Arc::new(NotifyBus::default());
    let state = ClientNotificationState::new(USER, backend.clone(), bus.clone());
    (backend, bus, state)
}

#[tokio::test]
async fn refresh_loads_newest_first_up_to_limit() {
    let (backend, _bus, state) = harness();
    for i in 0..25 {
        backend
            .create(record_for(USER, &format!("n{i}")))
            .await
            .unwrap();
    }
    // Another user's record never shows up in this state.
    backend.create(record_for(2, "other")).await.unwrap();

    state.refresh().await;

    let snapshot = state.snapshot().await;
    assert_eq!(snapshot.len(), 20);
    assert_eq!(snapshot[0].title, "n24");
    assert_eq!(snapshot[19].title, "n5");
    assert!(snapshot.iter().all(|n| n.recipient_user_id == USER));
    assert_eq!(state.unread_count().await, 20);
}

// Marking an already-read record is a no-op success everywhere.
#[tokio::test]
async fn mark_as_read_is_idempotent() {
    let (backend, _bus, state) = harness();
    let id = backend.create(record_for(USER, "n")).await.unwrap();
    state.refresh().await;

    state.mark_as_read(id).await;
    state.mark_as_read(id).await;

    assert_eq!(state.unread_count().await, 0);
    let stored = backend.notifications.lock().unwrap()[0].clone();
    assert!(stored.read);
}

#[tokio::test]
async fn mark_as_read_publishes_change_signal() {
    let (backend, bus, state) = harness();
    let id = backend.create(record_for(USER, "n")).await.unwrap();
    state.refresh().await;

    let mut rx = bus.subscribe();
    state.mark_as_read(id).await;

    assert_eq!(
        rx.recv().await.unwrap(),
        pawsome_notify::NotifyEvent::RecordRead { recipient: USER }
    );
}

// The optimistic flip is rolled back when the store rejects, silently.
#[tokio::test]
async fn rejected_mark_as_read_rolls_back() {
    let (backend, _bus, state) = harness();
    let id = backend.create(record_for(USER, "n")).await.unwrap();
    state.refresh().await;

    backend.fail_mark_read.store(true, Ordering::SeqCst);
    state.mark_as_read(id).await;

    let snapshot = state.snapshot().await;
    assert!(!snapshot[0].read, "local state must revert");
    assert_eq!(state.unread_count().await, 1);
    let stored = backend.notifications.lock().unwrap()[0].clone();
    assert!(!stored.read);
    // The failure is silent: no error string for the UI shell.
    assert_eq!(state.last_error().await, None);
}

#[tokio::test]
async fn failed_refresh_keeps_list_and_records_error() {
    let (backend, _bus, state) = harness();
    backend.create(record_for(USER, "n")).await.unwrap();
    state.refresh().await;
    assert_eq!(state.snapshot().await.len(), 1);

    backend.fail_list.store(true, Ordering::SeqCst);
    state.refresh().await;

    assert_eq!(state.snapshot().await.len(), 1, "previous list survives");
    assert_eq!(
        state.last_error().await.as_deref(),
        Some("Failed to fetch notifications")
    );

    backend.fail_list.store(false, Ordering::SeqCst);
    state.refresh().await;
    assert_eq!(state.last_error().await, None);
}

#[tokio::test]
async fn sign_out_clears_all_local_state() {
    let (backend, _bus, state) = harness();
    backend.create(record_for(USER, "n")).await.unwrap();
    state.refresh().await;
    state.check_permission(&Grant(true)).await;
    assert_eq!(state.snapshot().await.len(), 1);

    state.sign_out().await;

    assert!(state.snapshot().await.is_empty());
    assert_eq!(state.unread_count().await, 0);
    assert!(!state.permission_granted().await);
}

#[tokio::test]
async fn bus_events_refresh_the_list() {
    let (backend, bus, state) = harness();
    let state = Arc::new(state);

    let cancel = CancellationToken::new();
    let listener = tokio::spawn(state.clone().run(cancel.clone()));

    backend.create(record_for(USER, "fresh")).await.unwrap();
    bus.publish(pawsome_notify::NotifyEvent::RecordCreated { recipient: USER });

    // Wait for the listener to pick the event up and refresh.
    let mut refreshed = false;
    for _ in 0..100 {
        if !state.snapshot().await.is_empty() {
            refreshed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(refreshed, "listener should refresh on the change signal");

    cancel.cancel();
    listener.await.unwrap();
}

#[tokio::test]
async fn events_for_other_users_are_ignored() {
    let (backend, bus, state) = harness();
    let state = Arc::new(state);

    let cancel = CancellationToken::new();
    let listener = tokio::spawn(state.clone().run(cancel.clone()));

    backend.create(record_for(USER, "fresh")).await.unwrap();
    bus.publish(pawsome_notify::NotifyEvent::RecordCreated { recipient: 42 });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(state.snapshot().await.is_empty());

    cancel.cancel();
    listener.await.unwrap();
}

#[tokio::test]
async fn permission_probe_result_is_remembered() {
    let (_backend, _bus, state) = harness();
    assert!(!state.permission_granted().await);

    assert!(state.check_permission(&Grant(true)).await);
    assert!(state.permission_granted().await);

    assert!(!state.check_permission(&Grant(false)).await);
    assert!(!state.permission_granted().await);
}

/// Permission prompt double answering with a fixed verdict.
struct Grant(bool);

#[async_trait]
impl PushPermission for Grant {
    async fn request_permission(&self) -> bool {
        self.0
    }
}
