//! Signed-in user's notification state.
//!
//! [`ClientNotificationState`] is the read-side companion to the fan-out:
//! it holds the current user's notification list and unread count, applies
//! read-state changes optimistically, and refreshes itself whenever the
//! [`NotifyBus`] signals a change for that user. All of its failure modes
//! are silent to the user: a failed refresh records an error string for
//! the UI shell, a failed mark-as-read rolls back and logs.

use std::sync::Arc;

use async_trait::async_trait;
use pawsome_core::types::DbId;
use pawsome_db::models::notification::Notification;
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::bus::{NotifyBus, NotifyEvent};
use crate::optimistic;
use crate::store::NotificationStore;

/// How many records a refresh fetches.
const FETCH_LIMIT: usize = 20;

/// Platform push-permission prompt, implemented by the UI shell.
#[async_trait]
pub trait PushPermission: Send + Sync {
    /// Ask the platform (and possibly the user) for push permission.
    async fn request_permission(&self) -> bool;
}

#[derive(Default)]
struct Inner {
    notifications: Vec<Notification>,
    permission_granted: bool,
    last_error: Option<String>,
}

/// Notification list, unread count, and permission status for one
/// signed-in user.
pub struct ClientNotificationState {
    user_id: DbId,
    store: Arc<dyn NotificationStore>,
    bus: Arc<NotifyBus>,
    inner: Mutex<Inner>,
}

impl ClientNotificationState {
    pub fn new(user_id: DbId, store: Arc<dyn NotificationStore>, bus: Arc<NotifyBus>) -> Self {
        Self {
            user_id,
            store,
            bus,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Re-fetch the user's notifications from the store.
    ///
    /// Store failures do not surface as errors to the caller; the previous
    /// list is kept and an error string is recorded for the UI shell.
    pub async fn refresh(&self) {
        match self.store.list_for_user(self.user_id, FETCH_LIMIT).await {
            Ok(notifications) => {
                let mut inner = self.inner.lock().await;
                inner.notifications = notifications;
                inner.last_error = None;
            }
            Err(e) => {
                tracing::warn!(user_id = self.user_id, error = %e, "Failed to fetch notifications");
                self.inner.lock().await.last_error = Some("Failed to fetch notifications".into());
            }
        }
    }

    /// Current snapshot of the list, newest first.
    pub async fn snapshot(&self) -> Vec<Notification> {
        self.inner.lock().await.notifications.clone()
    }

    /// Count of local records with `read == false`.
    pub async fn unread_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Last silent failure, for the UI shell to render if it wants to.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    /// Mark a notification read.
    ///
    /// The local flip happens immediately; if the store rejects the write
    /// the flip is rolled back and the failure is logged, never surfaced
    /// as a dialog. The UI can never be left showing a read state the
    /// store refused.
    pub async fn mark_as_read(&self, id: DbId) {
        let result = optimistic::apply_with_rollback(
            &self.inner,
            |inner| {
                // Undo token: whether this call actually flipped the flag.
                match inner
                    .notifications
                    .iter_mut()
                    .find(|n| n.id == id && !n.read)
                {
                    Some(n) => {
                        n.read = true;
                        true
                    }
                    None => false,
                }
            },
            self.store.mark_read(id),
            |inner, flipped| {
                if flipped {
                    if let Some(n) = inner.notifications.iter_mut().find(|n| n.id == id) {
                        n.read = false;
                    }
                }
            },
        )
        .await;

        match result {
            Ok(()) => {
                self.bus.publish(NotifyEvent::RecordRead {
                    recipient: self.user_id,
                });
            }
            Err(e) => {
                tracing::warn!(
                    user_id = self.user_id,
                    notification_id = id,
                    error = %e,
                    "Mark-as-read rejected, optimistic update rolled back"
                );
            }
        }
    }

    /// Resolve push permission through the platform prompt and remember
    /// the answer.
    pub async fn check_permission(&self, prompt: &dyn PushPermission) -> bool {
        let granted = prompt.request_permission().await;
        self.inner.lock().await.permission_granted = granted;
        granted
    }

    pub async fn permission_granted(&self) -> bool {
        self.inner.lock().await.permission_granted
    }

    /// Drop all local state immediately. Called on sign-out so nothing
    /// leaks across users.
    pub async fn sign_out(&self) {
        *self.inner.lock().await = Inner::default();
    }

    /// Follow the change signal until `cancel` fires.
    ///
    /// Refreshes on every event concerning this user; a lagged receiver
    /// refreshes unconditionally since events were dropped.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut receiver = self.bus.subscribe();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(user_id = self.user_id, "Notification state listener cancelled");
                    break;
                }
                event = receiver.recv() => match event {
                    Ok(event) if event.recipient() == self.user_id => {
                        self.refresh().await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Notification listener lagged, refreshing");
                        self.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Notify bus closed, listener shutting down");
                        break;
                    }
                },
            }
        }
    }
}
