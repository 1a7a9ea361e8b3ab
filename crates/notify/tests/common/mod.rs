//! In-memory backend driving the store/provider seams in tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pawsome_core::types::{DbId, RecipientProfile, Timestamp};
use pawsome_db::models::notification::{NewNotification, Notification};
use pawsome_db::models::push_request::{NewPushRequest, PushRequest};
use pawsome_notify::store::{
    DeliveryOutcome, NotificationStore, ProfileStore, PushError, PushProvider, PushRequestStore,
    StoreError,
};

/// Fixed base for generated `created_at` values so ordering is
/// deterministic.
const EPOCH_BASE: i64 = 1_700_000_000;

/// Shared in-memory document store with failure injection.
#[derive(Default)]
pub struct MemoryBackend {
    next_id: AtomicI64,
    seq: AtomicI64,
    pub profiles: Mutex<Vec<RecipientProfile>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub push_requests: Mutex<Vec<PushRequest>>,
    /// Recipient IDs whose notification insert fails.
    pub fail_create_for: Mutex<HashSet<DbId>>,
    /// When set, `mark_read` rejects.
    pub fail_mark_read: AtomicBool,
    /// When set, `list_for_user` rejects.
    pub fail_list: AtomicBool,
}

impl MemoryBackend {
    pub fn add_profile(&self, profile: RecipientProfile) {
        self.profiles.lock().unwrap().push(profile);
    }

    fn next_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_timestamp(&self) -> Timestamp {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(EPOCH_BASE + seq, 0).unwrap()
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn find_profile(&self, user_id: DbId) -> Result<Option<RecipientProfile>, StoreError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_push_enabled(&self) -> Result<Vec<RecipientProfile>, StoreError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.prefs.push_enabled)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryBackend {
    async fn create(&self, input: NewNotification) -> Result<DbId, StoreError> {
        if self
            .fail_create_for
            .lock()
            .unwrap()
            .contains(&input.recipient_user_id)
        {
            return Err(StoreError("injected create failure".into()));
        }

        let id = self.next_id();
        self.notifications.lock().unwrap().push(Notification {
            id,
            recipient_user_id: input.recipient_user_id,
            kind: input.kind,
            title: input.title,
            body: input.body,
            source_event_id: input.source_event_id,
            distance_km: input.distance_km,
            read: false,
            read_at: None,
            delivered: false,
            delivered_at: None,
            created_at: self.next_timestamp(),
        });
        Ok(id)
    }

    async fn list_for_user(
        &self,
        user_id: DbId,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError("injected list failure".into()));
        }
        let mut rows: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn mark_read(&self, id: DbId) -> Result<(), StoreError> {
        if self.fail_mark_read.load(Ordering::SeqCst) {
            return Err(StoreError("injected mark-read failure".into()));
        }
        let mut rows = self.notifications.lock().unwrap();
        if let Some(n) = rows.iter_mut().find(|n| n.id == id && !n.read) {
            n.read = true;
            n.read_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_delivered(&self, id: DbId) -> Result<(), StoreError> {
        let mut rows = self.notifications.lock().unwrap();
        if let Some(n) = rows.iter_mut().find(|n| n.id == id) {
            n.delivered = true;
            n.delivered_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn unread_count(&self, user_id: DbId) -> Result<i64, StoreError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_user_id == user_id && !n.read)
            .count() as i64)
    }
}

#[async_trait]
impl PushRequestStore for MemoryBackend {
    async fn stage(&self, input: NewPushRequest) -> Result<DbId, StoreError> {
        let id = self.next_id();
        self.push_requests.lock().unwrap().push(PushRequest {
            id,
            notification_id: input.notification_id,
            recipient_user_id: input.recipient_user_id,
            title: input.title,
            body: input.body,
            payload: input.payload,
            processed: false,
            processed_at: None,
            result_message_id: None,
            error: None,
            created_at: self.next_timestamp(),
        });
        Ok(id)
    }

    async fn find(&self, id: DbId) -> Result<Option<PushRequest>, StoreError> {
        Ok(self
            .push_requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn mark_processed(
        &self,
        id: DbId,
        outcome: &DeliveryOutcome,
    ) -> Result<bool, StoreError> {
        let mut rows = self.push_requests.lock().unwrap();
        let Some(request) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        if request.processed {
            return Ok(false);
        }
        request.processed = true;
        request.processed_at = Some(self.next_timestamp());
        match outcome {
            DeliveryOutcome::Delivered { message_id } => {
                request.result_message_id = Some(message_id.clone());
            }
            DeliveryOutcome::Failed { error } => {
                request.error = Some(error.clone());
            }
        }
        Ok(true)
    }

    async fn list_unprocessed(&self, limit: i64) -> Result<Vec<PushRequest>, StoreError> {
        Ok(self
            .push_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.processed)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn prune_processed_before(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        let mut rows = self.push_requests.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.processed && r.processed_at.is_some_and(|t| t < cutoff)));
        Ok((before - rows.len()) as u64)
    }
}

/// A dispatched push captured by [`MockPushProvider`].
#[derive(Debug, Clone)]
pub struct SentPush {
    pub address: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

/// Push provider double recording every dispatch.
#[derive(Default)]
pub struct MockPushProvider {
    counter: AtomicI64,
    pub sent: Mutex<Vec<SentPush>>,
    /// When set, every dispatch fails.
    pub fail: AtomicBool,
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(
        &self,
        address: &str,
        title: &str,
        body: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<String, PushError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PushError("provider unavailable".into()));
        }
        self.sent.lock().unwrap().push(SentPush {
            address: address.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data: data.clone(),
        });
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("push-msg-{n}"))
    }
}
