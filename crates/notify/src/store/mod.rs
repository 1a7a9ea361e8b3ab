//! Store and provider seams.
//!
//! The subsystem talks to its document store and push platform through
//! these traits so the fan-out, delivery, and client components stay
//! independent of the concrete backend. [`pg::PgStores`] is the production
//! Postgres adapter; tests drive the same surfaces with an in-memory
//! backend.

pub mod pg;

use std::collections::BTreeMap;

use async_trait::async_trait;
use pawsome_core::types::{DbId, RecipientProfile, Timestamp};
use pawsome_db::models::notification::{NewNotification, Notification};
use pawsome_db::models::push_request::{NewPushRequest, PushRequest};

/// Generic storage-failure condition.
///
/// Store-layer errors surface to the immediate caller as this single
/// opaque condition; the fan-out treats it as a per-recipient failure and
/// the client rolls back its optimistic state.
#[derive(Debug, thiserror::Error)]
#[error("storage failure: {0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self(err.to_string())
    }
}

/// Failure to dispatch a platform push message.
#[derive(Debug, thiserror::Error)]
#[error("push dispatch failed: {0}")]
pub struct PushError(pub String);

/// Terminal result recorded on a processed push request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The provider accepted the message.
    Delivered { message_id: String },
    /// Delivery was attempted (or was impossible) and the reason was
    /// recorded. Still terminal: the job never retries.
    Failed { error: String },
}

/// Read access to user profiles (owned and written by the external
/// profile flow).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, user_id: DbId) -> Result<Option<RecipientProfile>, StoreError>;

    /// All users with push notifications enabled: the broad fan-out
    /// candidate scan.
    async fn list_push_enabled(&self) -> Result<Vec<RecipientProfile>, StoreError>;
}

/// Notification record store.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a record; the backend assigns `created_at` and defaults
    /// `read`/`delivered` to false. Missing optional fields never reject.
    async fn create(&self, input: NewNotification) -> Result<DbId, StoreError>;

    /// Up to `limit` records for `user_id`, newest first. Ordering is an
    /// application-space sort over an equality-only fetch.
    async fn list_for_user(
        &self,
        user_id: DbId,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Idempotent: marking an already-read record is a no-op success.
    async fn mark_read(&self, id: DbId) -> Result<(), StoreError>;

    async fn mark_delivered(&self, id: DbId) -> Result<(), StoreError>;

    async fn unread_count(&self, user_id: DbId) -> Result<i64, StoreError>;
}

/// Staged push delivery request store.
#[async_trait]
pub trait PushRequestStore: Send + Sync {
    async fn stage(&self, input: NewPushRequest) -> Result<DbId, StoreError>;

    async fn find(&self, id: DbId) -> Result<Option<PushRequest>, StoreError>;

    /// Apply the single terminal `processed = false -> true` transition.
    ///
    /// Returns `false` when the request was already processed, in which
    /// case nothing was written.
    async fn mark_processed(
        &self,
        id: DbId,
        outcome: &DeliveryOutcome,
    ) -> Result<bool, StoreError>;

    async fn list_unprocessed(&self, limit: i64) -> Result<Vec<PushRequest>, StoreError>;

    /// Delete processed requests whose terminal transition happened before
    /// `cutoff`; staged requests are never touched.
    async fn prune_processed_before(&self, cutoff: Timestamp) -> Result<u64, StoreError>;
}

/// Platform push delivery provider.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Dispatch one message to `address`, returning the provider message
    /// ID on acceptance.
    async fn send(
        &self,
        address: &str,
        title: &str,
        body: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<String, PushError>;
}
