//! Postgres adapters over the repository layer.

use async_trait::async_trait;
use pawsome_core::types::{DbId, RecipientProfile, Timestamp};
use pawsome_db::models::notification::{NewNotification, Notification};
use pawsome_db::models::push_request::{NewPushRequest, PushRequest};
use pawsome_db::repositories::{NotificationRepo, PushRequestRepo, UserRepo};
use pawsome_db::DbPool;

use super::{DeliveryOutcome, NotificationStore, ProfileStore, PushRequestStore, StoreError};

/// Postgres-backed implementation of all three store traits.
///
/// Cheap to clone; one value is shared as `Arc<PgStores>` and coerced to
/// whichever trait object a component needs.
#[derive(Clone)]
pub struct PgStores {
    pool: DbPool,
}

impl PgStores {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgStores {
    async fn find_profile(&self, user_id: DbId) -> Result<Option<RecipientProfile>, StoreError> {
        let user = UserRepo::find_by_id(&self.pool, user_id).await?;
        Ok(user.map(|u| u.recipient_profile()))
    }

    async fn list_push_enabled(&self) -> Result<Vec<RecipientProfile>, StoreError> {
        let users = UserRepo::list_push_enabled(&self.pool).await?;
        Ok(users.iter().map(|u| u.recipient_profile()).collect())
    }
}

#[async_trait]
impl NotificationStore for PgStores {
    async fn create(&self, input: NewNotification) -> Result<DbId, StoreError> {
        Ok(NotificationRepo::create(&self.pool, &input).await?)
    }

    async fn list_for_user(
        &self,
        user_id: DbId,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        Ok(NotificationRepo::list_for_user(&self.pool, user_id, limit).await?)
    }

    async fn mark_read(&self, id: DbId) -> Result<(), StoreError> {
        Ok(NotificationRepo::mark_read(&self.pool, id).await?)
    }

    async fn mark_delivered(&self, id: DbId) -> Result<(), StoreError> {
        Ok(NotificationRepo::mark_delivered(&self.pool, id).await?)
    }

    async fn unread_count(&self, user_id: DbId) -> Result<i64, StoreError> {
        Ok(NotificationRepo::unread_count(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl PushRequestStore for PgStores {
    async fn stage(&self, input: NewPushRequest) -> Result<DbId, StoreError> {
        Ok(PushRequestRepo::create(&self.pool, &input).await?)
    }

    async fn find(&self, id: DbId) -> Result<Option<PushRequest>, StoreError> {
        Ok(PushRequestRepo::find_by_id(&self.pool, id).await?)
    }

    async fn mark_processed(
        &self,
        id: DbId,
        outcome: &DeliveryOutcome,
    ) -> Result<bool, StoreError> {
        let (message_id, error) = match outcome {
            DeliveryOutcome::Delivered { message_id } => (Some(message_id.as_str()), None),
            DeliveryOutcome::Failed { error } => (None, Some(error.as_str())),
        };
        Ok(PushRequestRepo::mark_processed(&self.pool, id, message_id, error).await?)
    }

    async fn list_unprocessed(&self, limit: i64) -> Result<Vec<PushRequest>, StoreError> {
        Ok(PushRequestRepo::list_unprocessed(&self.pool, limit).await?)
    }

    async fn prune_processed_before(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        Ok(PushRequestRepo::delete_processed_before(&self.pool, cutoff).await?)
    }
}
