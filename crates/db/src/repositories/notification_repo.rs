//! Repository for the `notifications` table.

use pawsome_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{NewNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, recipient_user_id, kind, title, body, source_event_id, distance_km, \
                        read, read_at, delivered, delivered_at, created_at";

/// Provides CRUD operations for notification records.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the generated ID.
    ///
    /// `created_at` is assigned by the server; `read` and `delivered`
    /// default to false.
    pub async fn create(pool: &PgPool, input: &NewNotification) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications \
                (recipient_user_id, kind, title, body, source_event_id, distance_km) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(input.recipient_user_id)
        .bind(&input.kind)
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.source_event_id)
        .bind(input.distance_km)
        .fetch_one(pool)
        .await
    }

    /// List up to `limit` notifications for a user, newest first.
    ///
    /// The fetch filters on recipient equality only and the ordering is
    /// applied here in application space: the store contract guarantees
    /// equality queries but no composite server-side index, and this keeps
    /// the repository portable to backends without one.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: usize,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE recipient_user_id = $1");
        let mut rows = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    /// Mark a single notification as read.
    ///
    /// Idempotent: marking an already-read record is a no-op success.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notifications SET read = true, read_at = NOW() \
             WHERE id = $1 AND read = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Stamp a notification delivered. Only the delivery job calls this,
    /// after a confirmed push dispatch.
    pub async fn mark_delivered(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notifications SET delivered = true, delivered_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_user_id = $1 AND read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
