//! Repository for the `push_delivery_requests` table.

use pawsome_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::push_request::{NewPushRequest, PushRequest};

/// Column list for `push_delivery_requests` queries.
const COLUMNS: &str = "id, notification_id, recipient_user_id, title, body, payload, \
                        processed, processed_at, result_message_id, error, created_at";

/// Provides staging and terminal-transition operations for push delivery
/// requests.
pub struct PushRequestRepo;

impl PushRequestRepo {
    /// Stage a new delivery request, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &NewPushRequest) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO push_delivery_requests \
                (notification_id, recipient_user_id, title, body, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(input.notification_id)
        .bind(input.recipient_user_id)
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.payload)
        .fetch_one(pool)
        .await
    }

    /// Fetch a request by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PushRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM push_delivery_requests WHERE id = $1");
        sqlx::query_as::<_, PushRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply the terminal transition, recording either a provider message
    /// ID or an error message.
    ///
    /// The `processed = false` predicate makes the transition single-shot
    /// at the database level: a second caller observes zero affected rows
    /// and writes nothing. Returns whether this call performed the
    /// transition.
    pub async fn mark_processed(
        pool: &PgPool,
        id: DbId,
        result_message_id: Option<&str>,
        error: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE push_delivery_requests \
             SET processed = true, processed_at = NOW(), result_message_id = $2, error = $3 \
             WHERE id = $1 AND processed = false",
        )
        .bind(id)
        .bind(result_message_id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List staged requests awaiting delivery, oldest first.
    pub async fn list_unprocessed(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<PushRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM push_delivery_requests \
             WHERE processed = false \
             ORDER BY id ASC \
             LIMIT $1"
        );
        sqlx::query_as::<_, PushRequest>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete processed requests older than `cutoff`, returning the count.
    ///
    /// Retention touches processed rows only; staged requests are never
    /// pruned.
    pub async fn delete_processed_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM push_delivery_requests \
             WHERE processed = true AND processed_at < $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
