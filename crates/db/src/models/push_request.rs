//! Push delivery request model and create DTO.

use pawsome_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `push_delivery_requests` table.
///
/// Staged by the fan-out and consumed by the delivery job. The only legal
/// mutation is the single terminal transition `processed = false -> true`;
/// a processed row is inert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushRequest {
    pub id: DbId,
    /// Back-reference to the notification record this push materializes,
    /// if any.
    pub notification_id: Option<DbId>,
    pub recipient_user_id: DbId,
    pub title: String,
    pub body: String,
    /// Flat string map forwarded as the platform message's data payload.
    pub payload: serde_json::Value,
    pub processed: bool,
    pub processed_at: Option<Timestamp>,
    pub result_message_id: Option<String>,
    pub error: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for staging a push delivery request.
#[derive(Debug, Clone)]
pub struct NewPushRequest {
    pub notification_id: Option<DbId>,
    pub recipient_user_id: DbId,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
}
