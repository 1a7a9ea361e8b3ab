//! Notification entity model and create DTO.

use pawsome_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// Immutable after insert except for `read`/`read_at` (flipped by the
/// owning client) and `delivered`/`delivered_at` (stamped by the delivery
/// job on confirmed dispatch).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_user_id: DbId,
    /// One of `adoption`, `event`, `like`.
    pub kind: String,
    pub title: String,
    pub body: String,
    pub source_event_id: DbId,
    /// Whole-kilometer distance frozen at fan-out time; never recomputed.
    pub distance_km: Option<i32>,
    pub read: bool,
    pub read_at: Option<Timestamp>,
    pub delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a notification. `created_at` is server-assigned and
/// `read`/`delivered` default to false.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_user_id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub source_event_id: DbId,
    pub distance_km: Option<i32>,
}
