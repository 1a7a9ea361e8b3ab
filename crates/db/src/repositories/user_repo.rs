//! Repository for the `users` table.

use pawsome_core::types::{Coord, DbId};
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, display_name, location_lat, location_lng, location_captured_at, \
                        location_accuracy_m, push_enabled, adoption_alerts_enabled, \
                        event_alerts_enabled, radius_km, push_address, created_at, updated_at";

/// Provides read and boundary-write operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users that have push notifications enabled.
    ///
    /// Fan-out candidates come from this broad equality scan, not a spatial
    /// index; this is the subsystem's known scaling ceiling.
    pub async fn list_push_enabled(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE push_enabled = true");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Store a fresh location fix for a user.
    pub async fn update_location(
        pool: &PgPool,
        id: DbId,
        coord: Coord,
        accuracy_m: Option<f64>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users \
             SET location_lat = $2, location_lng = $3, location_captured_at = NOW(), \
                 location_accuracy_m = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(coord.latitude)
        .bind(coord.longitude)
        .bind(accuracy_m)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Save the platform push address issued for a user's device.
    pub async fn set_push_address(
        pool: &PgPool,
        id: DbId,
        address: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET push_address = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(address)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Drop a user's push address (sign-out / revocation).
    pub async fn clear_push_address(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET push_address = NULL, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
