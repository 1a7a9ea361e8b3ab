//! User entity model.

use pawsome_core::types::{Coord, DbId, NotificationPrefs, RecipientProfile, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Profile content (display name, avatar, bio) is owned by the external
/// profile flow; the notification subsystem reads the location, opt-in,
/// and push-address columns and writes nothing else.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_captured_at: Option<Timestamp>,
    pub location_accuracy_m: Option<f64>,
    pub push_enabled: bool,
    pub adoption_alerts_enabled: bool,
    pub event_alerts_enabled: bool,
    pub radius_km: Option<f64>,
    pub push_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Project the row onto the subset the notification core reads.
    ///
    /// A row with only one location component is treated as having no
    /// location at all.
    pub fn recipient_profile(&self) -> RecipientProfile {
        let location = match (self.location_lat, self.location_lng) {
            (Some(lat), Some(lng)) => Some(Coord::new(lat, lng)),
            _ => None,
        };
        RecipientProfile {
            user_id: self.id,
            location,
            prefs: NotificationPrefs {
                push_enabled: self.push_enabled,
                adoption_alerts_enabled: self.adoption_alerts_enabled,
                event_alerts_enabled: self.event_alerts_enabled,
                radius_km: self.radius_km,
            },
            push_address: self.push_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row() -> User {
        User {
            id: 7,
            display_name: "Dana".into(),
            location_lat: Some(40.7),
            location_lng: Some(-74.0),
            location_captured_at: Some(Utc::now()),
            location_accuracy_m: Some(12.5),
            push_enabled: true,
            adoption_alerts_enabled: true,
            event_alerts_enabled: false,
            radius_km: Some(25.0),
            push_address: Some("tok".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn profile_projection_carries_settings() {
        let profile = row().recipient_profile();
        assert_eq!(profile.user_id, 7);
        assert_eq!(profile.location.unwrap().latitude, 40.7);
        assert!(profile.prefs.push_enabled);
        assert!(!profile.prefs.event_alerts_enabled);
        assert_eq!(profile.prefs.radius_km, Some(25.0));
        assert_eq!(profile.push_address.as_deref(), Some("tok"));
    }

    #[test]
    fn partial_location_projects_as_none() {
        let mut user = row();
        user.location_lng = None;
        assert!(user.recipient_profile().location.is_none());
    }
}
