//! Shared id, timestamp, and location types.

use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A canonical geographic coordinate.
///
/// All internal logic works on this shape. External payloads that carry
/// locations under legacy field names are normalized into it at the
/// ingestion boundary via [`RawLocation`]; nothing past that boundary
/// branches on field-name variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coord {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Location shape as it appears in external post/event payloads.
///
/// Older documents store `lat`/`lng`, newer ones `latitude`/`longitude`,
/// and either member may be missing entirely. [`RawLocation::normalize`]
/// collapses the variants into an optional [`Coord`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl RawLocation {
    /// Resolve to a canonical [`Coord`], preferring the full field names.
    ///
    /// Returns `None` when neither naming variant supplies both components.
    pub fn normalize(&self) -> Option<Coord> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coord {
                latitude,
                longitude,
            }),
            _ => match (self.lat, self.lng) {
                (Some(latitude), Some(longitude)) => Some(Coord {
                    latitude,
                    longitude,
                }),
                _ => None,
            },
        }
    }
}

/// Kind of entity that can trigger proximity notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Adoption,
    Event,
}

/// Kind of a stored notification record.
///
/// `Like` records exist in the store (created by the reaction flows) but
/// are never produced by the proximity fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Adoption,
    Event,
    Like,
}

impl NotificationKind {
    /// Database string value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adoption => "adoption",
            Self::Event => "event",
            Self::Like => "like",
        }
    }

    /// Parse the database string value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "adoption" => Some(Self::Adoption),
            "event" => Some(Self::Event),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

impl From<EventKind> for NotificationKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Adoption => Self::Adoption,
            EventKind::Event => Self::Event,
        }
    }
}

/// An adoption listing or calendar event at the moment of creation.
///
/// Read exactly once by the fan-out when the primary write has committed;
/// never re-evaluated afterwards.
#[derive(Debug, Clone)]
pub struct NotifiableEvent {
    pub id: DbId,
    pub kind: EventKind,
    /// Pet name for adoptions, event name for events. `None` falls back to
    /// a generic label in the rendered body.
    pub name: Option<String>,
    pub location: Option<Coord>,
    pub created_by: DbId,
}

/// Per-user notification opt-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub push_enabled: bool,
    pub adoption_alerts_enabled: bool,
    pub event_alerts_enabled: bool,
    /// Notification radius in kilometers; `None` means the 50 km default.
    pub radius_km: Option<f64>,
}

/// The subset of a user profile the notification subsystem reads.
#[derive(Debug, Clone)]
pub struct RecipientProfile {
    pub user_id: DbId,
    pub location: Option<Coord>,
    pub prefs: NotificationPrefs,
    /// Platform push address (device token); resolved again at delivery
    /// time, so staging never snapshots it.
    pub push_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefers_full_field_names() {
        let raw = RawLocation {
            latitude: Some(40.0),
            longitude: Some(-74.0),
            lat: Some(1.0),
            lng: Some(2.0),
        };
        let coord = raw.normalize().unwrap();
        assert_eq!(coord.latitude, 40.0);
        assert_eq!(coord.longitude, -74.0);
    }

    #[test]
    fn normalize_accepts_legacy_lat_lng() {
        let raw = RawLocation {
            lat: Some(51.5),
            lng: Some(-0.12),
            ..Default::default()
        };
        let coord = raw.normalize().unwrap();
        assert_eq!(coord.latitude, 51.5);
        assert_eq!(coord.longitude, -0.12);
    }

    #[test]
    fn normalize_rejects_partial_pairs() {
        let raw = RawLocation {
            latitude: Some(40.0),
            lng: Some(-74.0),
            ..Default::default()
        };
        assert!(raw.normalize().is_none());
        assert!(RawLocation::default().normalize().is_none());
    }

    #[test]
    fn notification_kind_round_trips_db_strings() {
        for kind in [
            NotificationKind::Adoption,
            NotificationKind::Event,
            NotificationKind::Like,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("poll"), None);
    }

    #[test]
    fn event_kind_maps_into_notification_kind() {
        assert_eq!(
            NotificationKind::from(EventKind::Adoption),
            NotificationKind::Adoption
        );
        assert_eq!(
            NotificationKind::from(EventKind::Event),
            NotificationKind::Event
        );
    }
}
