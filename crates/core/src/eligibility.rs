//! Per-(recipient, event) notification eligibility.
//!
//! The rules run in order and short-circuit at the first failing check:
//!
//! 1. the recipient has a stored location and push notifications enabled;
//! 2. the per-kind toggle (adoption/event alerts) is on;
//! 3. the event carries a usable location;
//! 4. the event lies within the recipient's radius (50 km when unset);
//! 5. the recipient is not the event's creator.
//!
//! On success the approximate distance is computed once, rounded to whole
//! kilometers, and frozen into the resulting notification record.

use crate::geo;
use crate::types::{EventKind, NotifiableEvent, RecipientProfile};

/// Radius applied when a recipient has not configured one.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Outcome of an eligibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub notify: bool,
    /// Rounded whole-kilometer distance; present only when `notify` is true.
    pub distance_km: Option<u32>,
}

impl Eligibility {
    fn skip() -> Self {
        Self {
            notify: false,
            distance_km: None,
        }
    }
}

/// Decide whether `recipient` should be notified about `event`.
///
/// Never fails: malformed or incomplete inputs resolve to "do not notify".
pub fn evaluate(recipient: &RecipientProfile, event: &NotifiableEvent) -> Eligibility {
    // Self-notification is always suppressed, independent of preferences.
    if recipient.user_id == event.created_by {
        return Eligibility::skip();
    }

    let Some(user_location) = recipient.location else {
        return Eligibility::skip();
    };
    if !recipient.prefs.push_enabled {
        return Eligibility::skip();
    }

    let kind_enabled = match event.kind {
        EventKind::Adoption => recipient.prefs.adoption_alerts_enabled,
        EventKind::Event => recipient.prefs.event_alerts_enabled,
    };
    if !kind_enabled {
        return Eligibility::skip();
    }

    let Some(event_location) = event.location else {
        return Eligibility::skip();
    };

    let radius = recipient.prefs.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !geo::is_within_radius(user_location, event_location, radius) {
        return Eligibility::skip();
    }

    Eligibility {
        notify: true,
        distance_km: Some(geo::rounded_distance_km(user_location, event_location)),
    }
}
