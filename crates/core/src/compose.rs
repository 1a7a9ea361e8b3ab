//! Notification title/body templates.
//!
//! Rendered exactly once at fan-out time; stored records are never
//! re-rendered.

use crate::types::{EventKind, NotifiableEvent};

/// A rendered notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

/// Render the kind-specific title and body for an eligible recipient.
///
/// A rounded distance of zero kilometers reads as "near you" rather than
/// "0km away"; a missing pet/event name falls back to a generic label.
pub fn render(event: &NotifiableEvent, distance_km: Option<u32>) -> Message {
    let proximity = match distance_km {
        Some(d) if d > 0 => format!(" {d}km away"),
        _ => " near you".to_string(),
    };

    match event.kind {
        EventKind::Adoption => {
            let pet = event.name.as_deref().unwrap_or("A pet");
            Message {
                title: "\u{1F43E} New Pet Available for Adoption".to_string(),
                body: format!("{pet} is available for adoption{proximity}"),
            }
        }
        EventKind::Event => {
            let name = event.name.as_deref().unwrap_or("An event");
            Message {
                title: "\u{1F4C5} New Event Near You".to_string(),
                body: format!("{name} has been posted{proximity}"),
            }
        }
    }
}
