//! Event-to-notification fan-out.
//!
//! [`FanOutOrchestrator`] turns one freshly created adoption post or
//! calendar event into per-recipient notification records and staged push
//! requests. It runs after the triggering write has already committed and
//! is best effort throughout: no recipient's failure aborts the others,
//! and nothing propagates back to the creation flow.

use std::sync::Arc;

use pawsome_core::types::{NotifiableEvent, NotificationKind, RecipientProfile};
use pawsome_core::{compose, eligibility};
use pawsome_db::models::notification::NewNotification;
use pawsome_db::models::push_request::NewPushRequest;

use crate::bus::{NotifyBus, NotifyEvent};
use crate::store::{NotificationStore, ProfileStore, PushRequestStore, StoreError};

/// Fans a created event out to all eligible recipients.
pub struct FanOutOrchestrator {
    profiles: Arc<dyn ProfileStore>,
    notifications: Arc<dyn NotificationStore>,
    push_requests: Arc<dyn PushRequestStore>,
    bus: Arc<NotifyBus>,
}

impl FanOutOrchestrator {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        notifications: Arc<dyn NotificationStore>,
        push_requests: Arc<dyn PushRequestStore>,
        bus: Arc<NotifyBus>,
    ) -> Self {
        Self {
            profiles,
            notifications,
            push_requests,
            bus,
        }
    }

    /// Process a newly created event.
    ///
    /// Called by the post/event CRUD flows immediately after their primary
    /// write succeeds, typically via `tokio::spawn`; the post exists
    /// correctly even if this never completes. Never returns an error; a
    /// failed candidate scan is logged and the fan-out ends.
    pub async fn on_event_created(&self, event: NotifiableEvent) {
        let candidates = match self.profiles.list_push_enabled().await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_id = event.id,
                    "Failed to load fan-out candidates"
                );
                return;
            }
        };

        let mut notified = 0usize;
        for profile in &candidates {
            // Creators never notify themselves.
            if profile.user_id == event.created_by {
                continue;
            }

            match self.notify_recipient(profile, &event).await {
                Ok(true) => notified += 1,
                Ok(false) => {}
                Err(e) => {
                    // Per-recipient isolation: log and move on.
                    tracing::warn!(
                        user_id = profile.user_id,
                        event_id = event.id,
                        error = %e,
                        "Skipping recipient after fan-out failure"
                    );
                }
            }
        }

        tracing::info!(
            event_id = event.id,
            candidates = candidates.len(),
            notified,
            "Fan-out complete"
        );
    }

    /// Evaluate, persist, and stage delivery for a single recipient.
    ///
    /// Returns whether a notification was created. Steps are strictly
    /// sequential for one recipient; recipients are independent of each
    /// other.
    async fn notify_recipient(
        &self,
        profile: &RecipientProfile,
        event: &NotifiableEvent,
    ) -> Result<bool, StoreError> {
        let verdict = eligibility::evaluate(profile, event);
        if !verdict.notify {
            return Ok(false);
        }

        // Rendered exactly once; the stored record is never re-rendered.
        let message = compose::render(event, verdict.distance_km);
        let kind = NotificationKind::from(event.kind);

        let notification_id = self
            .notifications
            .create(NewNotification {
                recipient_user_id: profile.user_id,
                kind: kind.as_str().to_string(),
                title: message.title.clone(),
                body: message.body.clone(),
                source_event_id: event.id,
                distance_km: verdict.distance_km.map(|d| d as i32),
            })
            .await?;

        self.push_requests
            .stage(NewPushRequest {
                notification_id: Some(notification_id),
                recipient_user_id: profile.user_id,
                title: message.title,
                body: message.body,
                payload: serde_json::json!({
                    "post_id": event.id.to_string(),
                    "kind": kind.as_str(),
                }),
            })
            .await?;

        self.bus.publish(NotifyEvent::RecordCreated {
            recipient: profile.user_id,
        });

        Ok(true)
    }
}
