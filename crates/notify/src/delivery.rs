//! Push delivery: the per-request job and the polling worker.
//!
//! A [`DeliveryJob`] invocation consumes one staged
//! [`PushRequest`](pawsome_db::models::push_request::PushRequest) at most
//! once: it checks the `processed` guard at entry, resolves the recipient's
//! current push address, makes a single dispatch attempt, and records the
//! terminal outcome. Re-invocation on a processed request is a no-op, so
//! an at-least-once trigger platform cannot double-send.
//!
//! [`DeliveryWorker`] is that trigger platform here: a polling loop that
//! picks up staged requests and invokes the job for each.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use pawsome_core::types::DbId;
use pawsome_db::models::push_request::PushRequest;
use tokio_util::sync::CancellationToken;

use crate::bus::{NotifyBus, NotifyEvent};
use crate::store::{
    DeliveryOutcome, NotificationStore, ProfileStore, PushProvider, PushRequestStore, StoreError,
};

/// Error recorded when the recipient has no stored push address.
const ERR_NO_PUSH_ADDRESS: &str = "No push address";

/// Error recorded when the recipient row no longer exists.
const ERR_USER_NOT_FOUND: &str = "User not found";

// ---------------------------------------------------------------------------
// DeliveryJob
// ---------------------------------------------------------------------------

/// Processes one staged push delivery request at most once.
pub struct DeliveryJob {
    profiles: Arc<dyn ProfileStore>,
    notifications: Arc<dyn NotificationStore>,
    push_requests: Arc<dyn PushRequestStore>,
    provider: Arc<dyn PushProvider>,
    bus: Arc<NotifyBus>,
}

impl DeliveryJob {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        notifications: Arc<dyn NotificationStore>,
        push_requests: Arc<dyn PushRequestStore>,
        provider: Arc<dyn PushProvider>,
        bus: Arc<NotifyBus>,
    ) -> Self {
        Self {
            profiles,
            notifications,
            push_requests,
            provider,
            bus,
        }
    }

    /// Process the request with the given ID.
    ///
    /// Terminal in one invocation: afterwards the request is `processed`
    /// with either a provider message ID or an error, and any further
    /// invocation returns at the entry guard without side effects. The job
    /// performs no retries; a transient provider failure is recorded as the
    /// terminal outcome and re-staging is a manual operation.
    pub async fn process(&self, request_id: DbId) -> Result<(), StoreError> {
        let Some(request) = self.push_requests.find(request_id).await? else {
            tracing::warn!(request_id, "Push request not found, ignoring trigger");
            return Ok(());
        };

        // Idempotency guard: redelivered triggers stop here.
        if request.processed {
            tracing::debug!(request_id, "Push request already processed, skipping");
            return Ok(());
        }

        // Resolve the address at delivery time, not staging time, so a
        // rotated or revoked address is honored.
        let profile = self.profiles.find_profile(request.recipient_user_id).await?;
        let address = match profile {
            None => {
                return self
                    .finish(&request, DeliveryOutcome::failed(ERR_USER_NOT_FOUND))
                    .await;
            }
            Some(profile) => match profile.push_address {
                // Expected outcome, not a crash: the user simply has no
                // registered device.
                None => {
                    return self
                        .finish(&request, DeliveryOutcome::failed(ERR_NO_PUSH_ADDRESS))
                        .await;
                }
                Some(address) => address,
            },
        };

        let data = payload_data(&request);
        let outcome = match self
            .provider
            .send(&address, &request.title, &request.body, &data)
            .await
        {
            Ok(message_id) => {
                tracing::info!(request_id, message_id, "Push dispatched");
                DeliveryOutcome::Delivered { message_id }
            }
            Err(e) => {
                tracing::warn!(request_id, error = %e, "Push dispatch failed");
                DeliveryOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        self.finish(&request, outcome).await
    }

    /// Record the terminal outcome and raise the change signal.
    async fn finish(
        &self,
        request: &PushRequest,
        outcome: DeliveryOutcome,
    ) -> Result<(), StoreError> {
        let transitioned = self
            .push_requests
            .mark_processed(request.id, &outcome)
            .await?;
        if !transitioned {
            // A concurrent invocation won the terminal transition.
            tracing::debug!(request_id = request.id, "Lost processed transition race");
            return Ok(());
        }

        if let DeliveryOutcome::Delivered { .. } = outcome {
            if let Some(notification_id) = request.notification_id {
                self.notifications.mark_delivered(notification_id).await?;
            }
        }

        self.bus.publish(NotifyEvent::PushProcessed {
            recipient: request.recipient_user_id,
        });
        Ok(())
    }
}

impl DeliveryOutcome {
    fn failed(error: &str) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }
}

/// Flatten the staged JSONB payload into the provider's string map.
///
/// Non-string values are ignored; the fan-out only stages string pairs.
fn payload_data(request: &PushRequest) -> BTreeMap<String, String> {
    request
        .payload
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// DeliveryWorker
// ---------------------------------------------------------------------------

/// How often the worker polls for staged requests.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum requests picked up per poll.
const POLL_BATCH: i64 = 50;

/// Background loop that feeds staged requests to the [`DeliveryJob`].
///
/// Delivery of the same request may be attempted more than once across
/// restarts; the job's idempotency guard makes that harmless.
pub struct DeliveryWorker {
    job: Arc<DeliveryJob>,
    push_requests: Arc<dyn PushRequestStore>,
}

impl DeliveryWorker {
    pub fn new(job: Arc<DeliveryJob>, push_requests: Arc<dyn PushRequestStore>) -> Self {
        Self { job, push_requests }
    }

    /// Run the polling loop until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Delivery worker cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.drain_staged().await {
                        tracing::error!(error = %e, "Failed to poll staged push requests");
                    }
                }
            }
        }
    }

    /// Pick up and process one batch of staged requests.
    async fn drain_staged(&self) -> Result<(), StoreError> {
        let staged = self.push_requests.list_unprocessed(POLL_BATCH).await?;

        for request in &staged {
            if let Err(e) = self.job.process(request.id).await {
                tracing::error!(
                    request_id = request.id,
                    error = %e,
                    "Failed to process push request"
                );
            }
        }

        if !staged.is_empty() {
            tracing::debug!(count = staged.len(), "Processed staged push requests");
        }
        Ok(())
    }
}
