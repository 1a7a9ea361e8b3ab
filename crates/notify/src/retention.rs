//! Retention sweep for processed push delivery requests.
//!
//! Staged-delivery records are transport plumbing, not user-visible
//! history, so processed ones are pruned after a few days. Notification
//! records themselves are never deleted here.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::{PushRequestStore, StoreError};

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Age past which a processed request is pruned.
const RETENTION_DAYS: i64 = 3;

/// Background service that prunes old processed push requests.
pub struct RetentionSweeper {
    push_requests: Arc<dyn PushRequestStore>,
}

impl RetentionSweeper {
    pub fn new(push_requests: Arc<dyn PushRequestStore>) -> Self {
        Self { push_requests }
    }

    /// Run the sweep loop until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Retention sweeper cancelled");
                    break;
                }
                _ = interval.tick() => {
                    match self.sweep().await {
                        Ok(0) => {}
                        Ok(pruned) => {
                            tracing::info!(pruned, "Pruned old processed push requests");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Retention sweep failed");
                        }
                    }
                }
            }
        }
    }

    /// Delete processed requests older than the retention window.
    async fn sweep(&self) -> Result<u64, StoreError> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(RETENTION_DAYS);
        self.push_requests.prune_processed_before(cutoff).await
    }
}
