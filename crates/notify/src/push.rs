//! HTTP push-provider client.
//!
//! Speaks the platform's send endpoint: a JSON POST of
//! `{to, notification: {title, body}, data}` answered with
//! `{"message_id": ...}`. One attempt per call; retry policy belongs to
//! whoever re-stages a request, never to the delivery job.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::store::{PushError, PushProvider};

/// HTTP request timeout for a single dispatch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider acknowledgement body.
#[derive(Debug, Deserialize)]
struct SendResponse {
    message_id: String,
}

/// Push provider backed by an HTTP send endpoint.
pub struct HttpPushClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpPushClient {
    /// Create a client for the given send endpoint and server key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl PushProvider for HttpPushClient {
    async fn send(
        &self,
        address: &str,
        title: &str,
        body: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<String, PushError> {
        let payload = serde_json::json!({
            "to": address,
            "notification": {
                "title": title,
                "body": body,
            },
            "data": data,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PushError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushError(format!("provider returned HTTP {status}")));
        }

        let ack: SendResponse = response
            .json()
            .await
            .map_err(|e| PushError(format!("malformed provider response: {e}")))?;
        Ok(ack.message_id)
    }
}
