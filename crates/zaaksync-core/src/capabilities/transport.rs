//! Remote transport capability
//!
//! Pushes mapped payloads to a target system. The bridge is a best-effort
//! integration: any transport problem surfaces as `Ok(None)` so the caller
//! can degrade to returning its input unchanged, never as a hard error.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use zaaksync_common::Result;

use super::resources::SourceDescriptor;

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` to `location` relative to the source's base URL.
    ///
    /// Returns the response body on success, `None` when the remote returned
    /// nothing usable.
    async fn post(
        &self,
        source: &SourceDescriptor,
        location: &str,
        payload: &Value,
    ) -> Result<Option<Value>>;
}

/// Default reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    fn endpoint(source: &SourceDescriptor, location: &str) -> String {
        format!(
            "{}/{}",
            source.location.trim_end_matches('/'),
            location.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        source: &SourceDescriptor,
        location: &str,
        payload: &Value,
    ) -> Result<Option<Value>> {
        let url = Self::endpoint(source, location);
        debug!(url = %url, "Pushing payload to remote target");

        let mut request = self.client.post(&url).json(payload);
        if let Some(api_key) = &source.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %url, error = %err, "Remote push failed");
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Remote push rejected");
            return Ok(None);
        }

        match response.json::<Value>().await {
            Ok(Value::Null) => Ok(None),
            Ok(body) => Ok(Some(body)),
            Err(err) => {
                warn!(url = %url, error = %err, "Remote push returned an unreadable body");
                Ok(None)
            }
        }
    }
}
