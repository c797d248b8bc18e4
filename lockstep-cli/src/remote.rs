//! HTTP client for the shared clipboard service.
//!
//! The service stores one text blob per opaque identifier:
//!
//! - `GET  {base}/api/clipboard?id={address}` returns the JSON envelope
//!   `{ "data": { "content": "...", "id": "..." }, "message": "...",
//!   "success": true, "code": 0 }`;
//! - `POST {base}/api/clipboard` with body `{ "id": "...", "content": "..." }`
//!   replaces the blob. Newlines travel JSON-escaped, symmetric with the
//!   fetch-side decode.

use std::time::Duration;

use serde::Deserialize;

use lockstep_core::Config;
use lockstep_sync::{RemoteStore, SyncError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch envelope returned by the clipboard service.
#[derive(Debug, Deserialize)]
struct ClipboardEnvelope {
    #[serde(default)]
    data: ClipboardData,
    #[serde(default)]
    message: String,
    success: bool,
    #[serde(default)]
    code: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ClipboardData {
    #[serde(default)]
    content: String,
}

/// [`RemoteStore`] implementation backed by the clipboard HTTP API.
pub struct HttpClipboard {
    agent: ureq::Agent,
    base_url: String,
    address: String,
}

impl HttpClipboard {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(REQUEST_TIMEOUT)
                .build(),
            base_url: config.server_url.trim_end_matches('/').to_string(),
            address: config.server_address.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/clipboard", self.base_url)
    }
}

impl RemoteStore for HttpClipboard {
    fn fetch(&self) -> Result<String, SyncError> {
        let response = self
            .agent
            .get(&self.endpoint())
            .query("id", &self.address)
            .call()
            .map_err(|err| SyncError::Remote(format!("clipboard fetch failed: {err}")))?;
        let envelope: ClipboardEnvelope = response
            .into_json()
            .map_err(|err| SyncError::Remote(format!("malformed clipboard envelope: {err}")))?;
        if !envelope.success {
            return Err(SyncError::Remote(format!(
                "clipboard fetch rejected (code {}): {}",
                envelope.code, envelope.message
            )));
        }
        Ok(envelope.data.content)
    }

    fn publish(&self, content: &str) -> Result<(), SyncError> {
        self.agent
            .post(&self.endpoint())
            .send_json(serde_json::json!({
                "id": self.address,
                "content": content,
            }))
            .map_err(|err| SyncError::Remote(format!("clipboard publish failed: {err}")))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
