//! Client for the key-value endpoint the station writes its readings to.

use std::time::Duration;

use crate::errors::{Error, Result};
use crate::model::RawReading;

/// Path of the document holding the most recent reading.
pub const CURRENT_PATH: &str = "current.json";

pub struct SensorClient {
    client: reqwest::Client,
    base_url: String,
}

impl SensorClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn current_url(&self) -> String {
        format!("{}/{}", self.base_url, CURRENT_PATH)
    }

    /// Fetch the current reading. `Ok(None)` means the endpoint holds no
    /// document yet (it answers with JSON `null`).
    pub async fn fetch_current(&self) -> Result<Option<RawReading>> {
        let response = self.client.get(self.current_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice::<Option<RawReading>>(&bytes)?)
    }
}
