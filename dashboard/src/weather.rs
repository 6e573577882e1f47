//! Client for the OpenWeather current-weather endpoint.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::model::WeatherReport;

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Value of `cod` on a successful lookup.
const COD_OK: i64 = 200;

pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    city: String,
    lang: String,
}

impl WeatherClient {
    pub fn new(api_key: &str, city: &str, lang: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, OPENWEATHER_URL, api_key, city, lang))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: &str,
        city: &str,
        lang: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            city: city.to_string(),
            lang: lang.to_string(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Fetch current weather for the configured city.
    ///
    /// OpenWeather reports lookup failures (unknown city, bad key) in the
    /// body's `cod` field, so any document without `cod == 200` yields
    /// `Ok(None)` rather than an error. Transport failures and bodies that
    /// are not JSON are errors.
    pub async fn fetch_current(&self) -> Result<Option<WeatherReport>> {
        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", self.city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        let bytes = response.bytes().await?;
        let document: Value = serde_json::from_slice(&bytes)?;
        parse_report(document)
    }
}

fn parse_report(document: Value) -> Result<Option<WeatherReport>> {
    match document.get("cod").and_then(Value::as_i64) {
        Some(COD_OK) => Ok(Some(serde_json::from_value(document)?)),
        cod => {
            let message = document
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("");
            debug!("Ignoring weather document with cod {:?}: {}", cod, message);
            Ok(None)
        }
    }
}
