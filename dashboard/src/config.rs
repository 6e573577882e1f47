use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::classify::Thresholds;
use crate::errors::{Error, Result};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dashboard", about = "Air-quality station dashboard")]
pub struct Config {
    /// Base URL of the key-value endpoint the station writes to.
    #[arg(
        long,
        env = "FIREBASE_URL",
        default_value = "https://estacion-de-calidad-default-rtdb.firebaseio.com"
    )]
    pub firebase_url: String,

    /// Weather polling is disabled when no key is given.
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    pub openweather_api_key: Option<String>,

    #[arg(long, env = "CITY", default_value = "Managua")]
    pub city: String,

    #[arg(long, env = "WEATHER_LANG", default_value = "es")]
    pub weather_lang: String,

    #[arg(long, env = "SENSOR_INTERVAL_MS", default_value_t = 3000)]
    pub sensor_interval_ms: u64,

    #[arg(long, env = "WEATHER_INTERVAL_MS", default_value_t = 600_000)]
    pub weather_interval_ms: u64,

    #[arg(long, env = "HTTP_TIMEOUT_MS", default_value_t = 10_000)]
    pub http_timeout_ms: u64,

    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    #[arg(long, env = "TEMP_MAX", default_value_t = 32.0)]
    pub temp_max: f64,

    #[arg(long, env = "CO2_MAX", default_value_t = 1000.0)]
    pub co2_max: f64,

    #[arg(long, env = "TVOC_MAX", default_value_t = 500.0)]
    pub tvoc_max: f64,

    #[arg(long, env = "HUM_MIN", default_value_t = 45.0)]
    pub hum_min: f64,

    #[arg(long, env = "HUM_MAX", default_value_t = 75.0)]
    pub hum_max: f64,
}

impl Config {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            temp_max: self.temp_max,
            co2_max: self.co2_max,
            tvoc_max: self.tvoc_max,
            hum_min: self.hum_min,
            hum_max: self.hum_max,
        }
    }

    pub fn sensor_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_interval_ms)
    }

    pub fn weather_interval(&self) -> Duration {
        Duration::from_millis(self.weather_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// An empty key counts as no key.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sensor_interval_ms == 0 || self.weather_interval_ms == 0 {
            return Err(Error::Config("Poll intervals must be non-zero".to_string()));
        }
        if self.http_timeout_ms == 0 {
            return Err(Error::Config("HTTP timeout must be non-zero".to_string()));
        }
        self.thresholds().validate()
    }
}
