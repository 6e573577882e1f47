//! Rendering adapters. The poll loop only produces data; these decide where
//! it goes.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::history::HistorySeries;
use crate::model::{ReadingView, Snapshot, WeatherView};

/// A sink for dashboard updates.
///
/// `render_history` receives a borrowed view of the live window, which must
/// not be held past the call.
pub trait Renderer: Send {
    fn render_reading(&mut self, reading: &ReadingView, last_update: &str);
    fn render_history(&mut self, series: HistorySeries<'_>);
    fn render_weather(&mut self, weather: &WeatherView);
    /// The weather fetch failed. A previously rendered report stays valid.
    fn render_weather_error(&mut self, message: &str);
}

/// Writes updates to the log.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render_reading(&mut self, r: &ReadingView, last_update: &str) {
        if r.has_alert() {
            warn!(
                temperature = %r.temperature.value,
                temperature_status = r.temperature.message,
                humidity = %r.humidity.value,
                humidity_status = r.humidity.message,
                co2 = %r.co2.value,
                co2_status = r.co2.message,
                tvoc = %r.tvoc.value,
                tvoc_status = r.tvoc.message,
                pressure = %r.pressure,
                fan = r.fan,
                "Reading out of range at {}",
                last_update
            );
        } else {
            info!(
                temperature = %r.temperature.value,
                humidity = %r.humidity.value,
                co2 = %r.co2.value,
                tvoc = %r.tvoc.value,
                pressure = %r.pressure,
                fan = r.fan,
                "Reading at {}",
                last_update
            );
        }
    }

    fn render_history(&mut self, series: HistorySeries<'_>) {
        if series.is_empty() {
            return;
        }
        debug!(
            "History holds {} samples ({} to {})",
            series.len(),
            series.labels.front().map(String::as_str).unwrap_or("-"),
            series.labels.back().map(String::as_str).unwrap_or("-"),
        );
    }

    fn render_weather(&mut self, w: &WeatherView) {
        info!(
            temperature = w.temperature,
            feels_like = w.feels_like,
            humidity = w.humidity,
            wind_kmh = %w.wind_speed,
            "Weather in {}: {}",
            w.city,
            w.description
        );
    }

    fn render_weather_error(&mut self, message: &str) {
        debug!("Weather panel shows error: {}", message);
    }
}

/// Publishes the latest [`Snapshot`] for the HTTP API.
pub struct SnapshotRenderer {
    tx: watch::Sender<Snapshot>,
}

impl SnapshotRenderer {
    pub fn new(tx: watch::Sender<Snapshot>) -> Self {
        Self { tx }
    }

    /// Creates a renderer together with a receiver for the published
    /// snapshots.
    pub fn channel() -> (Self, watch::Receiver<Snapshot>) {
        let (tx, rx) = watch::channel(Snapshot::default());
        (Self::new(tx), rx)
    }
}

impl Renderer for SnapshotRenderer {
    fn render_reading(&mut self, reading: &ReadingView, last_update: &str) {
        self.tx.send_modify(|s| {
            s.reading = Some(reading.clone());
            s.last_update = Some(last_update.to_string());
        });
    }

    fn render_history(&mut self, series: HistorySeries<'_>) {
        let history = series.to_response();
        self.tx.send_modify(|s| s.history = history);
    }

    fn render_weather(&mut self, weather: &WeatherView) {
        self.tx.send_modify(|s| {
            s.weather = Some(weather.clone());
            s.weather_error = None;
        });
    }

    fn render_weather_error(&mut self, message: &str) {
        self.tx
            .send_modify(|s| s.weather_error = Some(message.to_string()));
    }
}
