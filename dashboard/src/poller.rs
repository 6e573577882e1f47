use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::metrics::{
    observe_reading, ALERTS_TOTAL, HISTORY_LEN, INVALID_READINGS_TOTAL, SENSOR_POLLS_TOTAL,
    SENSOR_POLL_FAILURES_TOTAL, WEATHER_POLLS_TOTAL, WEATHER_POLL_FAILURES_TOTAL,
};
use crate::model::{RawReading, WeatherReport};
use crate::render::Renderer;
use crate::sensor::SensorClient;
use crate::state::DashboardState;
use crate::validate::validate;
use crate::weather::WeatherClient;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A reading or weather report was accepted and rendered.
    Updated,
    /// The source answered but had nothing to show.
    NoData,
    /// The reading was incomplete or out of range.
    Rejected,
    /// The fetch itself failed.
    Failed,
}

/// State plus the adapters it is rendered to.
pub struct Dashboard {
    state: DashboardState,
    renderers: Vec<Box<dyn Renderer>>,
}

impl Dashboard {
    pub fn new(state: DashboardState, renderers: Vec<Box<dyn Renderer>>) -> Self {
        Self { state, renderers }
    }

    pub fn on_sensor_result(
        &mut self,
        result: Result<Option<RawReading>>,
        at: DateTime<Local>,
    ) -> TickOutcome {
        let raw = match result {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Sensor endpoint holds no reading yet");
                return TickOutcome::NoData;
            }
            Err(e) => {
                error!("Failed to fetch sensor data: {}", e);
                SENSOR_POLL_FAILURES_TOTAL.inc();
                return TickOutcome::Failed;
            }
        };

        let reading = match validate(raw) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Discarding sensor reading: {}", e);
                INVALID_READINGS_TOTAL.inc();
                return TickOutcome::Rejected;
            }
        };

        let status = self.state.record_reading(&reading, at);
        observe_reading(&reading);
        ALERTS_TOTAL.inc_by(status.alert_count() as f64);
        HISTORY_LEN.set(self.state.history().len() as f64);

        let stamp = self.state.last_update().unwrap_or_default();
        if let Some(view) = self.state.latest() {
            for renderer in &mut self.renderers {
                renderer.render_reading(view, &stamp);
                renderer.render_history(self.state.history());
            }
        }

        TickOutcome::Updated
    }

    pub fn on_weather_result(
        &mut self,
        result: Result<Option<WeatherReport>>,
        at: DateTime<Local>,
    ) -> TickOutcome {
        let report = match result {
            Ok(Some(report)) => report,
            Ok(None) => return TickOutcome::NoData,
            Err(e) => {
                error!("Failed to fetch weather data: {}", e);
                WEATHER_POLL_FAILURES_TOTAL.inc();
                if self.state.weather().is_some() {
                    debug!("Keeping previous weather report on display");
                }
                let message = self.state.record_weather_error(e.to_string());
                for renderer in &mut self.renderers {
                    renderer.render_weather_error(message);
                }
                return TickOutcome::Failed;
            }
        };

        let view = self.state.record_weather(&report, at);
        for renderer in &mut self.renderers {
            renderer.render_weather(view);
        }

        TickOutcome::Updated
    }
}

pub struct PollerConfig {
    pub sensor_interval: Duration,
    pub weather_interval: Duration,
}

/// Drives both periodic polls from a single task, so a tick always runs to
/// completion (including its fetch) before the next one starts and the
/// history sees appends in tick order.
pub async fn run_poller(
    mut dashboard: Dashboard,
    sensor: SensorClient,
    weather: Option<WeatherClient>,
    config: PollerConfig,
) {
    info!(
        "Starting poller: sensor every {:?}, weather every {:?}",
        config.sensor_interval, config.weather_interval
    );
    if weather.is_none() {
        warn!("No OpenWeather API key configured, weather polling disabled");
    }

    let mut sensor_ticker = interval(config.sensor_interval);
    sensor_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut weather_ticker = interval(config.weather_interval);
    weather_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = sensor_ticker.tick() => {
                SENSOR_POLLS_TOTAL.inc();
                let result = sensor.fetch_current().await;
                dashboard.on_sensor_result(result, Local::now());
            }

            _ = weather_ticker.tick(), if weather.is_some() => {
                if let Some(client) = &weather {
                    WEATHER_POLLS_TOTAL.inc();
                    let result = client.fetch_current().await;
                    if dashboard.on_weather_result(result, Local::now()) == TickOutcome::NoData {
                        debug!("No weather shown for {}", client.city());
                    }
                }
            }
        }
    }
}
