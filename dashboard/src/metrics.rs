use anyhow::Context;
use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::model::Reading;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref SENSOR_POLLS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_sensor_polls_total",
        "Total sensor polls attempted"
    ))
    .unwrap();
    pub static ref SENSOR_POLL_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_sensor_poll_failures_total",
        "Total sensor polls that failed to fetch or parse"
    ))
    .unwrap();
    pub static ref INVALID_READINGS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_invalid_readings_total",
        "Total readings rejected by validation"
    ))
    .unwrap();
    pub static ref WEATHER_POLLS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_weather_polls_total",
        "Total weather polls attempted"
    ))
    .unwrap();
    pub static ref WEATHER_POLL_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_weather_poll_failures_total",
        "Total weather polls that failed to fetch or parse"
    ))
    .unwrap();
    pub static ref ALERTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_alerts_total",
        "Total metrics classified as alert"
    ))
    .unwrap();
    pub static ref HISTORY_LEN: Gauge = Gauge::with_opts(Opts::new(
        "dashboard_history_len",
        "Samples currently held in the history window"
    ))
    .unwrap();
    pub static ref READING: GaugeVec = GaugeVec::new(
        Opts::new("dashboard_reading", "Latest accepted sensor value"),
        &["metric"]
    )
    .unwrap();
}

pub fn init_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(SENSOR_POLLS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SENSOR_POLL_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(INVALID_READINGS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(WEATHER_POLLS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(WEATHER_POLL_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ALERTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(HISTORY_LEN.clone()))?;
    REGISTRY.register(Box::new(READING.clone()))?;
    Ok(())
}

pub fn observe_reading(reading: &Reading) {
    READING
        .with_label_values(&["temperature"])
        .set(reading.temperature);
    READING.with_label_values(&["humidity"]).set(reading.humidity);
    READING.with_label_values(&["co2"]).set(reading.co2 as f64);
    READING.with_label_values(&["tvoc"]).set(reading.tvoc as f64);
    READING.with_label_values(&["pressure"]).set(reading.pressure);
    READING
        .with_label_values(&["fan_active"])
        .set(if reading.fan_active { 1.0 } else { 0.0 });
}

pub fn gather_metrics() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_exposes_reading_gauges() {
        // Registration fails harmlessly if another test got there first.
        let _ = init_metrics();
        observe_reading(&Reading {
            temperature: 27.5,
            humidity: 48.0,
            co2: 610,
            tvoc: 120,
            pressure: 1011.0,
            fan_active: true,
        });

        let text = gather_metrics().unwrap();
        assert!(text.contains("dashboard_reading{metric=\"co2\"}"));
        assert!(text.contains("dashboard_sensor_polls_total"));
    }
}
