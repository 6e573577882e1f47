use serde::{Deserialize, Serialize};

use crate::classify::{ReadingStatus, Status};

/// One complete station reading, as accepted by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub co2: u32,
    pub tvoc: u32,
    pub pressure: f64,
    pub fan_active: bool,
}

/// Reading document as stored in the key-value endpoint. Every field may be
/// absent; completeness is checked in `validate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub co2: Option<f64>,
    pub tvoc: Option<f64>,
    pub pressure: Option<f64>,
    pub fan_active: Option<bool>,
}

/// OpenWeather "current weather" document, reduced to the fields we show.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherReport {
    pub name: String,
    pub sys: WeatherSys,
    pub main: WeatherMain,
    pub weather: Vec<WeatherCondition>,
    pub wind: WeatherWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSys {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherWind {
    /// Metres per second with `units=metric`.
    pub speed: f64,
}

/// A single classified metric as shown on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub value: String,
    pub status: Status,
    pub message: &'static str,
}

/// Latest reading, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingView {
    pub temperature: MetricView,
    pub humidity: MetricView,
    pub co2: MetricView,
    pub tvoc: MetricView,
    pub pressure: String,
    pub fan: &'static str,
    pub fan_active: bool,
}

impl ReadingView {
    pub fn new(reading: &Reading, status: &ReadingStatus) -> Self {
        Self {
            temperature: MetricView {
                value: format!("{:.1}", reading.temperature),
                status: status.temperature,
                message: status.temperature_message(),
            },
            humidity: MetricView {
                value: format!("{:.1}", reading.humidity),
                status: status.humidity,
                message: status.humidity_message(),
            },
            co2: MetricView {
                value: reading.co2.to_string(),
                status: status.co2,
                message: status.co2_message(),
            },
            tvoc: MetricView {
                value: reading.tvoc.to_string(),
                status: status.tvoc,
                message: status.tvoc_message(),
            },
            pressure: format!("{:.1}", reading.pressure),
            fan: if reading.fan_active { "ON" } else { "OFF" },
            fan_active: reading.fan_active,
        }
    }

    pub fn has_alert(&self) -> bool {
        [
            self.temperature.status,
            self.humidity.status,
            self.co2.status,
            self.tvoc.status,
        ]
        .contains(&Status::Alert)
    }
}

/// Weather panel, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub city: String,
    pub date: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub temp_max: i64,
    pub temp_min: i64,
    pub description: String,
    pub icon_url: String,
    pub humidity: f64,
    /// km/h, one decimal.
    pub wind_speed: String,
    pub pressure: f64,
}

impl WeatherView {
    pub fn new(report: &WeatherReport, date: String) -> Self {
        let (description, icon_url) = match report.weather.first() {
            Some(c) => (
                c.description.clone(),
                format!("https://openweathermap.org/img/wn/{}@2x.png", c.icon),
            ),
            None => (String::new(), String::new()),
        };

        Self {
            city: format!("{}, {}", report.name, report.sys.country),
            date,
            temperature: report.main.temp.round() as i64,
            feels_like: report.main.feels_like.round() as i64,
            temp_max: report.main.temp_max.round() as i64,
            temp_min: report.main.temp_min.round() as i64,
            description,
            icon_url,
            humidity: report.main.humidity,
            wind_speed: format!("{:.1}", report.wind.speed * 3.6),
            pressure: report.main.pressure,
        }
    }
}

/// The four chart series, owned, for the HTTP API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryResponse {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub co2: Vec<u32>,
    pub humidity: Vec<f64>,
}

/// Everything the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub reading: Option<ReadingView>,
    pub history: HistoryResponse,
    pub weather: Option<WeatherView>,
    /// Set when the latest weather fetch failed; cleared by the next report.
    pub weather_error: Option<String>,
    pub last_update: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Thresholds;

    fn report() -> WeatherReport {
        serde_json::from_value(serde_json::json!({
            "cod": 200,
            "name": "Managua",
            "sys": { "country": "NI" },
            "main": {
                "temp": 29.6, "feels_like": 33.4, "temp_min": 28.2,
                "temp_max": 30.5, "pressure": 1011, "humidity": 70
            },
            "weather": [{ "description": "nubes dispersas", "icon": "03d" }],
            "wind": { "speed": 5.0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_weather_view_formatting() {
        let view = WeatherView::new(&report(), "viernes".to_string());

        assert_eq!(view.city, "Managua, NI");
        assert_eq!(view.temperature, 30);
        assert_eq!(view.feels_like, 33);
        assert_eq!(view.temp_min, 28);
        assert_eq!(view.temp_max, 31);
        assert_eq!(view.wind_speed, "18.0");
        assert_eq!(
            view.icon_url,
            "https://openweathermap.org/img/wn/03d@2x.png"
        );
        assert_eq!(view.description, "nubes dispersas");
    }

    #[test]
    fn test_reading_view_formatting() {
        let reading = Reading {
            temperature: 33.04,
            humidity: 50.0,
            co2: 900,
            tvoc: 100,
            pressure: 1012.26,
            fan_active: true,
        };
        let status = Thresholds::default().classify(&reading);
        let view = ReadingView::new(&reading, &status);

        assert_eq!(view.temperature.value, "33.0");
        assert_eq!(view.temperature.status, Status::Alert);
        assert_eq!(view.temperature.message, "Too high");
        assert_eq!(view.pressure, "1012.3");
        assert_eq!(view.fan, "ON");
        assert!(view.has_alert());
    }

    #[test]
    fn test_raw_reading_accepts_null_fields() {
        let raw: RawReading =
            serde_json::from_str(r#"{"temperature": 21.5, "co2": null}"#).unwrap();

        assert_eq!(raw.temperature, Some(21.5));
        assert_eq!(raw.co2, None);
        assert_eq!(raw.fan_active, None);
    }
}
