use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::model::Reading;

/// Fraction of a ceiling above which a metric is reported as elevated.
pub const ELEVATED_RATIO: f64 = 0.9;

/// Per-metric classification of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Elevated,
    Alert,
}

/// Which side of the humidity band a reading fell out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityBreach {
    TooLow,
    TooHigh,
}

/// Classifies a metric that only has a ceiling.
pub fn classify(value: f64, threshold: f64) -> Status {
    if value > threshold {
        Status::Alert
    } else if value > threshold * ELEVATED_RATIO {
        Status::Elevated
    } else {
        Status::Normal
    }
}

pub fn humidity_breach(value: f64, hum_min: f64, hum_max: f64) -> Option<HumidityBreach> {
    if value < hum_min {
        Some(HumidityBreach::TooLow)
    } else if value > hum_max {
        Some(HumidityBreach::TooHigh)
    } else {
        None
    }
}

/// Humidity has a safe band rather than a ceiling, so it never reports
/// `Elevated`.
pub fn classify_humidity(value: f64, hum_min: f64, hum_max: f64) -> Status {
    match humidity_breach(value, hum_min, hum_max) {
        Some(_) => Status::Alert,
        None => Status::Normal,
    }
}

/// Alarm thresholds, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub temp_max: f64,
    pub co2_max: f64,
    pub tvoc_max: f64,
    pub hum_min: f64,
    pub hum_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_max: 32.0,
            co2_max: 1000.0,
            tvoc_max: 500.0,
            hum_min: 45.0,
            hum_max: 75.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("temp_max", self.temp_max),
            ("co2_max", self.co2_max),
            ("tvoc_max", self.tvoc_max),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.hum_min.is_finite() || !self.hum_max.is_finite() {
            return Err(Error::Config("Humidity band must be finite".to_string()));
        }

        if self.hum_min > self.hum_max {
            return Err(Error::Config(format!(
                "hum_min {} is above hum_max {}",
                self.hum_min, self.hum_max
            )));
        }

        Ok(())
    }

    pub fn classify(&self, reading: &Reading) -> ReadingStatus {
        ReadingStatus {
            temperature: classify(reading.temperature, self.temp_max),
            humidity: classify_humidity(reading.humidity, self.hum_min, self.hum_max),
            humidity_breach: humidity_breach(reading.humidity, self.hum_min, self.hum_max),
            co2: classify(reading.co2 as f64, self.co2_max),
            tvoc: classify(reading.tvoc as f64, self.tvoc_max),
        }
    }
}

/// Status of every classified metric of one reading. Pressure and fan state
/// are display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingStatus {
    pub temperature: Status,
    pub humidity: Status,
    pub humidity_breach: Option<HumidityBreach>,
    pub co2: Status,
    pub tvoc: Status,
}

impl ReadingStatus {
    pub fn alert_count(&self) -> usize {
        [self.temperature, self.humidity, self.co2, self.tvoc]
            .iter()
            .filter(|s| **s == Status::Alert)
            .count()
    }

    pub fn temperature_message(&self) -> &'static str {
        ceiling_message(self.temperature)
    }

    pub fn co2_message(&self) -> &'static str {
        ceiling_message(self.co2)
    }

    pub fn tvoc_message(&self) -> &'static str {
        ceiling_message(self.tvoc)
    }

    pub fn humidity_message(&self) -> &'static str {
        match self.humidity_breach {
            Some(HumidityBreach::TooLow) => "Too low",
            Some(HumidityBreach::TooHigh) => "Too high",
            None => "Normal",
        }
    }
}

fn ceiling_message(status: Status) -> &'static str {
    match status {
        Status::Alert => "Too high",
        Status::Elevated => "Elevated",
        Status::Normal => "Normal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, humidity: f64, co2: u32, tvoc: u32) -> Reading {
        Reading {
            temperature,
            humidity,
            co2,
            tvoc,
            pressure: 1013.0,
            fan_active: false,
        }
    }

    #[test]
    fn test_classify_boundaries() {
        // At the ceiling the value is above the elevated edge but not above
        // the ceiling itself.
        assert_eq!(classify(1000.0, 1000.0), Status::Elevated);
        assert_eq!(classify(900.0, 1000.0), Status::Normal);
        assert_eq!(classify(900.5, 1000.0), Status::Elevated);
        assert_eq!(classify(1000.5, 1000.0), Status::Alert);
        assert_eq!(classify(32.0, 32.0), Status::Elevated);
        assert_eq!(classify(32.01, 32.0), Status::Alert);
    }

    #[test]
    fn test_elevated_edge_is_normal() {
        for threshold in [32.0, 500.0, 1000.0] {
            assert_eq!(classify(threshold * ELEVATED_RATIO, threshold), Status::Normal);
        }
    }

    #[test]
    fn test_classify_is_monotonic() {
        let threshold = 500.0;
        let mut previous = Status::Normal;
        for step in 0..=1200 {
            let status = classify(step as f64, threshold);
            assert!(status >= previous, "status dropped at {}", step);
            previous = status;
        }
        assert_eq!(previous, Status::Alert);
    }

    #[test]
    fn test_classify_humidity_band() {
        assert_eq!(classify_humidity(45.0, 45.0, 75.0), Status::Normal);
        assert_eq!(classify_humidity(75.0, 45.0, 75.0), Status::Normal);
        assert_eq!(classify_humidity(60.0, 45.0, 75.0), Status::Normal);
        assert_eq!(classify_humidity(44.9, 45.0, 75.0), Status::Alert);
        assert_eq!(classify_humidity(75.1, 45.0, 75.0), Status::Alert);
    }

    #[test]
    fn test_humidity_has_no_elevated_tier() {
        // 74 is above 0.9 * 75 but still inside the band.
        assert_eq!(classify_humidity(74.0, 45.0, 75.0), Status::Normal);
    }

    #[test]
    fn test_humidity_breach_direction() {
        let thresholds = Thresholds::default();

        let low = thresholds.classify(&reading(25.0, 40.0, 500, 100));
        assert_eq!(low.humidity, Status::Alert);
        assert_eq!(low.humidity_breach, Some(HumidityBreach::TooLow));
        assert_eq!(low.humidity_message(), "Too low");

        let high = thresholds.classify(&reading(25.0, 80.0, 500, 100));
        assert_eq!(high.humidity, Status::Alert);
        assert_eq!(high.humidity_breach, Some(HumidityBreach::TooHigh));
        assert_eq!(high.humidity_message(), "Too high");
    }

    #[test]
    fn test_reading_scenario() {
        let status = Thresholds::default().classify(&reading(33.0, 50.0, 900, 100));

        assert_eq!(status.temperature, Status::Alert);
        assert_eq!(status.co2, Status::Normal);
        assert_eq!(status.tvoc, Status::Normal);
        assert_eq!(status.humidity, Status::Normal);
        assert_eq!(status.alert_count(), 1);
        assert_eq!(status.temperature_message(), "Too high");
        assert_eq!(status.co2_message(), "Normal");
    }

    #[test]
    fn test_tvoc_elevated() {
        let status = Thresholds::default().classify(&reading(20.0, 50.0, 400, 480));
        assert_eq!(status.tvoc, Status::Elevated);
        assert_eq!(status.tvoc_message(), "Elevated");
    }

    #[test]
    fn test_nan_is_normal() {
        assert_eq!(classify(f64::NAN, 32.0), Status::Normal);
        assert_eq!(classify_humidity(f64::NAN, 45.0, 75.0), Status::Normal);
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(Thresholds::default().validate().is_ok());

        let inverted = Thresholds {
            hum_min: 80.0,
            hum_max: 40.0,
            ..Thresholds::default()
        };
        assert!(matches!(inverted.validate(), Err(Error::Config(_))));

        let zero_ceiling = Thresholds {
            co2_max: 0.0,
            ..Thresholds::default()
        };
        assert!(zero_ceiling.validate().is_err());
    }
}
