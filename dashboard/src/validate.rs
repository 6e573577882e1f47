use crate::errors::{Error, Result};
use crate::model::{RawReading, Reading};

const HUMIDITY_MIN: f64 = 0.0;
const HUMIDITY_MAX: f64 = 100.0;

/// Turns a raw reading into a complete one, rejecting partial or
/// nonsensical documents before they reach the classifier.
pub fn validate(raw: RawReading) -> Result<Reading> {
    let temperature = finite("temperature", required("temperature", raw.temperature)?)?;
    let humidity = finite("humidity", required("humidity", raw.humidity)?)?;
    let pressure = finite("pressure", required("pressure", raw.pressure)?)?;
    let co2 = concentration("co2", required("co2", raw.co2)?)?;
    let tvoc = concentration("tvoc", required("tvoc", raw.tvoc)?)?;
    let fan_active = required("fan_active", raw.fan_active)?;

    if !(HUMIDITY_MIN..=HUMIDITY_MAX).contains(&humidity) {
        return Err(Error::Validation(format!(
            "Humidity {} out of range [{}, {}]",
            humidity, HUMIDITY_MIN, HUMIDITY_MAX
        )));
    }

    Ok(Reading {
        temperature,
        humidity,
        co2,
        tvoc,
        pressure,
        fan_active,
    })
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::Validation(format!("Missing field {}", field)))
}

fn finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Validation(format!("{} is not a finite number", field)))
    }
}

fn concentration(field: &str, value: f64) -> Result<u32> {
    let value = finite(field, value)?;
    if value < 0.0 || value > u32::MAX as f64 {
        return Err(Error::Validation(format!(
            "{} concentration {} out of range",
            field, value
        )));
    }
    Ok(value.round() as u32)
}
