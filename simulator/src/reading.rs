use serde::{Deserialize, Serialize};

/// Reading document as the station writes it to `current.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub co2: u32,
    pub tvoc: u32,
    pub pressure: f64,
    pub fan_active: bool,
}
