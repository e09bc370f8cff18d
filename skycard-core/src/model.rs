use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The last successfully fetched weather payload, normalized from the
/// provider's wire format. Wholly replaced on every successful lookup,
/// never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    /// Primary condition label, e.g. "Clear" or "Thunderstorm". Drives icon selection.
    pub condition: String,
    /// Human-readable condition, e.g. "clear sky".
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub visibility_m: u32,
    pub observation_time: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// "Vienna, AT" style heading.
    pub fn title(&self) -> String {
        format!("{}, {}", self.location_name, self.country)
    }

    /// Displayed temperature: truncated toward zero, never rounded
    /// (20.7 shows as 20, -3.9 as -3).
    pub fn temperature_deg(&self) -> i64 {
        self.temperature_c.trunc() as i64
    }

    /// Same truncation rule as [`Self::temperature_deg`].
    pub fn feels_like_deg(&self) -> i64 {
        self.feels_like_c.trunc() as i64
    }

    /// Visibility in kilometres, no rounding applied (9500 m is 9.5 km).
    pub fn visibility_km(&self) -> f64 {
        f64::from(self.visibility_m) / 1000.0
    }
}
