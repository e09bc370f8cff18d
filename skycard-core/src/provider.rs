use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::WeatherSnapshot;

pub mod openweather;

/// Everything that can go wrong between issuing a lookup and holding a
/// [`WeatherSnapshot`]. The UI collapses all of these into one transient
/// banner message; the variants exist so logs and tests can tell them apart.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach weather service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed weather response: {0}")]
    Malformed(&'static str),
}

/// Abstraction over the weather backend so the UI and its tests can swap
/// the real HTTP client for a stub.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current weather for a free-text location ("Vienna", "Oslo,NO", ...).
    async fn fetch_current(&self, location: &str) -> Result<WeatherSnapshot, FetchError>;
}
