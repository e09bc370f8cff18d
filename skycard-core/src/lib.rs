//! Core library for the `skycard` weather widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider client (OpenWeatherMap)
//! - The shared domain model (the last fetched snapshot)
//!
//! It is used by `skycard-tui`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod provider;

pub use config::Config;
pub use model::WeatherSnapshot;
pub use provider::{FetchError, WeatherProvider, openweather::OpenWeatherProvider};
