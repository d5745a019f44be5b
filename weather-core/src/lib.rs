//! Core library for the `weather` command.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather data source and geocoder clients
//! - Location resolution with its fallback chain
//! - Extraction of a single forecast day into a report line
//!
//! It is used by `wunderweather-cli`, but can also be reused by chat bots or services.

pub mod config;
pub mod error;
pub mod geocode;
pub mod model;
pub mod provider;
pub mod report;
pub mod resolver;
pub mod service;

#[cfg(test)]
mod test_support;

pub use config::{Config, ProviderSettings, ResolverSettings};
pub use error::WeatherError;
pub use geocode::{Geocoder, OpenMeteoGeocoder};
pub use model::{GeoCoordinate, ProviderResponse, WeatherPayload, WeatherRequest};
pub use provider::{WeatherSource, source_from_config};
pub use report::{FormatTemplate, extract};
pub use resolver::Resolver;
pub use service::WeatherService;
