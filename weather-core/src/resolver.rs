//! Turns free-form location text into a weather payload.
//!
//! The provider answers a query in one of three ways and each gets its own
//! recovery strategy:
//!
//! - a list of candidates for an ambiguous name: retry with the first
//!   candidate's disambiguation code;
//! - an error for an unrecognized name: on the first attempt retry with
//!   geocoded `lat,lon`, on the second with `{query},{country}`, then give up;
//! - a payload: done.
//!
//! Transport failures end resolution immediately. The error branch stops after
//! three attempts on its own; the candidate branch is only bounded by the shared
//! `max_attempts` ceiling.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    WeatherError,
    config::ResolverSettings,
    geocode::Geocoder,
    model::{GeoCoordinate, ProviderResponse, WeatherPayload},
    provider::WeatherSource,
};

#[derive(Debug, Clone)]
pub struct Resolver {
    source: Arc<dyn WeatherSource>,
    geocoder: Arc<dyn Geocoder>,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        geocoder: Arc<dyn Geocoder>,
        settings: ResolverSettings,
    ) -> Self {
        Self { source, geocoder, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve `query` to a payload, trying the fallback chain as needed.
    pub async fn resolve(&self, query: &str) -> Result<WeatherPayload, WeatherError> {
        let mut location = query.to_string();
        let mut attempt: u32 = 1;

        loop {
            if attempt > self.settings.max_attempts {
                warn!(query, attempts = self.settings.max_attempts, "attempt ceiling reached");
                return Err(WeatherError::TooManyAttempts {
                    query: query.to_string(),
                    attempts: self.settings.max_attempts,
                });
            }

            debug!(attempt, %location, "resolving location");

            location = match self.source.fetch(&location).await? {
                ProviderResponse::Payload(payload) => {
                    debug!(attempt, city = payload.city(), "location resolved");
                    return Ok(*payload);
                }
                ProviderResponse::Disambiguation(candidates) => {
                    let first = candidates.first().ok_or_else(|| {
                        WeatherError::InvalidResponse(format!(
                            "ambiguous location '{location}' came without candidates"
                        ))
                    })?;
                    debug!(
                        attempt,
                        candidates = candidates.len(),
                        zmw = %first.zmw,
                        "ambiguous location"
                    );
                    first.query()
                }
                ProviderResponse::Error(detail) => {
                    debug!(attempt, detail = %detail.description, "location not recognized");
                    if attempt < 2 {
                        self.locate(query).await?.as_query()
                    } else if attempt < 3 {
                        format!("{query},{}", self.settings.country)
                    } else {
                        return Err(WeatherError::Unresolvable(detail.description));
                    }
                }
            };

            attempt += 1;
        }
    }

    async fn locate(&self, text: &str) -> Result<GeoCoordinate, WeatherError> {
        let coords = self.geocoder.geocode(text).await.map_err(|e| {
            WeatherError::GeocodeFailed { query: text.to_string(), reason: format!("{e:#}") }
        })?;

        coords.into_iter().next().ok_or_else(|| WeatherError::GeocodeFailed {
            query: text.to_string(),
            reason: "no matching places".to_string(),
        })
    }
}
