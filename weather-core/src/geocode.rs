//! Forward geocoding: free text to coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::model::GeoCoordinate;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidate coordinates for `text`, best match first. May be empty.
    async fn geocode(&self, text: &str) -> Result<Vec<GeoCoordinate>>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for geocoding")?;

        Ok(Self { url: url.into(), http })
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: Option<String>,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn geocode(&self, text: &str) -> Result<Vec<GeoCoordinate>> {
        debug!("Geocoding location name: {}", text);

        let res = self
            .http
            .get(&self.url)
            .query(&[("name", text), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await
            .context("Failed to send geocoding request")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Geocoding request failed with status {}", status));
        }

        let parsed: OmSearchResponse =
            res.json().await.context("Failed to parse geocoding response")?;

        let places = parsed.results.unwrap_or_default();
        if let Some(first) = places.first() {
            debug!(
                "Found location: {} ({:.4}, {:.4})",
                first.name.as_deref().unwrap_or(text),
                first.latitude,
                first.longitude
            );
        }

        Ok(places
            .into_iter()
            .map(|p| GeoCoordinate { latitude: p.latitude, longitude: p.longitude })
            .collect())
    }
}
