use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    config::ProviderSettings,
    model::{
        Candidate, CurrentObservation, Forecast, ProviderErrorDetail, ProviderResponse,
        WeatherPayload,
    },
};

use super::WeatherSource;

/// Data features requested on every call, in path order.
pub const FEATURES: [&str; 2] = ["conditions", "forecast10day"];

#[derive(Debug, Clone)]
pub struct Wunderground {
    base: Url,
    api_key: String,
    lang: String,
    http: Client,
}

impl Wunderground {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let base = Url::parse(&settings.endpoint)
            .with_context(|| format!("Invalid weather endpoint: {}", settings.endpoint))?;
        if base.cannot_be_a_base() {
            bail!("Invalid weather endpoint: {}", settings.endpoint);
        }

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client for wunderground")?;

        Ok(Self { base, api_key: settings.api_key, lang: settings.lang, http })
    }

    /// `{endpoint}/{api_key}/conditions/forecast10day/lang:{lang}/q/{location}.json`
    pub fn url_for(&self, location: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.api_key)
                .extend(FEATURES)
                .push(&format!("lang:{}", self.lang))
                .push("q")
                .push(&format!("{location}.json"));
        }
        url
    }
}

#[async_trait]
impl WeatherSource for Wunderground {
    async fn fetch(&self, location: &str) -> Result<ProviderResponse, WeatherError> {
        debug!(location, "querying wunderground");

        let res = self
            .http
            .get(self.url_for(location))
            .send()
            .await
            .map_err(|e| WeatherError::unreachable(&e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::unreachable(&e))?;

        decode_response(&body).inspect_err(|err| {
            warn!(%status, location, error = %err, "undecodable wunderground response");
        })
    }
}

#[derive(Debug, Deserialize)]
struct WuEnvelope {
    #[serde(default)]
    response: WuMeta,
    current_observation: Option<CurrentObservation>,
    forecast: Option<Forecast>,
}

#[derive(Debug, Default, Deserialize)]
struct WuMeta {
    results: Option<Vec<Candidate>>,
    error: Option<ProviderErrorDetail>,
}

/// Classify a raw provider body. A candidate list wins over an error, which wins
/// over a payload.
pub fn decode_response(body: &str) -> Result<ProviderResponse, WeatherError> {
    let envelope: WuEnvelope = serde_json::from_str(body).map_err(|e| {
        WeatherError::InvalidResponse(format!("{e} in body: {}", truncate_body(body)))
    })?;

    if let Some(results) = envelope.response.results {
        return Ok(ProviderResponse::Disambiguation(results));
    }
    if let Some(error) = envelope.response.error {
        return Ok(ProviderResponse::Error(error));
    }

    match (envelope.current_observation, envelope.forecast) {
        (Some(current_observation), Some(forecast)) => Ok(ProviderResponse::Payload(Box::new(
            WeatherPayload { current_observation, forecast },
        ))),
        _ => Err(WeatherError::InvalidResponse(
            "response carries neither candidates, an error nor forecast data".to_string(),
        )),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
