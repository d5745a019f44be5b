use crate::{Config, WeatherError, model::ProviderResponse, provider::wunderground::Wunderground};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod wunderground;

/// A remote source of weather documents, queried by location text,
/// `lat,lon` pair or disambiguation code.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Fetch and classify the provider's answer for `location`.
    ///
    /// Transport failures and timeouts are reported as [`WeatherError::Unreachable`].
    async fn fetch(&self, location: &str) -> Result<ProviderResponse, WeatherError>;
}

/// Construct the weather source described by the config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let settings = config.provider_settings()?;
    Ok(Box::new(Wunderground::new(settings)?))
}
