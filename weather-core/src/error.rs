use thiserror::Error;

/// Failures surfaced by the resolver and the report extractor.
///
/// Configuration and I/O problems outside the core use `anyhow` instead.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The weather provider timed out or could not be contacted. Never retried.
    #[error("Could not reach wunderground.com")]
    Unreachable { reason: String },

    /// The provider still did not recognize the location after every fallback.
    /// Carries the provider's own description.
    #[error("{0}")]
    Unresolvable(String),

    /// The geocoder could not turn free text into coordinates.
    #[error("Could not geocode '{query}': {reason}")]
    GeocodeFailed { query: String, reason: String },

    /// No forecast data exists for the requested day.
    #[error("No forecast available for day offset {offset} (provider returned {available} days)")]
    OutOfRange { offset: i64, available: usize },

    /// Hard ceiling on provider round-trips for a single query.
    #[error("Gave up resolving '{query}' after {attempts} attempts")]
    TooManyAttempts { query: String, attempts: u32 },

    /// The provider answered with a document that matches none of the known shapes.
    #[error("Unexpected response from wunderground.com: {0}")]
    InvalidResponse(String),

    #[error("Invalid report template: {0}")]
    InvalidTemplate(String),
}

impl WeatherError {
    pub fn unreachable(err: &reqwest::Error) -> Self {
        WeatherError::Unreachable { reason: err.to_string() }
    }

    /// True for failures that no amount of query rewriting can fix.
    pub fn is_transport(&self) -> bool {
        matches!(self, WeatherError::Unreachable { .. })
    }
}
