use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format accepted at the end of a weather command, e.g. `20.12.2014`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// A parsed weather command: free-form location text plus an optional target date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub location: String,
    pub date: Option<NaiveDate>,
}

impl WeatherRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: location.into(), date: None }
    }

    /// Parse raw command arguments such as `Bratislava` or `Bratislava - 20.12.2014`.
    ///
    /// When the input contains a `-` the parts around it are trimmed, otherwise it is
    /// split on whitespace. A trailing part that parses as a date becomes the target
    /// date and the remaining parts are joined back into the location.
    /// Returns `None` for blank input.
    pub fn parse(args: &str) -> Option<Self> {
        let parts: Vec<&str> = if args.contains('-') {
            args.split('-').map(str::trim).filter(|p| !p.is_empty()).collect()
        } else {
            args.split_whitespace().collect()
        };

        let (last, rest) = parts.split_last()?;

        let request = match NaiveDate::parse_from_str(last, DATE_FORMAT) {
            Ok(date) => Self { location: rest.join(" "), date: Some(date) },
            Err(_) => Self { location: parts.join(" "), date: None },
        };

        Some(request)
    }

    /// Whole calendar days from `today` to the requested date; 0 when no date was given.
    pub fn day_offset(&self, today: NaiveDate) -> i64 {
        self.date.map(|d| d.signed_duration_since(today).num_days()).unwrap_or(0)
    }
}

/// A latitude/longitude pair produced by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// The `lat,lon` form the provider accepts as a location query.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// One candidate offered by the provider for an ambiguous location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub zmw: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

impl Candidate {
    /// Disambiguation code usable as a precise substitute query.
    pub fn query(&self) -> String {
        format!("zmw:{}", self.zmw)
    }
}

/// The provider's explanation when it does not recognize a location at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// The three mutually exclusive shapes a provider answer can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    Disambiguation(Vec<Candidate>),
    Error(ProviderErrorDetail),
    Payload(Box<WeatherPayload>),
}

/// A provider value passed through exactly as received (`"20"` or `15`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Reading(serde_json::Value);

impl From<serde_json::Value> for Reading {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            serde_json::Value::Null => Ok(()),
            other => write!(f, "{other}"),
        }
    }
}

/// Conditions and 10-day forecast for a resolved location.
///
/// Index 0 of both forecast sequences is reserved by the provider; data for day
/// offset `d` lives at `simpleforecast[d + 1]` and narrative `(d + 1) * 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub current_observation: CurrentObservation,
    pub forecast: Forecast,
}

impl WeatherPayload {
    pub fn city(&self) -> &str {
        &self.current_observation.display_location.city
    }

    pub fn region(&self) -> &str {
        &self.current_observation.display_location.state_name
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.simpleforecast.forecastday
    }

    pub fn narrative(&self) -> &[NarrativeBlock] {
        &self.forecast.txt_forecast.forecastday
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    pub display_location: DisplayLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayLocation {
    pub city: String,
    #[serde(default)]
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub txt_forecast: TxtForecast,
    pub simpleforecast: SimpleForecast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxtForecast {
    pub forecastday: Vec<NarrativeBlock>,
}

/// Day or night text block; two per forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeBlock {
    #[serde(default)]
    pub fcttext_metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleForecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub high: Temperature,
    pub low: Temperature,
    pub avewind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    #[serde(default)]
    pub celsius: Reading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub kph: Reading,
}
