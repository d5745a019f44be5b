//! Fixtures and scripted collaborators shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    WeatherError,
    geocode::Geocoder,
    model::{GeoCoordinate, ProviderResponse, WeatherPayload},
    provider::{WeatherSource, wunderground::decode_response},
};

/// Provider document for a city; each tuple is `(high, low, wind, day text)` for
/// offsets 0, 1, ... Slot 0 of both forecast arrays is filled with placeholder data.
pub fn forecast_json(city: &str, region: &str, days: &[(i64, i64, i64, &str)]) -> Value {
    let mut simple = vec![json!({
        "high": {"celsius": "-99", "fahrenheit": "-99"},
        "low": {"celsius": "-99", "fahrenheit": "-99"},
        "avewind": {"kph": 0, "mph": 0},
    })];
    let mut narrative = vec![
        json!({"fcttext_metric": "reserved"}),
        json!({"fcttext_metric": "reserved night"}),
    ];

    for (high, low, wind, txt) in days {
        simple.push(json!({
            "high": {"celsius": high.to_string()},
            "low": {"celsius": low.to_string()},
            "avewind": {"kph": wind, "dir": "NW"},
        }));
        narrative.push(json!({"title": "Day", "fcttext_metric": txt}));
        narrative.push(json!({"title": "Night", "fcttext_metric": format!("{txt} night")}));
    }

    json!({
        "response": {"version": "0.1", "features": {"conditions": 1, "forecast10day": 1}},
        "current_observation": {
            "display_location": {"city": city, "state_name": region, "country": "LO"}
        },
        "forecast": {
            "txt_forecast": {"date": "10:00 AM CET", "forecastday": narrative},
            "simpleforecast": {"forecastday": simple},
        }
    })
}

pub fn error_json(description: &str) -> Value {
    json!({
        "response": {
            "version": "0.1",
            "error": {"type": "querynotfound", "description": description}
        }
    })
}

pub fn ambiguous_json(zmws: &[&str]) -> Value {
    let results: Vec<Value> = zmws
        .iter()
        .map(|zmw| json!({"city": "Springfield", "country_name": "USA", "zmw": zmw}))
        .collect();
    json!({"response": {"version": "0.1", "results": results}})
}

pub fn response(doc: Value) -> ProviderResponse {
    decode_response(&doc.to_string()).expect("fixture must decode")
}

pub fn payload(doc: Value) -> WeatherPayload {
    match response(doc) {
        ProviderResponse::Payload(p) => *p,
        other => panic!("fixture is not a payload: {other:?}"),
    }
}

/// Answers from a one-shot script first, then from a per-query table; anything
/// else is "not found". Every query is recorded.
#[derive(Debug, Default)]
pub struct FakeSource {
    script: Mutex<VecDeque<Result<ProviderResponse, WeatherError>>>,
    table: HashMap<String, ProviderResponse>,
    queries: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn scripted(script: Vec<Result<ProviderResponse, WeatherError>>) -> Self {
        Self { script: Mutex::new(script.into()), ..Self::default() }
    }

    pub fn with(mut self, query: &str, doc: Value) -> Self {
        self.table.insert(query.to_string(), response(doc));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn fetch(&self, location: &str) -> Result<ProviderResponse, WeatherError> {
        self.queries.lock().expect("queries lock").push(location.to_string());

        let next = self.script.lock().expect("script lock").pop_front();
        if let Some(next) = next {
            return next;
        }
        // Let concurrent callers interleave.
        tokio::task::yield_now().await;

        Ok(self
            .table
            .get(location)
            .cloned()
            .unwrap_or_else(|| response(error_json("No cities match your search query"))))
    }
}

#[derive(Debug)]
pub struct FakeGeocoder {
    answer: Result<Vec<GeoCoordinate>, String>,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::answering(Ok(vec![GeoCoordinate { latitude, longitude }]))
    }

    pub fn answering(answer: Result<Vec<GeoCoordinate>, String>) -> Self {
        Self { answer, queries: Mutex::new(Vec::new()) }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, text: &str) -> anyhow::Result<Vec<GeoCoordinate>> {
        self.queries.lock().expect("queries lock").push(text.to_string());
        self.answer.clone().map_err(anyhow::Error::msg)
    }
}
