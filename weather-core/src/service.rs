use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    Config, WeatherError, WeatherRequest,
    geocode::OpenMeteoGeocoder,
    provider::source_from_config,
    report::{FormatTemplate, extract},
    resolver::Resolver,
};

/// Answers weather commands: resolve the location, then render the requested day.
#[derive(Debug, Clone)]
pub struct WeatherService {
    resolver: Resolver,
    template: FormatTemplate,
}

impl WeatherService {
    pub fn new(resolver: Resolver, template: FormatTemplate) -> Self {
        Self { resolver, template }
    }

    /// Wire up the provider, geocoder and template described by the config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = source_from_config(config)?;
        let geocoder = OpenMeteoGeocoder::new(config.geocoder_url.clone())?;
        let template = FormatTemplate::parse(&config.template)
            .context("Failed to load `template` from config")?;

        let resolver =
            Resolver::new(Arc::from(source), Arc::new(geocoder), config.resolver_settings());

        Ok(Self::new(resolver, template))
    }

    pub async fn report(
        &self,
        request: &WeatherRequest,
        today: NaiveDate,
    ) -> Result<String, WeatherError> {
        let payload = self.resolver.resolve(&request.location).await?;
        extract(&payload, request.day_offset(today), &self.template)
    }

    /// Reply to raw command arguments like `Bratislava - 20.12.2014`.
    ///
    /// Failures become their message text; blank input gets no reply.
    pub async fn answer(&self, args: &str, today: NaiveDate) -> Option<String> {
        let request = WeatherRequest::parse(args)?;
        info!(location = %request.location, date = ?request.date, "weather requested");

        let reply = match self.report(&request, today).await {
            Ok(report) => report,
            Err(err) => {
                warn!(location = %request.location, error = ?err, "weather request failed");
                err.to_string()
            }
        };

        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverSettings;
    use crate::test_support::{FakeGeocoder, FakeSource, forecast_json};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHORT: &str = "{city}: {daytemp}/{nighttemp} {txt}";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 12, 17).expect("valid date")
    }

    fn service(source: FakeSource) -> WeatherService {
        let resolver = Resolver::new(
            Arc::new(source),
            Arc::new(FakeGeocoder::at(48.1, 17.1)),
            ResolverSettings::default(),
        );
        WeatherService::new(resolver, FormatTemplate::parse(SHORT).expect("template"))
    }

    fn bratislava() -> serde_json::Value {
        forecast_json(
            "Bratislava",
            "Slovakia",
            &[(20, 10, 15, "Sunny"), (18, 8, 20, "Cloudy"), (5, -2, 25, "Snow")],
        )
    }

    #[tokio::test]
    async fn answer_defaults_to_today() {
        let svc = service(FakeSource::default().with("Bratislava", bratislava()));

        let reply = svc.answer("Bratislava", today()).await;

        assert_eq!(reply.as_deref(), Some("Bratislava: 20/10 Sunny"));
    }

    #[tokio::test]
    async fn answer_uses_requested_date() {
        let svc = service(FakeSource::default().with("Bratislava", bratislava()));

        let reply = svc.answer("Bratislava - 19.12.2014", today()).await;

        assert_eq!(reply.as_deref(), Some("Bratislava: 5/-2 Snow"));
    }

    #[tokio::test]
    async fn answer_reports_errors_as_text() {
        let svc = service(FakeSource::default().with("Bratislava", bratislava()));

        let reply = svc.answer("Bratislava - 30.12.2014", today()).await.expect("reply");
        assert!(reply.contains("No forecast available for day offset 13"));

        let reply = svc.answer("Atlantis", today()).await;
        assert_eq!(reply.as_deref(), Some("No cities match your search query"));
    }

    #[tokio::test]
    async fn blank_command_gets_no_answer() {
        let svc = service(FakeSource::default());
        assert_eq!(svc.answer("  ", today()).await, None);
    }

    #[test]
    fn from_config_rejects_bad_template() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.template = "{city} {pressure}".into();

        let err = WeatherService::from_config(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("unknown slot"));
    }

    #[tokio::test]
    async fn from_config_end_to_end_through_geocoder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/KEY/conditions/forecast10day/lang:EN/q/Petrzalka.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"error": {"type": "querynotfound", "description": "No cities match"}}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Petržalka", "latitude": 48.12, "longitude": 17.11}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/KEY/conditions/forecast10day/lang:EN/q/48.12,17.11.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bratislava()))
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.endpoint = format!("{}/api", server.uri());
        cfg.geocoder_url = format!("{}/v1/search", server.uri());

        let svc = WeatherService::from_config(&cfg).expect("service");
        let reply = svc.answer("Petrzalka - 18.12.2014", today()).await;

        assert_eq!(
            reply.as_deref(),
            Some(concat!(
                "Bratislava, Slovakia -> Day: 18\u{2103} , ",
                "Night: 8\u{2103} , Wind: 20 km/h (Cloudy)"
            ))
        );
    }
}
