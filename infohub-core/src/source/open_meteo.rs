use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::WeatherReport;

use super::{SourceError, WeatherSource, truncate_body};

/// Open-Meteo weather, resolved in two hops: the geocoding API turns a city
/// name into coordinates, and the forecast API supplies the current
/// conditions for them. Neither endpoint needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoSource {
    pub fn new(http: Client, geocoding_url: String, forecast_url: String) -> Self {
        Self {
            http,
            geocoding_url,
            forecast_url,
        }
    }

    async fn geocode(&self, city: &str) -> Result<GeoMatch, SourceError> {
        let url = format!("{}/v1/search", self.geocoding_url);

        let res = self
            .http
            .get(&url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: GeoResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Format(format!("geocoding response: {e}")))?;

        parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(SourceError::CityNotFound)
    }

    async fn fetch_current(&self, place: &GeoMatch) -> Result<CurrentWeather, SourceError> {
        let url = format!("{}/v1/forecast", self.forecast_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Format(format!("forecast response: {e}")))?;

        parsed.current_weather.ok_or_else(|| {
            SourceError::Format("forecast response missing current_weather".to_owned())
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoMatch>>,
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: u8,
    #[serde(default)]
    is_day: u8,
    time: String,
}

#[async_trait]
impl WeatherSource for OpenMeteoSource {
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, SourceError> {
        let place = self.geocode(city).await?;
        debug!(city, resolved = %place.name, "geocoded city");

        let current = self.fetch_current(&place).await?;

        Ok(WeatherReport {
            name: place.name,
            country: place.country,
            temperature: current.temperature,
            windspeed: current.windspeed,
            winddirection: current.winddirection,
            weathercode: current.weathercode,
            is_day: current.is_day,
            time: current.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GEO_JSON: &str = r#"{
        "results": [
            {
                "id": 2988507,
                "name": "Paris",
                "latitude": 48.85341,
                "longitude": 2.3488,
                "country": "France"
            }
        ]
    }"#;

    const FORECAST_JSON: &str = r#"{
        "latitude": 48.85,
        "longitude": 2.35,
        "current_weather": {
            "temperature": 21.4,
            "windspeed": 9.9,
            "winddirection": 180.0,
            "weathercode": 2,
            "is_day": 1,
            "time": "2026-08-07T12:00"
        }
    }"#;

    fn source(server: &MockServer) -> OpenMeteoSource {
        OpenMeteoSource::new(Client::new(), server.uri(), server.uri())
    }

    async fn mount_geocoding(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn reshapes_both_hops_into_one_report() {
        let server = MockServer::start().await;
        mount_geocoding(&server, GEO_JSON).await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FORECAST_JSON))
            .mount(&server)
            .await;

        let report = source(&server).current_weather("Paris").await.unwrap();

        assert_eq!(report.name, "Paris");
        assert_eq!(report.country, "France");
        assert_eq!(report.temperature, 21.4);
        assert_eq!(report.weathercode, 2);
        assert_eq!(report.time, "2026-08-07T12:00");
    }

    #[tokio::test]
    async fn empty_geocoding_results_mean_city_not_found() {
        let server = MockServer::start().await;
        mount_geocoding(&server, r#"{"results": []}"#).await;

        let err = source(&server)
            .current_weather("UnknownPlaceXYZ")
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::CityNotFound));
    }

    #[tokio::test]
    async fn missing_results_key_means_city_not_found() {
        let server = MockServer::start().await;
        mount_geocoding(&server, r#"{"generationtime_ms": 0.5}"#).await;

        let err = source(&server)
            .current_weather("UnknownPlaceXYZ")
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::CityNotFound));
    }

    #[tokio::test]
    async fn geocoding_failure_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = source(&server).current_weather("Paris").await.unwrap_err();

        match err {
            SourceError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forecast_without_current_weather_is_a_format_error() {
        let server = MockServer::start().await;
        mount_geocoding(&server, GEO_JSON).await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"latitude": 48.85}"#))
            .mount(&server)
            .await;

        let err = source(&server).current_weather("Paris").await.unwrap_err();

        assert!(matches!(err, SourceError::Format(_)));
    }
}
