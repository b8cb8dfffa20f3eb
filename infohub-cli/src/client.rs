use anyhow::{Context, Result, bail};
use serde::Deserialize;

use infohub_core::model::{CurrencyQuote, Quote, WeatherReport};

/// Client for the InfoHub backend, speaking the same three routes the
/// browser client uses.
#[derive(Debug, Clone)]
pub struct Backend {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

impl Backend {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn weather(&self, city: &str) -> Result<WeatherReport> {
        let url = format!("{}/api/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("city", city)])
            .send()
            .await
            .context("Failed to reach the InfoHub backend")?;

        if !res.status().is_success() {
            bail!("{}", error_message(res, "Failed to fetch weather data").await);
        }

        res.json().await.context("Failed to decode weather response")
    }

    pub async fn currency(&self, amount: f64) -> Result<CurrencyQuote> {
        let url = format!("{}/api/currency", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("amount", amount.to_string())])
            .send()
            .await
            .context("Failed to reach the InfoHub backend")?;

        if !res.status().is_success() {
            bail!("{}", error_message(res, "Failed to fetch currency data").await);
        }

        res.json().await.context("Failed to decode currency response")
    }

    pub async fn quote(&self) -> Result<Quote> {
        let url = format!("{}/api/quote", self.base_url);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to reach the InfoHub backend")?;

        if !res.status().is_success() {
            bail!("{}", error_message(res, "Failed to fetch quote").await);
        }

        res.json().await.context("Failed to decode quote response")
    }
}

/// The backend answers failures with `{"error": "..."}`; anything else falls
/// back to a fixed message.
async fn error_message(res: reqwest::Response, fallback: &str) -> String {
    match res.json::<ErrorBody>().await {
        Ok(body) if !body.error.is_empty() => body.error,
        _ => fallback.to_owned(),
    }
}
