use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::convert::RateSet;

use super::{RateSource, SourceError, truncate_body};

/// exchangerate-api.com, INR base. One GET; only the USD and EUR factors of
/// the returned table are kept.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiSource {
    http: Client,
    base_url: String,
}

impl ExchangeRateApiSource {
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: RatesTable,
}

#[derive(Debug, Deserialize)]
struct RatesTable {
    #[serde(rename = "USD")]
    usd: Option<f64>,
    #[serde(rename = "EUR")]
    eur: Option<f64>,
}

#[async_trait]
impl RateSource for ExchangeRateApiSource {
    async fn fetch_rates(&self) -> Result<RateSet, SourceError> {
        let url = format!("{}/v4/latest/INR", self.base_url);

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: RatesResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Format(format!("rates response: {e}")))?;

        let usd = parsed
            .rates
            .usd
            .ok_or_else(|| SourceError::Format("rates table missing USD".to_owned()))?;
        let eur = parsed
            .rates
            .eur
            .ok_or_else(|| SourceError::Format("rates table missing EUR".to_owned()))?;

        debug!(usd, eur, "fetched INR rates");

        RateSet::new(usd, eur).map_err(|e| SourceError::Format(e.to_string()))
    }
}
