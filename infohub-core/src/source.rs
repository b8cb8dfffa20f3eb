//! Abstractions over the three third-party upstream APIs.
//!
//! Each source forwards one request to one upstream, reshapes the payload
//! into the narrower domain model, and maps every failure into
//! [`SourceError`]. No retries, no caching: every call is one round-trip.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::convert::RateSet;
use crate::model::{Quote, WeatherReport};

pub mod exchange_rate;
pub mod open_meteo;
pub mod quotable;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure reaching the upstream.
    #[error("upstream unreachable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Upstream answered 2xx but the payload was missing expected fields.
    #[error("unexpected upstream payload: {0}")]
    Format(String),

    /// Geocoding produced no match for the requested city.
    #[error("city not found")]
    CityNotFound,
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions for a city name, geocoded first.
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, SourceError>;
}

#[async_trait]
pub trait RateSource: Send + Sync + Debug {
    /// INR-anchored conversion factors, fetched fresh on every call.
    async fn fetch_rates(&self) -> Result<RateSet, SourceError>;
}

#[async_trait]
pub trait QuoteSource: Send + Sync + Debug {
    async fn random_quote(&self) -> Result<Quote, SourceError>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
