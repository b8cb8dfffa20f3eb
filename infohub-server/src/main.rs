//! HTTP backend for the InfoHub demo.
//!
//! A thin proxy over three public third-party APIs: each route forwards one
//! request to one upstream, reshapes the payload, and translates failures
//! into fixed-shape JSON errors.

use std::sync::Arc;

use anyhow::Context;
use infohub_core::Config;
use infohub_core::source::{
    exchange_rate::ExchangeRateApiSource, open_meteo::OpenMeteoSource, quotable::QuotableSource,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod api;

use api::{AppState, app_router};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::load()?;

    // One pooled client, shared by all three sources.
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()
        .context("Failed to build upstream HTTP client")?;

    let state = Arc::new(AppState {
        weather: Arc::new(OpenMeteoSource::new(
            http.clone(),
            config.upstream.geocoding_url.clone(),
            config.upstream.forecast_url.clone(),
        )),
        rates: Arc::new(ExchangeRateApiSource::new(
            http.clone(),
            config.upstream.rates_url.clone(),
        )),
        quotes: Arc::new(QuotableSource::new(
            http,
            config.upstream.quotes_url.clone(),
        )),
    });

    let router = app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Backend listening on {}", config.listen_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
