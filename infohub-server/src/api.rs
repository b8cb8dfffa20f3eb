use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::error;

use infohub_core::{
    Config,
    convert::{Converter, normalize_amount},
    model::{BaseRates, CurrencyQuote},
    source::{QuoteSource, RateSource, SourceError, WeatherSource},
};

/// The three upstream sources, shared immutably across requests. No other
/// state crosses a request boundary.
pub struct AppState {
    pub weather: Arc<dyn WeatherSource>,
    pub rates: Arc<dyn RateSource>,
    pub quotes: Arc<dyn QuoteSource>,
}

/// Fixed-shape body every route answers failures with.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

fn error_response(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city: Option<String>,
}

async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Response {
    let city = match query.city.as_deref() {
        Some(city) if !city.is_empty() => city,
        _ => "London",
    };

    match state.weather.current_weather(city).await {
        Ok(report) => Json(report).into_response(),
        Err(SourceError::CityNotFound) => {
            error_response(StatusCode::NOT_FOUND, "City not found")
        }
        Err(err) => {
            error!("Weather error: {err}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch weather data",
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrencyQuery {
    amount: Option<String>,
}

async fn get_currency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CurrencyQuery>,
) -> Response {
    // Absent, zero, or non-numeric amounts all fall back to converting a
    // single rupee.
    let amount = query
        .amount
        .as_deref()
        .map(normalize_amount)
        .filter(|v| *v != 0.0)
        .unwrap_or(1.0);

    match state.rates.fetch_rates().await {
        Ok(rates) => {
            let base_rates = BaseRates {
                usd: rates.usd_per_inr,
                eur: rates.eur_per_inr,
            };
            let (usd, eur) = Converter::new(rates).amounts_from_inr(amount);

            Json(CurrencyQuote {
                inr: amount,
                usd,
                eur,
                base_rates,
            })
            .into_response()
        }
        Err(err) => {
            error!("Currency error: {err}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch currency data",
            )
        }
    }
}

async fn get_quote(State(state): State<Arc<AppState>>) -> Response {
    match state.quotes.random_quote().await {
        Ok(quote) => Json(quote).into_response(),
        Err(err) => {
            error!("Quote error: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch quote")
        }
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/api/weather", get(get_weather))
        .route("/api/currency", get(get_currency))
        .route("/api/quote", get(get_quote))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
}
