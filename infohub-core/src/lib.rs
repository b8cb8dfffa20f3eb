//! Core library for the InfoHub demo.
//!
//! This crate defines:
//! - Configuration shared by the backend and the terminal client
//! - The currency conversion engine
//! - Abstractions over the third-party upstream APIs (weather, rates, quotes)
//!
//! It is used by `infohub-server` and `infohub-cli`, but can also be reused
//! by other binaries or services.

pub mod config;
pub mod convert;
pub mod model;
pub mod source;

pub use config::Config;
pub use convert::{ConversionState, ConvertError, Converter, Edit, Field, RateSet, Session};
pub use model::{BaseRates, CurrencyQuote, Quote, WeatherReport};
pub use source::{QuoteSource, RateSource, SourceError, WeatherSource};
