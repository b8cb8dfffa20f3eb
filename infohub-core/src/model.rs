use serde::{Deserialize, Serialize};

/// Geocoded place identity plus the current conditions block, passed through
/// from the forecast API unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub name: String,
    pub country: String,
    pub temperature: f64,
    pub windspeed: f64,
    pub winddirection: f64,
    pub weathercode: u8,
    #[serde(default)]
    pub is_day: u8,
    pub time: String,
}

impl WeatherReport {
    /// Human-readable label for the WMO weather code.
    pub fn condition(&self) -> &'static str {
        match self.weathercode {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            71 => "Snowfall",
            95 => "Thunderstorm",
            99 => "Heavy storm",
            _ => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub author: String,
}

/// Wire shape of `GET /api/currency`: the requested amount converted out of
/// INR, plus the factors the client seeds its own converter with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    pub inr: f64,
    pub usd: f64,
    pub eur: f64,
    #[serde(rename = "baseRates")]
    pub base_rates: BaseRates,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRates {
    #[serde(rename = "USD")]
    pub usd: f64,
    #[serde(rename = "EUR")]
    pub eur: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_weather_codes_have_labels() {
        let mut report = sample();
        report.weathercode = 0;
        assert_eq!(report.condition(), "Clear sky");
        report.weathercode = 95;
        assert_eq!(report.condition(), "Thunderstorm");
        report.weathercode = 42;
        assert_eq!(report.condition(), "Unknown");
    }

    #[test]
    fn currency_quote_uses_client_facing_key_names() {
        let quote = CurrencyQuote {
            inr: 1.0,
            usd: 0.012,
            eur: 0.011,
            base_rates: BaseRates {
                usd: 0.012,
                eur: 0.011,
            },
        };

        assert_eq!(
            serde_json::to_value(&quote).unwrap(),
            json!({
                "inr": 1.0,
                "usd": 0.012,
                "eur": 0.011,
                "baseRates": { "USD": 0.012, "EUR": 0.011 },
            })
        );
    }

    fn sample() -> WeatherReport {
        WeatherReport {
            name: "London".to_owned(),
            country: "United Kingdom".to_owned(),
            temperature: 17.3,
            windspeed: 11.2,
            winddirection: 240.0,
            weathercode: 2,
            is_day: 1,
            time: "2026-08-07T12:00".to_owned(),
        }
    }
}
