use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::Quote;

use super::{QuoteSource, SourceError, truncate_body};

/// quotable.io random quotes. `content` becomes `quote` on the way through.
#[derive(Debug, Clone)]
pub struct QuotableSource {
    http: Client,
    base_url: String,
}

impl QuotableSource {
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct QuotableResponse {
    content: String,
    author: String,
}

#[async_trait]
impl QuoteSource for QuotableSource {
    async fn random_quote(&self) -> Result<Quote, SourceError> {
        let url = format!("{}/random", self.base_url);

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: QuotableResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Format(format!("quote response: {e}")))?;

        Ok(Quote {
            quote: parsed.content,
            author: parsed.author,
        })
    }
}
