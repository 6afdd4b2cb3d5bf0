//! NewsAPI article source.
//!
//! Fetches one page of articles about Islamic finance standards from the
//! NewsAPI `everything` endpoint. The query, sort order and page size are
//! fixed; only the endpoint and language can be changed through
//! [`crate::config::NewsConfig`].
//!
//! The result is always a [`NewsEnvelope`]. Transport failures and API errors
//! alike come back as `status: "error"` with a `message`, so callers have a
//! single shape to check.

use reqwest::StatusCode;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::NewsConfig;
use crate::models::NewsEnvelope;
use crate::utils::truncate_for_log;

pub const NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

/// Search terms covering Islamic finance standard setters and instruments.
pub const NEWS_QUERY: &str = "AAOIFI OR IFSB OR 'Islamic finance' OR 'Shariah compliance' OR \
'Shariah board' OR 'Islamic banking standards' OR 'fatwa finance' OR \
'Islamic financial regulation' OR 'Islamic accounting' OR 'Sukuk' OR \
'Takaful' OR Murabaha OR Musharaka OR Mudaraba";

pub const SORT_BY: &str = "publishedAt";

/// One page, so a run makes at most this many model calls.
pub const PAGE_SIZE: u32 = 10;

/// Client for the NewsAPI `everything` endpoint.
pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: String,
    config: NewsConfig,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>, config: NewsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// The search URL, without credentials (the key travels in a header).
    pub fn request_url(&self) -> Result<Url, url::ParseError> {
        let page_size = PAGE_SIZE.to_string();
        Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("q", NEWS_QUERY),
                ("language", self.config.language.as_str()),
                ("sortBy", SORT_BY),
                ("pageSize", page_size.as_str()),
            ],
        )
    }

    /// Fetch one page of articles.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch_articles(&self) -> NewsEnvelope {
        let t0 = Instant::now();
        let url = match self.request_url() {
            Ok(url) => url,
            Err(e) => {
                error!(endpoint = %self.config.endpoint, error = %e, "Invalid NewsAPI endpoint");
                return NewsEnvelope::error(format!("invalid NewsAPI endpoint: {e}"));
            }
        };
        debug!(%url, "Requesting articles");

        let sent = self.http.get(url).header("X-Api-Key", &self.api_key).send().await;
        let envelope = match sent {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => interpret_news_response(status, &body),
                    Err(e) => NewsEnvelope::error(e.to_string()),
                }
            }
            Err(e) => NewsEnvelope::error(e.to_string()),
        };

        let elapsed_ms = t0.elapsed().as_millis() as u64;
        if envelope.is_ok() {
            info!(
                elapsed_ms,
                count = envelope.articles.len(),
                total = ?envelope.total_results,
                "Fetched articles"
            );
        } else {
            error!(
                elapsed_ms,
                code = ?envelope.code,
                message = envelope.message.as_deref().unwrap_or(""),
                "Error fetching news"
            );
        }
        envelope
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Turn an HTTP status and body from NewsAPI into an envelope.
pub(crate) fn interpret_news_response(status: StatusCode, body: &str) -> NewsEnvelope {
    match serde_json::from_str::<NewsEnvelope>(body) {
        Ok(envelope) if status.is_success() => envelope,
        Ok(mut envelope) => {
            envelope.status = "error".to_string();
            envelope.articles.clear();
            if envelope.message.is_none() {
                envelope.message = Some(format!("{status}"));
            }
            envelope
        }
        Err(e) if status.is_success() => {
            NewsEnvelope::error(format!("could not decode NewsAPI response: {e}"))
        }
        Err(_) => NewsEnvelope::error(format!("{status}: {}", truncate_for_log(body, 300))),
    }
}
