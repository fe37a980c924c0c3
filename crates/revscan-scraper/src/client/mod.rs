//! HTTP client shared by every network step of a run.

mod origin;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::rate_limit::retry_after_cooldown;

pub use origin::{build_url, extract_domain};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const JSON_ACCEPT: &str = "application/json";

/// A 429 is retried exactly once.
const RATE_LIMIT_RETRIES: u32 = 1;

/// Browser-like HTTP client for review pages and the review API.
///
/// Holds a single `reqwest::Client` so connections are reused across the
/// whole run. A 429 response triggers a fixed cooldown and one retry of the
/// same request; any other failure is returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    client: Client,
    cooldown: Duration,
}

impl ReviewClient {
    /// Creates a `ReviewClient` with the configured timeouts, `User-Agent`
    /// and rate-limit cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        request_timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: &str,
        cooldown: Duration,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, cooldown })
    }

    /// Fetches a page, logging and swallowing every failure.
    ///
    /// Returns `None` when the request ultimately failed for any reason;
    /// callers skip extraction for the record and continue.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        tracing::debug!(url, "fetching page");
        match self.get_text(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url, error = %e, "fetch failed");
                None
            }
        }
    }

    /// Fetches a page body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] if the cooldown retry was throttled too.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::Http`] on network, TLS or timeout failure.
    pub async fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        retry_after_cooldown(RATE_LIMIT_RETRIES, self.cooldown, move || async move {
            let request = self.client.get(url).header(reqwest::header::ACCEPT, HTML_ACCEPT);
            let response = Self::send(request, url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches and deserializes a JSON document, optionally with a bearer token.
    ///
    /// # Errors
    ///
    /// Same as [`ReviewClient::get_text`], plus [`ScraperError::Deserialize`]
    /// if the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer_token: Option<&str>,
    ) -> Result<T, ScraperError> {
        retry_after_cooldown(RATE_LIMIT_RETRIES, self.cooldown, move || async move {
            let mut request = self.client.get(url).header(reqwest::header::ACCEPT, JSON_ACCEPT);
            if let Some(token) = bearer_token {
                request = request.bearer_auth(token);
            }
            let response = Self::send(request, url).await?;
            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
                context: url.to_owned(),
                source: e,
            })
        })
        .await
    }

    async fn send(request: RequestBuilder, url: &str) -> Result<reqwest::Response, ScraperError> {
        let response = request
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
