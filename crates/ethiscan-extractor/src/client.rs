//! HTTP client for the remote analysis service and for fetching product pages.

use std::time::Duration;

use ethiscan_core::ProductRecord;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::rate_limit::retry_with_backoff;

/// Body POSTed to the analysis endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest<'a> {
    pub url: &'a str,
    pub product_data: &'a ProductRecord,
}

/// Sends extracted records for analysis and fetches raw page HTML.
///
/// Transient errors (429, network failures) are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct AnalyzeClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl AnalyzeClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// POSTs `{url, productData}` to `endpoint` and returns the service's
    /// JSON verdict unchanged.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidEndpoint`] if `endpoint` is not an http(s) URL.
    /// - [`ClientError::RateLimited`] / [`ClientError::Http`] after retries.
    /// - [`ClientError::NotFound`] / [`ClientError::UnexpectedStatus`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the response body is not JSON.
    pub async fn analyze(
        &self,
        endpoint: &str,
        record: &ProductRecord,
    ) -> Result<Value, ClientError> {
        let endpoint = validate_url(endpoint)?;
        let body = AnalyzeRequest {
            url: &record.url,
            product_data: record,
        };

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let endpoint = endpoint.clone();
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(endpoint.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .json(body)
                    .send()
                    .await?;
                let response = check_status(response, &endpoint)?;
                let text = response.text().await?;
                serde_json::from_str::<Value>(&text).map_err(|e| ClientError::Deserialize {
                    context: format!("analysis response from {endpoint}"),
                    source: e,
                })
            }
        })
        .await
    }

    /// GETs the raw HTML of a product page.
    ///
    /// # Errors
    ///
    /// Same status and transport errors as [`AnalyzeClient::analyze`].
    pub async fn fetch_page(&self, url: &str) -> Result<String, ClientError> {
        let url = validate_url(url)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-IN,en;q=0.9")
                    .send()
                    .await?;
                let response = check_status(response, &url)?;
                Ok(response.text().await?)
            }
        })
        .await
    }
}

fn validate_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidEndpoint {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }
    Ok(url)
}

/// Maps non-2xx responses onto typed errors.
fn check_status(response: Response, url: &Url) -> Result<Response, ClientError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited {
            domain: url.host_str().unwrap_or_default().to_owned(),
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
