use async_trait::async_trait;
use reqwest::Client;

use crate::adapter::RequestBody;
use crate::error::{Result, SmartCvError};

#[cfg(test)]
use mockall::automock;

/// A settled HTTP exchange; status and body are interpreted by the normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    pub body: String,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body. Only transport-level failures are errors; any HTTP status is a response.
    async fn post_json(&self, url: &str, body: &RequestBody) -> Result<RawResponse>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| SmartCvError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &RequestBody) -> Result<RawResponse> {
        tracing::debug!(%url, "POST");

        // No timeout: the request settles when the transport does.
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| SmartCvError::Transport {
                base_url: String::new(),
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| SmartCvError::Transport {
            base_url: String::new(),
            url: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        Ok(RawResponse {
            status,
            url: final_url,
            body,
        })
    }
}
