use std::sync::Arc;

use crate::adapter::{BackendVariant, build_request};
use crate::endpoint::EndpointConfiguration;
use crate::error::{Result, SmartCvError};
use crate::normalize::normalize;
use crate::transport::Transport;

/// One request/response round trip against the resolved backend
pub struct SummaryClient {
    endpoint: Arc<EndpointConfiguration>,
    variant: BackendVariant,
    tx: Arc<dyn Transport>,
}

impl SummaryClient {
    pub fn new(
        endpoint: Arc<EndpointConfiguration>,
        predict_host_fragment: &str,
        tx: Arc<dyn Transport>,
    ) -> Self {
        let variant = BackendVariant::detect(&endpoint.base_url, predict_host_fragment);
        tracing::info!(
            base_url = %endpoint.base_url,
            source = %endpoint.source,
            %variant,
            "Summary client ready"
        );
        Self {
            endpoint,
            variant,
            tx,
        }
    }

    pub fn endpoint(&self) -> &EndpointConfiguration {
        &self.endpoint
    }

    pub fn variant(&self) -> BackendVariant {
        self.variant
    }

    pub async fn summarize(&self, input_text: &str) -> Result<String> {
        if !self.endpoint.is_configured() {
            return Err(SmartCvError::Configuration(
                "backend URL is not set or empty; set the override variable or a fallback URL"
                    .to_string(),
            ));
        }
        if input_text.trim().is_empty() {
            return Err(SmartCvError::empty_input());
        }

        let request = build_request(self.variant, &self.endpoint.base_url, input_text);
        tracing::debug!(
            url = %request.url,
            variant = %request.variant,
            "Sending summarization request"
        );

        let raw = match self.tx.post_json(&request.url, &request.body).await {
            Ok(raw) => raw,
            Err(SmartCvError::Transport { url, reason, .. }) => {
                return Err(SmartCvError::Transport {
                    base_url: self.endpoint.base_url.clone(),
                    url,
                    reason,
                });
            }
            Err(e) => return Err(e),
        };

        normalize(self.variant, raw.status, &raw.body, &raw.url)
    }
}
