//! Request shapes for the two backend conventions.
//!
//! The variant is chosen once from the resolved base URL; path and payload
//! are pure functions of it.

use serde::Serialize;
use std::fmt;

const SUMMARIZE_SEGMENT: &str = "summarize";
const PREDICT_SEGMENT: &str = "api/predict/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendVariant {
    /// `POST {base}/summarize` with `{"text": ...}`, answered by `{"summary": ...}`
    Summarize,
    /// `POST {base}/api/predict/` with `{"data": [...]}`, answered by `{"data": [...]}`
    Predict,
}

impl BackendVariant {
    /// Predict when the base URL contains the hosting provider's domain fragment
    pub fn detect(base_url: &str, predict_host_fragment: &str) -> Self {
        let fragment = predict_host_fragment.trim().to_ascii_lowercase();
        if !fragment.is_empty() && base_url.to_ascii_lowercase().contains(&fragment) {
            BackendVariant::Predict
        } else {
            BackendVariant::Summarize
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            BackendVariant::Summarize => SUMMARIZE_SEGMENT,
            BackendVariant::Predict => PREDICT_SEGMENT,
        }
    }

    /// Joins the variant path onto `base_url` with exactly one slash.
    /// A base URL that already carries the path is returned qualified, not extended.
    pub fn endpoint_url(self, base_url: &str) -> String {
        let trimmed = base_url.trim().trim_end_matches('/');
        match self {
            BackendVariant::Summarize => {
                if trimmed.ends_with("/summarize") {
                    trimmed.to_string()
                } else {
                    format!("{trimmed}/{SUMMARIZE_SEGMENT}")
                }
            }
            BackendVariant::Predict => {
                if trimmed.ends_with("/api/predict") {
                    format!("{trimmed}/")
                } else if trimmed.ends_with("/api") {
                    format!("{trimmed}/predict/")
                } else {
                    format!("{trimmed}/{PREDICT_SEGMENT}")
                }
            }
        }
    }

    pub fn body(self, input_text: &str) -> RequestBody {
        match self {
            BackendVariant::Summarize => RequestBody::Text {
                text: input_text.to_string(),
            },
            BackendVariant::Predict => RequestBody::Data {
                data: vec![input_text.to_string()],
            },
        }
    }
}

impl fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendVariant::Summarize => "summarize",
            BackendVariant::Predict => "predict",
        };
        f.write_str(s)
    }
}

/// JSON payload sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Text { text: String },
    Data { data: Vec<String> },
}

/// A fully built outbound request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizationRequest {
    pub variant: BackendVariant,
    pub url: String,
    pub body: RequestBody,
}

/// Callers reject blank input before building a request.
pub fn build_request(
    variant: BackendVariant,
    base_url: &str,
    input_text: &str,
) -> SummarizationRequest {
    SummarizationRequest {
        variant,
        url: variant.endpoint_url(base_url),
        body: variant.body(input_text),
    }
}
