//! Turns raw backend responses into a summary text or a classified error.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::adapter::BackendVariant;
use crate::error::{Result, SmartCvError};

/// Payload prefixes a backend uses to report failure inside a 2xx response
const ERROR_MARKERS: [&str; 2] = ["ERROR:", "Error:"];

/// Outcome of one submission as held by the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummarizationResult {
    Success { text: String },
    Failure { message: String },
}

impl SummarizationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SummarizationResult::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SummarizationResult::Success { text } => Some(text),
            SummarizationResult::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SummarizationResult::Success { .. } => None,
            SummarizationResult::Failure { message } => Some(message),
        }
    }
}

impl From<Result<String>> for SummarizationResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => SummarizationResult::Success { text },
            Err(e) => SummarizationResult::Failure {
                message: e.to_string(),
            },
        }
    }
}

/// Interpret a settled HTTP response for the given backend variant.
pub fn normalize(variant: BackendVariant, status: u16, body: &str, url: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(http_failure(status, body, url));
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        SmartCvError::UnexpectedShape(format!("response body is not valid JSON ({e})"))
    })?;

    let text = match variant {
        BackendVariant::Summarize => summary_field(&value)?,
        BackendVariant::Predict => prediction_field(&value)?,
    };

    if ERROR_MARKERS.iter().any(|marker| text.starts_with(marker)) {
        return Err(SmartCvError::Backend(text));
    }

    Ok(text)
}

fn summary_field(value: &Value) -> Result<String> {
    match value.get("summary") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(SmartCvError::UnexpectedShape(
            "'summary' field is empty".to_string(),
        )),
        _ => Err(SmartCvError::UnexpectedShape(
            "'summary' field not found".to_string(),
        )),
    }
}

fn prediction_field(value: &Value) -> Result<String> {
    if let Some(err) = message_from(value, "error") {
        return Err(SmartCvError::Backend(format!(
            "Backend reported an error: {err}"
        )));
    }

    match value.get("data") {
        Some(Value::Array(items)) => match items.first() {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(SmartCvError::UnexpectedShape(
                "first 'data' element is not text".to_string(),
            )),
            None => Err(SmartCvError::UnexpectedShape(
                "'data' array is empty".to_string(),
            )),
        },
        _ => Err(SmartCvError::UnexpectedShape(
            "neither 'data' nor 'error' found".to_string(),
        )),
    }
}

/// Best available message for a non-2xx response:
/// `error` or `detail` field, then the raw body, then the status reason.
fn http_failure(status: u16, body: &str, url: &str) -> SmartCvError {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| message_from(&v, "error").or_else(|| message_from(&v, "detail")));

    let message = from_json
        .or_else(|| {
            let raw = body.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        })
        .or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP error! status: {status}"));

    SmartCvError::Http {
        status,
        message,
        url: url.to_string(),
    }
}

fn message_from(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // e.g. FastAPI validation errors arrive as an array of objects
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:8000/summarize";

    fn result(variant: BackendVariant, status: u16, body: &str) -> SummarizationResult {
        normalize(variant, status, body, URL).into()
    }

    #[test]
    fn summarize_success_keeps_literal_text() {
        let r = result(
            BackendVariant::Summarize,
            200,
            r#"{"summary": "- Led team\n- Improved perf 20%"}"#,
        );
        assert_eq!(
            r,
            SummarizationResult::Success {
                text: "- Led team\n- Improved perf 20%".to_string()
            }
        );
    }

    #[test]
    fn summarize_missing_field_is_shape_error() {
        let err = normalize(BackendVariant::Summarize, 200, r#"{"result": "x"}"#, URL).unwrap_err();
        assert!(matches!(err, SmartCvError::UnexpectedShape(_)));

        let err = normalize(BackendVariant::Summarize, 200, r#"{"summary": 42}"#, URL).unwrap_err();
        assert!(matches!(err, SmartCvError::UnexpectedShape(_)));
    }

    #[test]
    fn success_with_invalid_json_is_shape_error() {
        let err = normalize(BackendVariant::Summarize, 200, "<html>ok</html>", URL).unwrap_err();
        assert!(matches!(err, SmartCvError::UnexpectedShape(_)));
        assert!(err.to_string().starts_with("Unexpected response format"));
    }

    #[test]
    fn predict_success_takes_first_element() {
        let r = result(
            BackendVariant::Predict,
            200,
            r#"{"data": ["Plain summary text", "ignored"]}"#,
        );
        assert_eq!(r.text(), Some("Plain summary text"));
    }

    #[test]
    fn error_marker_reclassified_as_failure() {
        let r = result(BackendVariant::Predict, 200, r#"{"data": ["ERROR: rate limited"]}"#);
        assert_eq!(
            r,
            SummarizationResult::Failure {
                message: "ERROR: rate limited".to_string()
            }
        );

        let r = result(
            BackendVariant::Summarize,
            200,
            r#"{"summary": "Error: model crashed"}"#,
        );
        assert_eq!(r.message(), Some("Error: model crashed"));
    }

    #[test]
    fn marker_must_be_a_prefix() {
        let r = result(
            BackendVariant::Summarize,
            200,
            r#"{"summary": "Reduced ERROR: rates by 30%"}"#,
        );
        assert!(r.is_success());
    }

    #[test]
    fn predict_error_field_on_2xx_is_failure() {
        let err = normalize(
            BackendVariant::Predict,
            200,
            r#"{"error": "queue full"}"#,
            URL,
        )
        .unwrap_err();
        assert!(matches!(err, SmartCvError::Backend(_)));
        assert!(err.to_string().contains("queue full"));
    }

    #[test]
    fn predict_error_field_wins_over_data() {
        let err = normalize(
            BackendVariant::Predict,
            200,
            r#"{"data": ["fine"], "error": "quota"}"#,
            URL,
        )
        .unwrap_err();
        assert!(matches!(err, SmartCvError::Backend(ref m) if m.contains("quota")));
    }

    #[test]
    fn predict_null_error_with_data_is_success() {
        let r = result(
            BackendVariant::Predict,
            200,
            r#"{"data": ["ok"], "error": null}"#,
        );
        assert_eq!(r.text(), Some("ok"));
    }

    #[test]
    fn whitespace_summary_is_accepted_empty_is_not() {
        let r = result(BackendVariant::Summarize, 200, r#"{"summary": "   "}"#);
        assert_eq!(r.text(), Some("   "));

        let err = normalize(BackendVariant::Summarize, 200, r#"{"summary": ""}"#, URL).unwrap_err();
        assert!(matches!(err, SmartCvError::UnexpectedShape(_)));
    }

    #[test]
    fn predict_without_data_or_error_is_shape_error() {
        for body in [r#"{}"#, r#"{"data": []}"#, r#"{"data": "text"}"#, r#"{"data": [1]}"#] {
            let err = normalize(BackendVariant::Predict, 200, body, URL).unwrap_err();
            assert!(matches!(err, SmartCvError::UnexpectedShape(_)), "{body}");
        }
    }

    #[test]
    fn http_500_uses_detail() {
        let r = result(
            BackendVariant::Summarize,
            500,
            r#"{"detail": "model unavailable"}"#,
        );
        let msg = r.message().unwrap();
        assert!(msg.contains("model unavailable"));
        assert!(msg.contains("(500)"));
        assert!(msg.contains(URL));
    }

    #[test]
    fn http_error_field_preferred_over_detail() {
        let err = normalize(
            BackendVariant::Summarize,
            400,
            r#"{"detail": "d", "error": "e"}"#,
            URL,
        )
        .unwrap_err();
        assert!(matches!(err, SmartCvError::Http { ref message, .. } if message == "e"));
    }

    #[test]
    fn http_structured_detail_is_serialised() {
        let err = normalize(
            BackendVariant::Summarize,
            422,
            r#"{"detail": [{"loc": ["body", "text"], "msg": "too short"}]}"#,
            URL,
        )
        .unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn http_error_falls_back_to_raw_text_then_reason() {
        let message_of = |status: u16, body: &str| match normalize(
            BackendVariant::Summarize,
            status,
            body,
            URL,
        ) {
            Err(SmartCvError::Http { message, .. }) => message,
            other => panic!("expected HTTP error, got {other:?}"),
        };

        assert_eq!(message_of(502, "Bad gateway upstream"), "Bad gateway upstream");
        assert_eq!(message_of(503, ""), "Service Unavailable");
        assert_eq!(message_of(599, "  "), "HTTP error! status: 599");
    }
}
