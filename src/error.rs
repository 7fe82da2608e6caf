use thiserror::Error;

/// Errors produced while resolving, sending, or interpreting a summarization request
#[derive(Error, Debug)]
pub enum SmartCvError {
    #[error("Backend URL configuration problem: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("A summarization request is already in progress")]
    Busy,

    #[error(
        "Cannot connect to the backend server (or the request was blocked by CORS). \
         Make sure the server is running and reachable at {base_url}. Detail: {reason}"
    )]
    Transport {
        base_url: String,
        url: String,
        reason: String,
    },

    #[error("({status}) {message} - URL: {url}")]
    Http {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Unexpected response format: {0}")]
    UnexpectedShape(String),

    #[error("{0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SmartCvError {
    pub fn empty_input() -> Self {
        Self::Validation("Please enter your work experience before submitting.".to_string())
    }

    /// Validation errors are reported inline and never replace a stored result
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Busy)
    }
}

pub type Result<T> = std::result::Result<T, SmartCvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status_and_url() {
        let err = SmartCvError::Http {
            status: 503,
            message: "model unavailable".to_string(),
            url: "http://localhost:8000/summarize".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "(503) model unavailable - URL: http://localhost:8000/summarize"
        );
    }

    #[test]
    fn transport_error_mentions_base_url() {
        let err = SmartCvError::Transport {
            base_url: "http://localhost:8000".to_string(),
            url: "http://localhost:8000/summarize".to_string(),
            reason: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://localhost:8000"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn validation_kinds() {
        assert!(SmartCvError::empty_input().is_validation());
        assert!(SmartCvError::Busy.is_validation());
        assert!(!SmartCvError::Backend("ERROR: x".into()).is_validation());
    }
}
