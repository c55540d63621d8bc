//! LLM error types

use thiserror::Error;

/// Errors that can occur talking to the generation oracle
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = LlmError::ApiError {
            status: 403,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error 403: quota exceeded");

        let err = LlmError::InvalidResponse("no candidates".to_string());
        assert!(err.to_string().contains("no candidates"));
    }
}
