//! Error handling and custom error types
//!
//! Provides unified error handling across the client using thiserror. Every
//! variant renders to a single human-readable message suitable for display.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API Error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message_contains_status_and_body() {
        let err = Error::Provider {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("quota exceeded"));
    }

    #[test]
    fn test_invalid_request_message() {
        let err = Error::InvalidRequest("conversation history is empty".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid request: conversation history is empty"
        );
    }
}
