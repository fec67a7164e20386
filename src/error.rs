//! Error types for the classification service.
//!
//! - `ValidationError`: the request body has the wrong shape. Surfaced as 400.
//! - `BodyError`: the body could not be read or decoded. Surfaced as 400 or 413.
//! - `FileProcessingError`: the optional file payload could not be used.
//!   Recovered locally; the request still succeeds with zeroed file fields.

use hyper::StatusCode;

/// Client input does not satisfy the request contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `data` is absent or not an array
    #[error("Missing or invalid 'data' field")]
    MissingData,
}

/// Failure while reading or decoding the request body
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// Declared or streamed body exceeds the configured ceiling
    #[error("Request body too large")]
    TooLarge,

    /// Transport error while collecting the body
    #[error("Failed to read request body: {0}")]
    Read(String),

    /// Body is declared as JSON but does not parse
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl BodyError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Read(_) | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Failure while inspecting `file_b64`; never changes the response status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessingError {
    /// `file_b64` was present but not a string
    #[error("file_b64 must be a string")]
    NotAString,

    /// Decoding and re-encoding did not reproduce the input
    #[error("Invalid Base64 string")]
    InvalidBase64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_part_of_contract() {
        assert_eq!(
            ValidationError::MissingData.to_string(),
            "Missing or invalid 'data' field"
        );
    }

    #[test]
    fn test_body_error_status() {
        assert_eq!(BodyError::TooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            BodyError::Read("reset".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(BodyError::from(json_err).status(), StatusCode::BAD_REQUEST);
    }
}
