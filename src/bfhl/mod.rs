//! Classification domain
//!
//! Pure functions behind `POST /bfhl`: partitioning of the `data` array,
//! prime detection, and inspection of an optional Base64 file payload.
//! Nothing here touches the network or shared state.

pub mod classify;
pub mod coerce;
pub mod detect;
pub mod file;
pub mod prime;
pub mod types;

use serde_json::Value;

use crate::error::ValidationError;

pub use classify::classify;
pub use detect::{InferDetector, SignatureDetector};
pub use file::FileInfo;
pub use types::{ClassifyResponse, ErrorResponse, HealthResponse};

/// Borrow the `data` array from a parsed request body
pub fn extract_data(body: &Value) -> Result<&[Value], ValidationError> {
    body.get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(ValidationError::MissingData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_data_requires_array() {
        assert_eq!(extract_data(&json!({"data": ["a"]})).unwrap(), &[json!("a")]);
        assert_eq!(extract_data(&json!({"data": []})).unwrap(), &[] as &[Value]);
        for body in [
            json!({}),
            json!({"data": null}),
            json!({"data": "a,b"}),
            json!({"data": {"0": "a"}}),
            json!([1, 2]),
            json!("data"),
        ] {
            assert_eq!(extract_data(&body), Err(ValidationError::MissingData));
        }
    }
}
