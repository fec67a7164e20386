//! Inspection of the optional Base64 file payload

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use super::coerce;
use super::detect::SignatureDetector;
use crate::error::FileProcessingError;

/// File facts reported in the response
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub file_valid: bool,
    pub file_mime_type: Option<String>,
    /// Written without a fraction when whole, so an absent file reports `0`
    #[serde(serialize_with = "serialize_size")]
    pub file_size_kb: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_size<S: Serializer>(size: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match Number::from_f64(*size) {
        Some(n) => coerce::js_number(n).serialize(serializer),
        None => serializer.serialize_f64(*size),
    }
}

impl Default for FileInfo {
    fn default() -> Self {
        Self {
            file_valid: false,
            file_mime_type: None,
            file_size_kb: 0.0,
        }
    }
}

/// JS truthiness of the `file_b64` field; falsy payloads skip inspection
pub fn is_present(payload: Option<&Value>) -> bool {
    match payload {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Decode `input`, accepting it only if re-encoding reproduces it with CR/LF removed
pub fn decode_round_trip(input: &str) -> Result<Vec<u8>, FileProcessingError> {
    let stripped: String = input.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    let bytes = BASE64
        .decode(stripped.as_bytes())
        .map_err(|_| FileProcessingError::InvalidBase64)?;
    if BASE64.encode(&bytes) != stripped {
        return Err(FileProcessingError::InvalidBase64);
    }
    Ok(bytes)
}

/// `len / 1024` rounded half-up to two decimals
#[allow(clippy::cast_precision_loss)]
pub fn size_kb(len: usize) -> f64 {
    let len = u64::try_from(len).unwrap_or(u64::MAX);
    let hundredths = len.saturating_mul(100).saturating_add(512) / 1024;
    hundredths as f64 / 100.0
}

/// Validate, decode and sniff a present `file_b64` payload
pub fn inspect(
    payload: &Value,
    detector: &dyn SignatureDetector,
) -> Result<FileInfo, FileProcessingError> {
    let Value::String(encoded) = payload else {
        return Err(FileProcessingError::NotAString);
    };

    let bytes = decode_round_trip(encoded)?;
    let file_mime_type = detector.detect(&bytes).into_iter().next();

    Ok(FileInfo {
        file_valid: file_mime_type.is_some(),
        file_mime_type,
        file_size_kb: size_kb(bytes.len()),
    })
}
