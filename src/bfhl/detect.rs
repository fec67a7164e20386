//! Magic-byte MIME detection
//!
//! Detection is a capability behind [`SignatureDetector`] so the file
//! inspection logic does not depend on a particular signature table.

/// Given raw bytes, return candidate MIME types, best match first
pub trait SignatureDetector: Send + Sync {
    fn detect(&self, bytes: &[u8]) -> Vec<String>;
}

/// Signature matching backed by the `infer` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct InferDetector;

impl SignatureDetector for InferDetector {
    fn detect(&self, bytes: &[u8]) -> Vec<String> {
        infer::get(bytes)
            .map(|kind| vec![kind.mime_type().to_string()])
            .unwrap_or_default()
    }
}
