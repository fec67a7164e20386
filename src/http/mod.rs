//! HTTP protocol layer module
//!
//! Body reading/decoding and response building, kept apart from the
//! classification logic.

pub mod body;
pub mod response;

// Re-export commonly used types
pub use body::{check_content_length, decode, read_limited, BodyKind};
pub use response::{
    build_404_response, build_options_response, error_response, json_response,
};
