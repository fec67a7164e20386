//! Request handler module
//!
//! Responsible for request routing dispatch and the `/bfhl` operations.

pub mod bfhl;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
