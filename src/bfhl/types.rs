// Wire types for the /bfhl endpoint

use serde::Serialize;
use serde_json::Value;

use super::classify::Classification;
use super::coerce;
use super::file::FileInfo;
use crate::config::IdentityConfig;

pub const OPERATION_CODE: &str = "GET_200_SUCCESS";

/// Body of `GET /bfhl`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub operation_code: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            operation_code: OPERATION_CODE,
        }
    }
}

/// Body of a successful `POST /bfhl`
#[derive(Debug, Serialize)]
pub struct ClassifyResponse<'a> {
    pub is_success: bool,
    pub user_id: &'a str,
    pub college_email: &'a str,
    pub college_roll_number: &'a str,
    pub numbers: Vec<Value>,
    pub alphabets: Vec<Value>,
    pub highest_lowercase: Vec<Value>,
    pub prime_found: bool,
    pub file_info: FileInfo,
}

impl<'a> ClassifyResponse<'a> {
    pub fn new(
        identity: &'a IdentityConfig,
        classification: Classification,
        file_info: FileInfo,
    ) -> Self {
        Self {
            is_success: true,
            user_id: &identity.user_id,
            college_email: &identity.college_email,
            college_roll_number: &identity.college_roll_number,
            numbers: classification.numbers.into_iter().map(coerce::js_layout).collect(),
            alphabets: classification.alphabets.into_iter().map(coerce::js_layout).collect(),
            highest_lowercase: classification
                .highest_lowercase
                .into_iter()
                .map(coerce::js_layout)
                .collect(),
            prime_found: classification.prime_found,
            file_info,
        }
    }
}

/// Body of any failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub is_success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
        }
    }
}
