//! `/bfhl` operations
//!
//! `health` answers the GET probe. `classify` reads and decodes the body,
//! validates `data`, partitions it and inspects the optional file payload.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::Value;

use crate::bfhl::{self, file, ClassifyResponse, FileInfo, HealthResponse, SignatureDetector};
use crate::config::AppState;
use crate::error::BodyError;
use crate::http;
use crate::logger;

pub const BFHL_PATH: &str = "/bfhl";

/// Case-insensitive match allowing one trailing slash
pub fn is_bfhl_path(path: &str) -> bool {
    path.strip_suffix('/')
        .unwrap_or(path)
        .eq_ignore_ascii_case(BFHL_PATH)
}

/// `GET /bfhl` (and `HEAD`, without the body)
pub fn health(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    http::json_response(
        StatusCode::OK,
        &HealthResponse::default(),
        &state.config.http.server_name,
        is_head,
    )
}

/// `POST /bfhl`
pub async fn classify<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let server_name = &state.config.http.server_name;

    let body = match read_body(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(e) => {
            logger::log_warning(&format!("Rejected request body: {e}"));
            return http::error_response(e.status(), &e.to_string(), server_name);
        }
    };

    let data = match bfhl::extract_data(&body) {
        Ok(data) => data,
        Err(e) => {
            logger::log_debug(&format!("Validation failed: {e}"));
            return http::error_response(StatusCode::BAD_REQUEST, &e.to_string(), server_name);
        }
    };

    let classification = bfhl::classify(data);
    let file_info = inspect_file(body.get("file_b64"), state.detector.as_ref());

    http::json_response(
        StatusCode::OK,
        &ClassifyResponse::new(&state.config.identity, classification, file_info),
        server_name,
        false,
    )
}

/// Enforce the size ceiling, then decode by content type
async fn read_body<B>(req: Request<B>, max_body_size: u64) -> Result<Value, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    http::check_content_length(req.headers(), max_body_size)?;
    let kind = http::BodyKind::from_headers(req.headers());
    let bytes = http::read_limited(req.into_body(), max_body_size).await?;
    http::decode(kind, &bytes)
}

/// File facts for the response; failures degrade to the defaults
fn inspect_file(payload: Option<&Value>, detector: &dyn SignatureDetector) -> FileInfo {
    let Some(payload) = payload.filter(|p| file::is_present(Some(*p))) else {
        return FileInfo::default();
    };

    match file::inspect(payload, detector) {
        Ok(info) => info,
        Err(e) => {
            logger::log_file_processing_error(&e);
            FileInfo::default()
        }
    }
}
