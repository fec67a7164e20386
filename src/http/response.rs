//! HTTP response building module
//!
//! JSON responses with the open CORS policy applied to every reply.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::bfhl::ErrorResponse;

/// Methods advertised to CORS preflight requests
pub const CORS_ALLOW_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Build JSON response
///
/// With `is_head` the body is dropped but `Content-Length` still reports its size.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            log_build_error("JSON", &e.to_string());
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json; charset=utf-8")
                .header("Access-Control-Allow-Origin", "*")
                .body(Full::new(Bytes::from_static(
                    br#"{"is_success":false,"message":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    let content_length = json.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(json) };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Access-Control-Allow-Origin", "*")
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e.to_string());
            Response::new(Full::new(Bytes::new()))
        })
}

/// `{ "is_success": false, "message": ... }` with the given status
pub fn error_response(
    status: StatusCode,
    message: &str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    json_response(status, &ErrorResponse::new(message), server_name, false)
}

/// Build 404 Not Found response in the style of `Cannot GET /path`
pub fn build_404_response(method: &str, path: &str, server_name: &str) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("Cannot {method} {path}"),
        server_name,
    )
}

/// Build CORS preflight response
///
/// Requested headers are reflected back, so any header the client asks for is allowed.
pub fn build_options_response(requested_headers: Option<&str>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", CORS_ALLOW_METHODS)
        .header("Content-Length", 0);

    if let Some(headers) = requested_headers {
        builder = builder
            .header("Access-Control-Allow-Headers", headers)
            .header("Vary", "Access-Control-Request-Headers");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e.to_string());
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &str) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_json_response_headers() {
        let resp = json_response(StatusCode::OK, &serde_json::json!({"ok": true}), "srv", false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["server"], "srv");
        assert_eq!(resp.headers()["content-length"], "11");
        assert_eq!(body_json(resp).await, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = json_response(StatusCode::OK, &serde_json::json!({"ok": true}), "srv", true);
        assert_eq!(resp.headers()["content-length"], "11");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_404_message() {
        let resp = build_404_response("PUT", "/bfhl", "srv");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"is_success": false, "message": "Cannot PUT /bfhl"})
        );
    }

    #[test]
    fn test_options_reflects_requested_headers() {
        let resp = build_options_response(Some("content-type,x-trace"));
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-methods"], CORS_ALLOW_METHODS);
        assert_eq!(
            resp.headers()["access-control-allow-headers"],
            "content-type,x-trace"
        );
        assert_eq!(resp.headers()["vary"], "Access-Control-Request-Headers");

        let bare = build_options_response(None);
        assert!(bare.headers().get("access-control-allow-headers").is_none());
    }
}
