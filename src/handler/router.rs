//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method/path dispatch and access logging.

use crate::config::AppState;
use crate::handler::bfhl;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, ACCESS_CONTROL_REQUEST_HEADERS, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, remote_addr));

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.complete(
            response.status().as_u16(),
            usize::try_from(body_bytes).unwrap_or(usize::MAX),
            started,
        );
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let server_name = &state.config.http.server_name;

    // CORS preflight is answered for every path
    if req.method() == Method::OPTIONS {
        let requested = req
            .headers()
            .get(ACCESS_CONTROL_REQUEST_HEADERS)
            .and_then(|v| v.to_str().ok());
        return http::build_options_response(requested);
    }

    if !bfhl::is_bfhl_path(req.uri().path()) {
        return http::build_404_response(req.method().as_str(), req.uri().path(), server_name);
    }

    let method = req.method().clone();
    match method {
        Method::GET => bfhl::health(state, false),
        Method::HEAD => bfhl::health(state, true),
        Method::POST => bfhl::classify(req, state).await,
        _ => {
            logger::log_debug(&format!("No route for {method} {}", req.uri().path()));
            http::build_404_response(method.as_str(), req.uri().path(), server_name)
        }
    }
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use http_body_util::{BodyExt, Empty};
    use hyper::StatusCode;

    fn remote() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn request(method: &str, path: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header("Access-Control-Request-Headers", "content-type")
            .body(Empty::new())
            .unwrap()
    }

    async fn send(method: &str, path: &str) -> Response<Full<Bytes>> {
        let state = Arc::new(AppState::new(test_config()));
        handle_request(request(method, path), state, remote())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_health() {
        let resp = send("GET", "/bfhl").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["operation_code"], "GET_200_SUCCESS");
    }

    #[tokio::test]
    async fn test_head_health_has_no_body() {
        let resp = send("HEAD", "/bfhl").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_preflight() {
        let resp = send("OPTIONS", "/bfhl").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-headers"], "content-type");
    }

    #[tokio::test]
    async fn test_unknown_routes_are_404() {
        assert_eq!(send("GET", "/").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send("GET", "/bfhl/extra").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send("DELETE", "/bfhl").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_without_content_type_fails_validation() {
        let resp = send("POST", "/bfhl").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method("POST")
            .uri("/bfhl?x=1")
            .header("User-Agent", "test-agent")
            .header("Referer", "https://example.edu/form")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let entry = access_entry(&req, remote());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.path, "/bfhl");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(entry.referer.as_deref(), Some("https://example.edu/form"));

        let bare = access_entry(&request("GET", "/bfhl"), remote());
        assert!(bare.referer.is_none());
    }
}
