// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Interval between checks of the active connection count while draining
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified.
///
/// Accept errors are logged and the loop keeps going. The listener is dropped
/// on return, so no new connections are queued afterwards.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = shutdown.notified() => break,
        }
    }
}

/// Wait for in-flight connections to finish, up to `grace`.
///
/// Returns the number of connections still open when the wait ended.
pub async fn wait_for_drain(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{test_config, Config};
    use crate::server::create_reusable_listener;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn spawn_server(config: Config) -> (std::net::SocketAddr, Arc<Notify>, Arc<AtomicUsize>) {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config));
        let shutdown = Arc::new(Notify::new());
        let active = Arc::new(AtomicUsize::new(0));

        tokio::spawn(start_server_loop(
            listener,
            state,
            Arc::clone(&active),
            Arc::clone(&shutdown),
        ));
        (addr, shutdown, active)
    }

    async fn wait_for_count(active: &AtomicUsize, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while active.load(Ordering::SeqCst) != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    async fn send(
        addr: std::net::SocketAddr,
        req: Request<Full<Bytes>>,
    ) -> (StatusCode, Value) {
        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let resp = sender.send_request(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_end_to_end_over_loopback() {
        let (addr, shutdown, active) = spawn_server(test_config());

        let get = Request::builder()
            .method("GET")
            .uri("/bfhl")
            .header("Host", addr.to_string())
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, body) = send(addr, get).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["operation_code"], "GET_200_SUCCESS");

        let post = Request::builder()
            .method("POST")
            .uri("/bfhl")
            .header("Host", addr.to_string())
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from_static(br#"{"data":["M","1","334","4","B","c"]}"#)))
            .unwrap();
        let (status, body) = send(addr, post).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numbers"], serde_json::json!(["1", "334", "4"]));
        assert_eq!(body["alphabets"], serde_json::json!(["M", "B", "c"]));
        assert_eq!(body["highest_lowercase"], serde_json::json!(["c"]));
        assert_eq!(body["prime_found"], serde_json::json!(false));

        shutdown.notify_one();
        assert_eq!(wait_for_drain(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_connections_over_limit_are_dropped() {
        let mut config = test_config();
        config.performance.max_connections = Some(1);
        let (addr, shutdown, active) = spawn_server(config);

        let _held = tokio::net::TcpStream::connect(addr).await.unwrap();
        wait_for_count(&active, 1).await;

        let mut rejected = tokio::net::TcpStream::connect(addr).await.unwrap();
        let mut buf = [0u8; 16];
        let read = tokio::time::timeout(Duration::from_secs(5), rejected.read(&mut buf))
            .await
            .unwrap();
        assert!(matches!(read, Ok(0) | Err(_)));
        assert_eq!(active.load(Ordering::SeqCst), 1);

        shutdown.notify_one();
    }

    #[tokio::test]
    async fn test_stalled_headers_hit_keep_alive_timeout() {
        let mut config = test_config();
        config.performance.keep_alive_timeout = 1;
        config.performance.read_timeout = 30;
        config.performance.write_timeout = 30;
        let (addr, shutdown, active) = spawn_server(config);

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /bfhl HTTP/1.1\r\nHost: x\r\n").await.unwrap();

        // Closed well before the 30 second connection cap
        let mut buf = Vec::new();
        let closed = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf)).await;
        assert!(closed.is_ok());
        wait_for_count(&active, 0).await;

        shutdown.notify_one();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let active = AtomicUsize::new(2);
        assert_eq!(wait_for_drain(&active, Duration::from_millis(10)).await, 2);
    }
}
