//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::Local;
use std::time::Instant;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Record response facts once the handler has finished
    pub fn complete(&mut self, status: u16, body_bytes: usize, started: Instant) {
        self.status = status;
        self.body_bytes = body_bytes;
        self.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, 3 decimals), `$status`, `$body_bytes_sent`, `$http_referer`,
    /// `$http_user_agent`. The pattern is scanned once, so `$` inside
    /// substituted values (a query string, say) is written as is.
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];
            match self.expand_variable(rest) {
                Some((name_len, value)) => {
                    out.push_str(&value);
                    rest = &rest[name_len..];
                }
                None => {
                    out.push('$');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Value of the variable `text` starts with, and the length of its name
    fn expand_variable(&self, text: &str) -> Option<(usize, String)> {
        // Longer names first so `$request` does not shadow `$request_time`
        const NAMES: [&str; 11] = [
            "$remote_addr",
            "$time_local",
            "$time_iso8601",
            "$request_time",
            "$request_method",
            "$request_uri",
            "$request",
            "$status",
            "$body_bytes_sent",
            "$http_referer",
            "$http_user_agent",
        ];

        let name = NAMES.iter().find(|name| text.starts_with(*name))?;
        let value = match *name {
            "$remote_addr" => self.remote_addr.clone(),
            "$time_local" => self.time.format(CLF_TIME).to_string(),
            "$time_iso8601" => self.time.to_rfc3339(),
            "$request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            "$request_method" => self.method.clone(),
            "$request_uri" => self.request_uri(),
            "$request" => format!(
                "{} {} HTTP/{}",
                self.method,
                self.request_uri(),
                self.http_version
            ),
            "$status" => self.status.to_string(),
            "$body_bytes_sent" => self.body_bytes.to_string(),
            "$http_referer" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            _ => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
        };
        Some((name.len(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "POST".to_string(),
            "/bfhl".to_string(),
        );
        entry.query = Some("debug=1".to_string());
        entry.status = 200;
        entry.body_bytes = 321;
        entry.referer = Some("https://example.edu/form".to_string());
        entry.user_agent = Some("curl/8.5".to_string());
        entry.request_time_us = 1_250_000;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("\"POST /bfhl?debug=1 HTTP/1.1\""));
        assert!(log.contains("200 321"));
        assert!(log.ends_with("\"https://example.edu/form\" \"curl/8.5\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("POST /bfhl?debug=1 HTTP/1.1"));
        assert!(log.ends_with("200 321"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_json_is_parseable() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 321);
        assert_eq!(value["query"], "debug=1");
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$request_method $request_uri -> $status in $request_time");
        assert_eq!(log, "POST /bfhl?debug=1 -> 200 in 1.250");
    }

    #[test]
    fn test_format_custom_leaves_client_dollars_alone() {
        let mut entry = create_test_entry();
        entry.query = Some("x=$status".to_string());
        entry.user_agent = Some("$remote_addr".to_string());
        let log = entry.format("$request_uri $status $http_user_agent $unknown $");
        assert_eq!(log, "/bfhl?x=$status 200 $remote_addr $unknown $");
    }

    #[test]
    fn test_format_custom_referer() {
        let log = create_test_entry().format("$http_referer");
        assert_eq!(log, "https://example.edu/form");
    }

    #[test]
    fn test_complete_records_status() {
        let mut entry = create_test_entry();
        entry.complete(400, 12, Instant::now());
        assert_eq!(entry.status, 400);
        assert_eq!(entry.body_bytes, 12);
    }
}
