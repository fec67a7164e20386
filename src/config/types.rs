// Configuration sections
// Every field has a built-in default set in `Config::load_from`

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub identity: IdentityConfig,
}

/// Bind address and runtime sizing
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// Also settable through a bare `PORT` variable
    pub port: u16,
    /// Tokio worker threads; CPU count when unset
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: debug, info, warn or error
    pub level: String,
    /// One line per request through the access target
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a `$variable` pattern
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Info and access lines; stdout when unset
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Warnings and errors; stderr when unset
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Connection limits and timeouts, in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Longest wait for a request's headers, idle keep-alive gaps included;
    /// zero disables HTTP keep-alive
    pub keep_alive_timeout: u64,
    /// The larger of these two caps a whole connection
    pub read_timeout: u64,
    pub write_timeout: u64,
    /// Connections beyond this are dropped right after accept
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// `Server` response header
    pub server_name: String,
    /// Ceiling for JSON and URL-encoded request bodies, in bytes
    pub max_body_size: u64,
}

/// Fixed identity echoed in every classify response
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user_id: String,
    pub college_email: String,
    pub college_roll_number: String,
}
