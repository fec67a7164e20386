// Configuration module entry point
// Layered configuration: defaults, optional file, environment

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, IdentityConfig};

/// Default configuration file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// 20 MB, for both JSON and URL-encoded bodies
pub const DEFAULT_MAX_BODY_SIZE: u64 = 20 * 1024 * 1024;

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, lowest first: built-in defaults, the file, `BFHL_*`
    /// environment variables (`__` separates sections, e.g.
    /// `BFHL_SERVER__HOST`), then a bare `PORT` variable.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "bfhl-server")?
            .set_default("http.max_body_size", DEFAULT_MAX_BODY_SIZE)?
            .set_default("identity.user_id", "Aryan_Yadav_05122003")?
            .set_default("identity.college_email", "aryanyadav210034@acropolis.in")?
            .set_default("identity.college_roll_number", "0827IT211019")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BFHL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    use types::{HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "error".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 0,
            read_timeout: 5,
            write_timeout: 5,
            max_connections: None,
        },
        http: HttpConfig {
            server_name: "bfhl-test".to_string(),
            max_body_size: 1024,
        },
        identity: IdentityConfig {
            user_id: "jane_doe_01012000".to_string(),
            college_email: "jane@example.edu".to_string(),
            college_roll_number: "ROLL123".to_string(),
        },
    }
}
