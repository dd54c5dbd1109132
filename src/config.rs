use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// PostgreSQL connection URL. Messages are kept in memory when unset.
    #[arg(long, env = "BOARD_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "BOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the public message API
    #[arg(long, env = "BOARD_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port for the liveness and readiness probes
    #[arg(long, env = "BOARD_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work after a shutdown signal
    #[arg(long, env = "BOARD_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Username required by the protected endpoints
    #[arg(long = "auth-username", env = "BOARD_AUTH_USERNAME", default_value = "admin")]
    pub username: String,

    /// Password required by the protected endpoints
    #[arg(long = "auth-password", env = "BOARD_AUTH_PASSWORD", default_value = "back-challenge", hide_default_value = true)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Maximum size of the connection pool
    #[arg(long = "db-max-connections", env = "BOARD_DB_MAX_CONNECTIONS", default_value_t = 20)]
    pub max_connections: u32,

    /// How many times to retry the initial database connection
    #[arg(long = "db-connect-retries", env = "BOARD_DB_CONNECT_RETRIES", default_value_t = 5)]
    pub connect_retries: usize,

    /// Minimum delay between connection attempts
    #[arg(long = "db-retry-delay-secs", env = "BOARD_DB_RETRY_DELAY_SECS", default_value_t = 3)]
    pub retry_delay_secs: u64,

    /// CSV file of messages to load at startup
    #[arg(long, env = "BOARD_SEED_CSV")]
    pub seed_csv: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the store readiness check
    #[arg(long = "health-timeout-ms", env = "BOARD_HEALTH_TIMEOUT_MS", default_value_t = 2000)]
    pub timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "BOARD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint for traces and metrics
    #[arg(long, env = "BOARD_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
