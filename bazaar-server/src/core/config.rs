//! Server configuration
//!
//! # Environment variables
//!
//! All configuration can be overridden through the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/bazaar/server | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | COMMISSION_RATE | 0.05 | Platform commission on payouts, in [0, 1] |
//! | STARTING_BALANCE | 0 | Default opening wallet balance for new accounts |
//! | REQUEST_TIMEOUT_MS | 30000 | Request timeout (milliseconds) |
//! | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown timeout (milliseconds) |
//!
//! # Example
//!
//! ```ignore
//! WORK_DIR=/data/bazaar HTTP_PORT=8080 COMMISSION_RATE=0.1 cargo run
//! ```

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Platform commission rate applied at payout, in [0, 1]
    pub commission_rate: f64,
    /// Default opening wallet balance for newly created accounts
    pub starting_balance: f64,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Graceful shutdown timeout (milliseconds)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        let commission_rate: f64 = std::env::var("COMMISSION_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.05);
        let commission_rate = if (0.0..=1.0).contains(&commission_rate) {
            commission_rate
        } else {
            tracing::warn!(
                commission_rate,
                "COMMISSION_RATE outside [0, 1], falling back to 0.05"
            );
            0.05
        };

        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/bazaar/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            commission_rate,
            starting_balance: std::env::var("STARTING_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override the filesystem/network knobs, commonly used in tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }
}
