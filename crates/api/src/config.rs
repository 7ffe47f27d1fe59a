use watchparty_core::watch_party::{
    DEFAULT_SESSION_TTL_HOURS, DEFAULT_STATUS_EVENT_LIMIT, DEFAULT_STATUS_MESSAGE_LIMIT,
    DEFAULT_SWEEP_INTERVAL_SECS,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background jobs after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Origin the share URLs point at (default: `http://localhost:5173`).
    pub public_base_url: String,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Watch party tuning.
    pub watch_party: WatchPartyConfig,
}

/// Watch party lifetime and snapshot window settings.
#[derive(Debug, Clone)]
pub struct WatchPartyConfig {
    /// Session lifetime in hours; `0` disables expiry.
    pub ttl_hours: i64,
    /// Interval between expired-session sweeps; `0` disables the sweep.
    pub sweep_interval_secs: u64,
    /// Recent events included in each status snapshot.
    pub status_event_limit: i64,
    /// Recent messages included in each status snapshot.
    pub status_message_limit: i64,
}

impl Default for WatchPartyConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            status_event_limit: DEFAULT_STATUS_EVENT_LIMIT,
            status_message_limit: DEFAULT_STATUS_MESSAGE_LIMIT,
        }
    }
}

impl WatchPartyConfig {
    /// | Env Var                            | Default |
    /// |------------------------------------|---------|
    /// | `WATCH_PARTY_TTL_HOURS`            | `24`    |
    /// | `WATCH_PARTY_SWEEP_INTERVAL_SECS`  | `300`   |
    /// | `WATCH_PARTY_STATUS_EVENT_LIMIT`   | `50`    |
    /// | `WATCH_PARTY_STATUS_MESSAGE_LIMIT` | `20`    |
    pub fn from_env() -> Self {
        let ttl_hours: i64 = std::env::var("WATCH_PARTY_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_HOURS.to_string())
            .parse()
            .expect("WATCH_PARTY_TTL_HOURS must be a valid i64");

        let sweep_interval_secs: u64 = std::env::var("WATCH_PARTY_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("WATCH_PARTY_SWEEP_INTERVAL_SECS must be a valid u64");

        let status_event_limit: i64 = std::env::var("WATCH_PARTY_STATUS_EVENT_LIMIT")
            .unwrap_or_else(|_| DEFAULT_STATUS_EVENT_LIMIT.to_string())
            .parse()
            .expect("WATCH_PARTY_STATUS_EVENT_LIMIT must be a valid i64");
        assert!(
            status_event_limit > 0,
            "WATCH_PARTY_STATUS_EVENT_LIMIT must be positive"
        );

        let status_message_limit: i64 = std::env::var("WATCH_PARTY_STATUS_MESSAGE_LIMIT")
            .unwrap_or_else(|_| DEFAULT_STATUS_MESSAGE_LIMIT.to_string())
            .parse()
            .expect("WATCH_PARTY_STATUS_MESSAGE_LIMIT must be a valid i64");
        assert!(
            status_message_limit > 0,
            "WATCH_PARTY_STATUS_MESSAGE_LIMIT must be positive"
        );

        Self {
            ttl_hours,
            sweep_interval_secs,
            status_event_limit,
            status_message_limit,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:5173`    |
    ///
    /// JWT and watch party settings are read by [`JwtConfig::from_env`] and
    /// [`WatchPartyConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:5173".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            public_base_url,
            jwt: JwtConfig::from_env(),
            watch_party: WatchPartyConfig::from_env(),
        }
    }
}
