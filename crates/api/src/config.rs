use std::path::PathBuf;
use std::time::Duration;

/// Error type for invalid server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the `euribor-rates-<maturity>.csv` files.
    pub history_path: PathBuf,
    /// Seconds between rate source staleness checks (default: `60`).
    pub refresh_poll_secs: u64,
    /// PostgreSQL URL for the threshold store. Thresholds are kept in
    /// memory when unset.
    pub database_url: Option<String>,
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
    /// | `HISTORY_PATH`         | `.`                        |
    /// | `REFRESH_POLL_SECS`    | `60`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = parse_var(&var, "PORT", "3000", "a valid port number")?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse_var(&var, "REQUEST_TIMEOUT_SECS", "30", "a whole number of seconds")?;

        let history_path = PathBuf::from(var("HISTORY_PATH").unwrap_or_else(|| ".".into()));

        let refresh_poll_secs: u64 =
            parse_var(&var, "REFRESH_POLL_SECS", "60", "a positive number of seconds")?;
        if refresh_poll_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "REFRESH_POLL_SECS",
                expected: "a positive number of seconds",
                value: "0".into(),
            });
        }

        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            history_path,
            refresh_poll_secs,
            database_url,
        })
    }

    pub fn refresh_poll_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_poll_secs)
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = var(name).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}
