use studio_core::portal::{validate_ttl_hours, DEFAULT_TTL_HOURS};

/// A configuration variable that is set but cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{key} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
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
    /// How long to wait for background services after the server stops.
    pub shutdown_timeout_secs: u64,
    /// Lifetime of client-portal tokens issued without an explicit `ttlHours`.
    pub portal_token_ttl_hours: i64,
    /// PostgreSQL connection string. In-memory stores are used when unset.
    pub database_url: Option<String>,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                    |
    /// | `PORTAL_TOKEN_TTL_HOURS` | `168`                   |
    /// | `DATABASE_URL`           | unset                   |
    /// | `LOG_FORMAT`             | `text` (or `json`)      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000, "a valid port number")?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30, "a number of seconds")?;
        let shutdown_timeout_secs: u64 =
            parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30, "a number of seconds")?;

        let portal_token_ttl_hours: i64 = parse_or(
            &lookup,
            "PORTAL_TOKEN_TTL_HOURS",
            DEFAULT_TTL_HOURS,
            "a positive number of hours",
        )?;
        validate_ttl_hours(portal_token_ttl_hours).map_err(|_| ConfigError {
            key: "PORTAL_TOKEN_TTL_HOURS",
            value: portal_token_ttl_hours.to_string(),
            expected: "a positive number of hours within the maximum token lifetime",
        })?;

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let log_json = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                    expected: "'text' or 'json'",
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            portal_token_ttl_hours,
            database_url,
            log_json,
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
            key,
            value: raw,
            expected,
        }),
    }
}
