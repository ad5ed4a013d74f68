//! Server configuration from environment variables.
//!
//! - `HOST` (default: 0.0.0.0)
//! - `PORT` (default: 5000)
//! - `APP_ENV`: "development" | "production" (default: production)
//! - `DATABASE_URL`: PostgreSQL URL. Without it recipes are kept in memory.
//! - `ALLOWED_ORIGINS`: comma-separated CORS origins (default: http://localhost:3000)
//! - `FRONTEND_URL`: extra allowed origin, typically the deployed front end
//! - `RATE_LIMIT_MAX_REQUESTS`: requests per client per window (default: 100, 0 disables)
//! - `RATE_LIMIT_WINDOW_SECS`: rate limit window (default: 900)
//! - `RATE_LIMIT_TRUST_PROXY`: key clients by `X-Forwarded-For`/`X-Real-IP` (default: false)
//! - `SECURITY_HEADERS`: add hardening response headers (default: true)
//!
//! Generator settings are read by [`GeneratorConfig::from_env`].

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use recetas_core::{GeneratorConfig, LlmError};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("Generator configuration: {0}")]
    Generator(#[from] LlmError),
}

/// Deployment environment. Only development exposes internal error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvVar(
                "APP_ENV".to_string(),
                format!("unknown environment {:?}", other),
            )),
        }
    }
}

/// Per-client request quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
    /// Take the client address from proxy headers before the socket peer.
    pub trust_proxy: bool,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            trust_proxy: false,
        }
    }
}

/// Settings for the HTTP middleware stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub allowed_origins: Vec<String>,
    /// `None` turns rate limiting off.
    pub rate_limit: Option<RateLimit>,
    pub security_headers: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            rate_limit: Some(RateLimit::default()),
            security_headers: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,
    pub database_url: Option<String>,
    pub http: HttpConfig,
    pub generator: GeneratorConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST")
            .unwrap_or_else(|_| DEFAULT_HOST.to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), format!("{}", e)))?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), format!("{}", e)))?,
            Err(_) => DEFAULT_PORT,
        };

        let environment = match env::var("APP_ENV") {
            Ok(raw) => raw.parse()?,
            Err(_) => Environment::default(),
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let allowed_origins = parse_origins(
            env::var("ALLOWED_ORIGINS").ok().as_deref(),
            env::var("FRONTEND_URL").ok().as_deref(),
        );

        let max_requests = parse_var("RATE_LIMIT_MAX_REQUESTS", DEFAULT_RATE_LIMIT_MAX_REQUESTS)?;
        let window_secs = parse_var("RATE_LIMIT_WINDOW_SECS", DEFAULT_RATE_LIMIT_WINDOW_SECS)?;
        if window_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RATE_LIMIT_WINDOW_SECS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        let rate_limit = (max_requests > 0).then(|| RateLimit {
            max_requests,
            window: Duration::from_secs(window_secs),
            trust_proxy: parse_flag("RATE_LIMIT_TRUST_PROXY", false),
        });

        Ok(Self {
            host,
            port,
            environment,
            database_url,
            http: HttpConfig {
                allowed_origins,
                rate_limit,
                security_headers: parse_flag("SECURITY_HEADERS", true),
            },
            generator: GeneratorConfig::from_env()?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn parse_origins(allowed: Option<&str>, frontend_url: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = allowed
        .unwrap_or(DEFAULT_ALLOWED_ORIGIN)
        .split(',')
        .chain(frontend_url)
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    origins.dedup();
    origins
}
