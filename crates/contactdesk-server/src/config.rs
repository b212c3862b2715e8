//! Service Configuration
//!
//! Settings are read from environment variables (optionally seeded from a
//! `.env` file). Parsing goes through a lookup function so tests can supply
//! their own map instead of touching the process environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_UPLOAD_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_MINUTES: u64 = 5;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
const DEFAULT_GLOBAL_PER_MINUTE: u32 = 1000;
const DEFAULT_CONTACT_PER_MINUTE: u32 = 10;
const DEFAULT_MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

/// Settings shared by both services
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// `None` runs the service against the in-memory store
    pub database: Option<DatabaseSettings>,
    /// `None` disables bearer authentication
    pub jwt: Option<JwtSettings>,
    /// `None` allows any origin
    pub cors_allowed_origins: Option<Vec<String>>,
    pub rate_limits: RateLimitSettings,
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JwtSettings {
    pub issuer: String,
    pub audience: String,
    pub security_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitSettings {
    /// Requests per minute per client on administrative routes
    pub global_per_minute: u32,
    /// Submissions per minute per client on `POST /v1/contacts`
    pub contact_per_minute: u32,
}

/// Upload service client settings (contact service only)
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSettings {
    pub base_url: String,
    pub timeout: Duration,
}

/// Contact cache settings (contact service only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = get(&lookup, "BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let database = match get(&lookup, "DATABASE_URL") {
            Some(url) => Some(DatabaseSettings {
                url,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
            None => None,
        };

        let jwt = match (
            get(&lookup, "JWT_ISSUER"),
            get(&lookup, "JWT_AUDIENCE"),
            get(&lookup, "JWT_SECURITY_KEY"),
        ) {
            (Some(issuer), Some(audience), Some(security_key)) => Some(JwtSettings {
                issuer,
                audience,
                security_key,
            }),
            (None, None, None) => None,
            _ => bail!("JWT_ISSUER, JWT_AUDIENCE and JWT_SECURITY_KEY must be set together"),
        };

        let cors_allowed_origins = get(&lookup, "CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let rate_limits = RateLimitSettings {
            global_per_minute: parse_or(
                &lookup,
                "RATE_LIMIT_GLOBAL_PER_MINUTE",
                DEFAULT_GLOBAL_PER_MINUTE,
            )?,
            contact_per_minute: parse_or(
                &lookup,
                "RATE_LIMIT_CONTACT_PER_MINUTE",
                DEFAULT_CONTACT_PER_MINUTE,
            )?,
        };

        Ok(Self {
            bind_addr,
            database,
            jwt,
            cors_allowed_origins,
            rate_limits,
            max_request_bytes: parse_or(&lookup, "MAX_REQUEST_BYTES", DEFAULT_MAX_REQUEST_BYTES)?,
        })
    }
}

impl UploadSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let development = get(&lookup, "APP_ENV")
            .is_some_and(|env| env.eq_ignore_ascii_case("development"));

        let base_url = match get(&lookup, "UPLOAD_SERVICE_BASE_URL") {
            Some(url) => url,
            None if development => DEFAULT_UPLOAD_BASE_URL.to_string(),
            None => bail!("UPLOAD_SERVICE_BASE_URL is required outside development"),
        };

        let timeout_secs = parse_or(
            &lookup,
            "UPLOAD_SERVICE_TIMEOUT_SECS",
            DEFAULT_UPLOAD_TIMEOUT_SECS,
        )?;
        if !(1..=300).contains(&timeout_secs) {
            bail!(
                "UPLOAD_SERVICE_TIMEOUT_SECS must be between 1 and 300, got {}",
                timeout_secs
            );
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl CacheSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ttl_minutes: u64 = parse_or(&lookup, "CACHE_TTL_MINUTES", DEFAULT_CACHE_TTL_MINUTES)?;
        let max_entries = parse_or(&lookup, "CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?;
        if max_entries == 0 {
            bail!("CACHE_MAX_ENTRIES must be at least 1");
        }

        Ok(Self {
            ttl: Duration::from_secs(ttl_minutes * 60),
            max_entries,
        })
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_MINUTES * 60),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Blank values count as unset
fn get(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
