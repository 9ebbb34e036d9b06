//! API Configuration Module
//!
//! Server binding, CORS, request limits and the conflict engine settings.
//! Configuration is loaded from environment variables with sensible defaults
//! for development.

use std::net::SocketAddr;
use std::time::Duration;

use prism_core::{EngineConfig, FailurePolicy};

use crate::error::{ApiError, ApiResult};

/// Default request body limit (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for binding, CORS and request limits.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Binding
    // ========================================================================
    /// Interface to bind to.
    pub bind_host: String,

    /// Port to listen on.
    pub port: u16,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Request Limits
    // ========================================================================
    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            request_timeout: Duration::from_secs(10),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PRISM_API_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` or `PRISM_API_PORT`: Listen port (default: 3000)
    /// - `PRISM_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `PRISM_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `PRISM_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `PRISM_REQUEST_TIMEOUT_SECS`: Request timeout (default: 10)
    /// - `PRISM_MAX_BODY_BYTES`: Request body limit (default: 1 MiB)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port_str = lookup("PORT").or_else(|| lookup("PRISM_API_PORT"));
        let port = match port_str {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", value)))?,
            None => defaults.port,
        };

        let cors_origins = lookup("PRISM_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("PRISM_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let request_timeout_secs: u64 =
            parse_or(&lookup, "PRISM_REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())?;
        if request_timeout_secs == 0 {
            return Err(ApiError::invalid_input(
                "PRISM_REQUEST_TIMEOUT_SECS must be positive",
            ));
        }

        let max_body_bytes: usize =
            parse_or(&lookup, "PRISM_MAX_BODY_BYTES", defaults.max_body_bytes)?;
        if max_body_bytes == 0 {
            return Err(ApiError::invalid_input("PRISM_MAX_BODY_BYTES must be positive"));
        }

        Ok(Self {
            bind_host: lookup("PRISM_API_BIND").unwrap_or(defaults.bind_host),
            port,
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs: parse_or(
                &lookup,
                "PRISM_CORS_MAX_AGE_SECS",
                defaults.cors_max_age_secs,
            )?,
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_body_bytes,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.dev
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

// ============================================================================
// ENGINE CONFIGURATION
// ============================================================================

/// Build the conflict engine configuration from environment variables.
///
/// - `PRISM_FAILURE_POLICY`: `open` (default) or `closed`
/// - `PRISM_DISABLED_RULES`: comma-separated rule ids
/// - `PRISM_MAX_FILES`: largest accepted `modifiedFiles` length
pub fn engine_config_from_env() -> ApiResult<EngineConfig> {
    engine_config_from_lookup(|key| std::env::var(key).ok())
}

pub fn engine_config_from_lookup<F>(lookup: F) -> ApiResult<EngineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = EngineConfig::default();

    if let Some(policy) = lookup("PRISM_FAILURE_POLICY") {
        let policy: FailurePolicy = policy.parse().map_err(ApiError::invalid_input)?;
        config = config.with_failure_policy(policy);
    }

    if let Some(rules) = lookup("PRISM_DISABLED_RULES") {
        config = config.with_disabled_rules(
            rules
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty()),
        );
    }

    let max_files = parse_or(&lookup, "PRISM_MAX_FILES", config.max_files)?;
    config = config.with_max_files(max_files);

    config.validate()?;
    Ok(config)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> ApiResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ApiError::invalid_input(format!("Invalid value for {}: {}", key, value))),
        None => Ok(default),
    }
}
