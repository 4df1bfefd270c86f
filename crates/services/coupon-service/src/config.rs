//! Coupon service configuration.

use std::env;

use common::{DatabaseConfig, JwtConfig, ServiceConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Coupon service configuration.
#[derive(Debug, Clone)]
pub struct CouponServiceConfig {
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl CouponServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: lookup("COUPON_SERVICE_DATABASE_URL")
                .or_else(|| lookup("DATABASE_URL"))
                .unwrap_or(defaults.url),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", &lookup, defaults.max_connections)?,
            min_connections: parse_or("DATABASE_MIN_CONNECTIONS", &lookup, defaults.min_connections)?,
        };

        let secret =
            lookup("JWT_SECRET").ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        let mut jwt = JwtConfig::new(secret);
        if !jwt.has_strong_secret() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            ));
        }
        jwt.expiration_hours = parse_or("JWT_EXPIRATION_HOURS", &lookup, jwt.expiration_hours)?;
        if jwt.expiration_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_EXPIRATION_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }

        let server_defaults = ServiceConfig::default();
        let server = ServiceConfig {
            host: lookup("SERVER_HOST").unwrap_or(server_defaults.host),
            port: parse_or("SERVER_PORT", &lookup, server_defaults.port)?,
            log_level: lookup("RUST_LOG").unwrap_or(server_defaults.log_level),
            service_name: server_defaults.service_name,
        };

        Ok(Self {
            server,
            database,
            jwt,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
