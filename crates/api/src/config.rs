//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the booking API
//! server. Values come from environment variables (a `.env` file is loaded by
//! the binary first), with defaults that match the legacy shop backend.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: Host address to bind to (default: "0.0.0.0")
//! - `API_PORT` / `PORT`: Port to listen on (default: 3001)
//! - `DATABASE_URL`: PostgreSQL connection string; when unset slots live in memory
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated allowed origins; unset allows any origin
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SHOP_NAME`: Name shown by the root endpoint (default: "MO STYLES")
//! - `SHOP_TIMEZONE`: IANA zone used to decide what "today" is (default: "UTC")
//! - `ADMIN_PASSWORD`: Admin password (default: "admin")
//! - `ADMIN_PASSWORD_HASH`: Argon2 PHC hash; overrides `ADMIN_PASSWORD`
//! - `ADMIN_SESSION_TTL_MINUTES`: Lifetime of admin sessions (default: 480)
//! - `ADMIN_REQUIRE_SESSION`: Require a bearer session for toggling (default: false)
//! - `WEBHOOK_URL`: Booking notification sink; unset skips notifications
//! - `WEBHOOK_TIMEOUT_SECONDS`: Per-attempt timeout (default: 5)
//! - `WEBHOOK_MAX_RETRIES`: Retries after a failed attempt (default: 2)
//! - `WEBHOOK_RETRY_BACKOFF_MS`: Base delay between retries (default: 500)
//! - `WEBHOOK_QUEUE_CAPACITY`: Pending notification limit (default: 64)

use std::{env, str::FromStr, time::Duration};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

/// Settings for the booking notification worker.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub queue_capacity: usize,
}

/// Admin credential and session settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Plain password, hashed at startup. Ignored when `password_hash` is set.
    pub password: String,
    pub password_hash: Option<String>,
    pub session_ttl_minutes: i64,
    pub require_session: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: "admin".to_string(),
            password_hash: None,
            session_ttl_minutes: 480,
            require_session: false,
        }
    }
}

/// Configuration for the booking API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use barberbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL connection string; `None` keeps slots in memory
    pub database_url: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins; `None` allows any origin
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub shop_name: String,

    /// Zone whose calendar date starts the slot window
    pub shop_timezone: Tz,

    pub admin: AdminConfig,

    /// Notification sink, if configured
    pub webhook: Option<WebhookConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_url: None,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            shop_name: "MO STYLES".to_string(),
            shop_timezone: Tz::UTC,
            admin: AdminConfig::default(),
            webhook: None,
        }
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The port cannot be parsed as a u16
    /// - `SHOP_TIMEZONE` is not a known IANA zone
    /// - A boolean or numeric setting cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // Network settings
        let host = var("API_HOST").unwrap_or(defaults.host);
        let port = match var("API_PORT").or_else(|| var("PORT")) {
            Some(port) => port.trim().parse::<u16>().wrap_err("Invalid API_PORT value")?,
            None => defaults.port,
        };

        // Storage settings
        let database_url = var("DATABASE_URL");

        // Logging settings
        let log_level = match var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = parse_or(&var, "API_REQUEST_TIMEOUT_SECONDS", defaults.request_timeout)?;

        // Shop settings
        let shop_name = var("SHOP_NAME").unwrap_or(defaults.shop_name);
        let shop_timezone = match var("SHOP_TIMEZONE") {
            Some(zone) => zone
                .trim()
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid SHOP_TIMEZONE value: {}", e))?,
            None => defaults.shop_timezone,
        };

        // Admin settings
        let admin = AdminConfig {
            password: var("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            password_hash: var("ADMIN_PASSWORD_HASH"),
            session_ttl_minutes: parse_or(
                &var,
                "ADMIN_SESSION_TTL_MINUTES",
                defaults.admin.session_ttl_minutes,
            )?,
            require_session: match var("ADMIN_REQUIRE_SESSION") {
                Some(flag) => parse_bool(&flag).wrap_err("Invalid ADMIN_REQUIRE_SESSION value")?,
                None => defaults.admin.require_session,
            },
        };

        // Notification settings
        let webhook = match var("WEBHOOK_URL") {
            Some(url) => Some(WebhookConfig {
                url: url.trim().to_string(),
                timeout: Duration::from_secs(parse_or(&var, "WEBHOOK_TIMEOUT_SECONDS", 5)?),
                max_retries: parse_or(&var, "WEBHOOK_MAX_RETRIES", 2)?,
                retry_backoff: Duration::from_millis(parse_or(&var, "WEBHOOK_RETRY_BACKOFF_MS", 500)?),
                queue_capacity: parse_or(&var, "WEBHOOK_QUEUE_CAPACITY", 64)?,
            }),
            None => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            shop_name,
            shop_timezone,
            admin,
            webhook,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Today's date on the shop's wall clock.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.shop_timezone).date_naive()
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value", key)),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(eyre!("expected a boolean, got {:?}", other)),
    }
}
