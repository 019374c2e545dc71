//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, falling back to
//! defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: Address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: Port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: Wait for a pooled connection (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `APP_TIMEZONE`: IANA timezone for civil dates and timestamps (default: "America/Bogota")
//! - `INTERVIEW_TIME_WINDOW`: Label stored on every reservation (default: "7:00 AM - 11:00 AM")
//! - `INTERVIEW_LOCATION`: Address printed on confirmation emails
//! - `INTERVIEW_ORGANIZATION`: Sender name printed in email footers
//! - `TICKET_MAX_ATTEMPTS`: Ticket codes tried per booking (default: 3)
//! - `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_USERNAME`, `SMTP_PASSWORD`: Mail relay; without
//!   `SMTP_HOST` emails are only logged
//! - `MAIL_FROM`, `MAIL_FROM_NAME`: Sender address and display name
//! - `MAIL_TIMEOUT_SECONDS`: SMTP send timeout (default: 10)

use std::{env, time::Duration};

use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use talentgate_core::{
    clock::DEFAULT_TIMEZONE,
    scheduling::{
        DEFAULT_LOCATION, DEFAULT_ORGANIZATION, DEFAULT_TICKET_ATTEMPTS, DEFAULT_TIME_WINDOW,
        SchedulerSettings,
    },
};
use tracing::Level;

/// SMTP relay settings; present only when `SMTP_HOST` is set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub timeout: Duration,
}

/// Configuration for the TalentGate API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub database_max_connections: u32,

    pub database_acquire_timeout: Duration,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Civil timezone for "today" and stored timestamps
    pub timezone: Tz,

    pub scheduler: SchedulerSettings,

    pub smtp: Option<SmtpConfig>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing or a numeric or timezone value does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&var, "API_PORT", 3000u16)?;

        // Database settings
        let database_url =
            var("DATABASE_URL").ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let database_max_connections = parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let database_acquire_timeout =
            Duration::from_secs(parse_or(&var, "DATABASE_ACQUIRE_TIMEOUT_SECONDS", 5u64)?);

        // Logging settings
        let log_level = match var("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
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
        let request_timeout = parse_or(&var, "API_REQUEST_TIMEOUT_SECONDS", 30u64)?;

        let timezone = match var("APP_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid APP_TIMEZONE value {name}: {e}"))?,
            None => DEFAULT_TIMEZONE,
        };

        // Interview settings
        let scheduler = SchedulerSettings {
            time_window: var("INTERVIEW_TIME_WINDOW")
                .unwrap_or_else(|| DEFAULT_TIME_WINDOW.to_string()),
            location: var("INTERVIEW_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            organization: var("INTERVIEW_ORGANIZATION")
                .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string()),
            max_ticket_attempts: parse_or(&var, "TICKET_MAX_ATTEMPTS", DEFAULT_TICKET_ATTEMPTS)?,
        };

        // Mail settings
        let smtp = match var("SMTP_HOST") {
            Some(host) => {
                let username = var("SMTP_USERNAME");
                let from_email = var("MAIL_FROM")
                    .or_else(|| username.clone())
                    .ok_or_else(|| eyre!("MAIL_FROM must be set when SMTP_HOST is configured"))?;
                Some(SmtpConfig {
                    host,
                    port: parse_or(&var, "SMTP_PORT", 587u16)?,
                    username,
                    password: var("SMTP_PASSWORD"),
                    from_email,
                    from_name: var("MAIL_FROM_NAME").unwrap_or_else(|| scheduler.organization.clone()),
                    timeout: Duration::from_secs(parse_or(&var, "MAIL_TIMEOUT_SECONDS", 10u64)?),
                })
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            log_level,
            cors_origins,
            request_timeout,
            timezone,
            scheduler,
            smtp,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {key} value")),
        None => Ok(default),
    }
}
