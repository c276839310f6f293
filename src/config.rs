use std::env;
use std::fmt::Display;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub flow_idle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let session_secret = match lookup("SESSION_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("SESSION_SECRET not set, sessions will not survive a restart");
                Uuid::new_v4().to_string()
            }
        };

        Ok(AppConfig {
            port: load(&lookup, "PORT", 8080)?,
            backend_url: load(&lookup, "BACKEND_URL", "http://localhost:8081".to_string())?,
            session_secret,
            session_ttl: duration(&lookup, "SESSION_TTL_HOURS", 24, Duration::try_hours)?,
            cookie_secure: load(&lookup, "COOKIE_SECURE", false)?,
            flow_idle: duration(&lookup, "FLOW_IDLE_MINUTES", 60, Duration::try_minutes)?,
        })
    }
}

fn load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// Positive whole number of units, turned into a duration by `unit`.
fn duration(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u32,
    unit: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    let amount = load(lookup, key, default)?;
    let invalid = |reason: &str| ConfigError::Invalid {
        key,
        value: amount.to_string(),
        reason: reason.to_string(),
    };
    if amount == 0 {
        return Err(invalid("must be greater than zero"));
    }
    unit(i64::from(amount)).ok_or_else(|| invalid("out of range"))
}
