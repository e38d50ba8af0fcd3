use std::str::FromStr;
use std::time::Duration;

use chrono::{TimeDelta, Utc};

use crate::retention;

/// Errors raised while reading worker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub database_url: String,
    /// Upper bound on pooled connections (default: `10`).
    pub db_max_connections: u32,
    /// Time between retention passes (default: one hour).
    pub retention_interval: Duration,
    /// How long an expired share link is kept before it is removed
    /// (default: `24` hours).
    pub share_link_grace_hours: i64,
    /// How long soft-deleted rows stay in the trash (default: `30` days).
    pub trash_retention_days: i64,
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `DATABASE_URL`            | required |
    /// | `DB_MAX_CONNECTIONS`      | `10`     |
    /// | `RETENTION_INTERVAL_SECS` | `3600`   |
    /// | `SHARE_LINK_GRACE_HOURS`  | `24`     |
    /// | `TRASH_RETENTION_DAYS`    | `30`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let db_max_connections: u32 =
            parse_or(&lookup, "DB_MAX_CONNECTIONS", 10, "a positive integer")?;
        if db_max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "a positive integer", "0"));
        }

        let interval_secs: u64 =
            parse_or(&lookup, "RETENTION_INTERVAL_SECS", 3600, "a positive integer")?;
        if interval_secs == 0 {
            return Err(invalid("RETENTION_INTERVAL_SECS", "a positive integer", "0"));
        }

        let share_link_grace_hours: i64 =
            parse_or(&lookup, "SHARE_LINK_GRACE_HOURS", 24, WINDOW_EXPECTED)?;
        check_window(
            "SHARE_LINK_GRACE_HOURS",
            share_link_grace_hours,
            TimeDelta::try_hours(share_link_grace_hours),
        )?;

        let trash_retention_days: i64 =
            parse_or(&lookup, "TRASH_RETENTION_DAYS", 30, WINDOW_EXPECTED)?;
        check_window(
            "TRASH_RETENTION_DAYS",
            trash_retention_days,
            TimeDelta::try_days(trash_retention_days),
        )?;

        Ok(Self {
            database_url,
            db_max_connections,
            retention_interval: Duration::from_secs(interval_secs),
            share_link_grace_hours,
            trash_retention_days,
        })
    }

    /// Grace period after expiry before a share link is removed.
    pub fn share_link_grace(&self) -> Option<TimeDelta> {
        TimeDelta::try_hours(self.share_link_grace_hours)
    }

    /// Age after which soft-deleted rows are purged.
    pub fn trash_retention(&self) -> Option<TimeDelta> {
        TimeDelta::try_days(self.trash_retention_days)
    }
}

const WINDOW_EXPECTED: &str = "a non-negative integer within the supported date range";

/// Reject negative windows and windows whose cutoff cannot be computed.
fn check_window(
    name: &'static str,
    value: i64,
    window: Option<TimeDelta>,
) -> Result<(), ConfigError> {
    if value < 0 || retention::cutoff(Utc::now(), window, name).is_err() {
        return Err(invalid(name, WINDOW_EXPECTED, &value.to_string()));
    }
    Ok(())
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(name, expected, &raw)),
    }
}

fn invalid(name: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    }
}
