// Runtime configuration read from the environment (after `.env` is loaded).

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub request_timeout: Duration,
    pub health_check_interval: Duration,
    pub appeal_contact: String,
    pub dev_guild_id: Option<u64>,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DISCORD_TOKEN`: bot token from the Discord Developer Portal
    ///
    /// Optional:
    /// - `DATABASE_URL`: SQLite connection string (default `sqlite://data/bot.db`)
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default 5)
    /// - `DATABASE_ACQUIRE_TIMEOUT_SECS`: wait for a pooled connection (default 5)
    /// - `REQUEST_TIMEOUT_SECS`: limit on each Discord call during moderation (default 10)
    /// - `HEALTH_CHECK_INTERVAL_SECS`: database probe period (default 60)
    /// - `APPEAL_CONTACT`: who banned users should contact
    /// - `DEV_GUILD_ID`: register commands in this guild only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let database_url = get("DATABASE_URL").unwrap_or_else(|| "sqlite://data/bot.db".into());

        let max_connections: u32 =
            parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 5)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }

        let acquire_timeout = secs("DATABASE_ACQUIRE_TIMEOUT_SECS", &get, 5)?;
        let request_timeout = secs("REQUEST_TIMEOUT_SECS", &get, 10)?;
        let health_check_interval = secs("HEALTH_CHECK_INTERVAL_SECS", &get, 60)?;

        let appeal_contact =
            get("APPEAL_CONTACT").unwrap_or_else(|| "the server staff".to_string());

        let dev_guild_id = get("DEV_GUILD_ID")
            .map(|raw| parse("DEV_GUILD_ID", &raw))
            .transpose()?;

        Ok(Self {
            discord_token,
            database_url,
            max_connections,
            acquire_timeout,
            request_timeout,
            health_check_interval,
            appeal_contact,
            dev_guild_id,
        })
    }
}

fn parse<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.to_string(),
    })
}

fn parse_or<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse(var, &raw),
        None => Ok(default),
    }
}

/// A positive number of seconds.
fn secs(
    var: &'static str,
    get: &impl Fn(&str) -> Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let value: u64 = parse_or(var, get(var), default)?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: "0".into(),
        });
    }
    Ok(Duration::from_secs(value))
}
