use crate::types::{AggregatorError, FetchConfig, Result};
use chrono::Duration;
use std::str::FromStr;

const ENV_USER_AGENT: &str = "BRIEFING_USER_AGENT";
const ENV_FETCH_TIMEOUT: &str = "BRIEFING_FETCH_TIMEOUT_SECS";
const ENV_CACHE_TTL: &str = "BRIEFING_CACHE_TTL_SECS";
const ENV_MAX_FEED_SIZE: &str = "BRIEFING_MAX_FEED_SIZE_MB";

/// Default lifetime of a cached digest: 30 minutes.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct BriefingConfig {
    pub fetch: FetchConfig,
    pub cache_ttl_secs: u64,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl BriefingConfig {
    /// Defaults overridden by `BRIEFING_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(user_agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.fetch.user_agent = user_agent.trim().to_string();
        }
        if let Some(timeout) = parse_var(&lookup, ENV_FETCH_TIMEOUT)? {
            config.fetch.timeout_seconds = timeout;
        }
        if let Some(max_mb) = parse_var(&lookup, ENV_MAX_FEED_SIZE)? {
            config.fetch.max_feed_size_mb = max_mb;
        }
        if let Some(ttl) = parse_var(&lookup, ENV_CACHE_TTL)? {
            config.cache_ttl_secs = ttl;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_seconds == 0 {
            return Err(AggregatorError::Config(
                "fetch timeout must be at least one second".to_string(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AggregatorError::Config("user agent must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        // chrono caps durations at i64::MAX milliseconds
        let secs = i64::try_from(self.cache_ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        Duration::seconds(secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AggregatorError::Config(format!("{} has an invalid value: {:?}", key, raw))),
    }
}
