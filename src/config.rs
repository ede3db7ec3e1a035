use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub api_rate_limit_per_second: NonZeroU32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_POLL_INTERVAL_MS: u64 = 1500;
        const DEFAULT_POLL_TIMEOUT_SECS: u64 = 120;
        const DEFAULT_API_RATE_LIMIT_PER_SECOND: u32 = 20;

        let api_base_url = env::var("VALDECK_API_BASE_URL")
            .map_err(|_| AppError::Config("VALDECK_API_BASE_URL must be set".into()))?;

        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let poll_timeout_secs = env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);

        let api_rate_limit_per_second = env::var("API_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_API_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        Ok(Self {
            api_base_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_timeout: Duration::from_secs(poll_timeout_secs),
            api_rate_limit_per_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_base_url_is_a_config_error() {
        // The variable may leak in from a developer .env; only assert when
        // the environment is clean.
        if env::var("VALDECK_API_BASE_URL").is_err() {
            assert!(matches!(Config::from_env(), Err(AppError::Config(_))));
        }
    }
}
