//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tutor_core::ConfigError;
use tutor_core::domain::RateLimitConfig;

/// Admission-control settings: both limiters, the sweep period and the
/// initial blacklist.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    pub global: RateLimitConfig,
    pub api: RateLimitConfig,
    pub sweep_interval: Duration,
    pub blacklist: Vec<String>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            global: RateLimitConfig::global_default(),
            api: RateLimitConfig::api_default(),
            sweep_interval: Duration::from_secs(300),
            blacklist: Vec::new(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Resolve clients through `Forwarded` / `X-Forwarded-For`.
    pub trust_proxy_headers: bool,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Admin API is disabled when unset.
    pub admin_api_key: Option<String>,
    pub slow_request_threshold: Duration,
    pub admission: AdmissionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            trust_proxy_headers: true,
            cors_allowed_origins: vec!["*".to_string()],
            admin_api_key: None,
            slow_request_threshold: Duration::from_secs(2),
            admission: AdmissionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-unparseable ones are
    /// rejected so a typo never silently disables a limit.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let admission = AdmissionConfig {
            global: RateLimitConfig::new(
                parse_var("GLOBAL_RATE_LIMIT_RPS")?
                    .unwrap_or(defaults.admission.global.requests_per_second),
                parse_var("GLOBAL_RATE_LIMIT_BURST")?.unwrap_or(defaults.admission.global.burst),
            ),
            api: RateLimitConfig::new(
                parse_var("API_RATE_LIMIT_RPS")?
                    .unwrap_or(defaults.admission.api.requests_per_second),
                parse_var("API_RATE_LIMIT_BURST")?.unwrap_or(defaults.admission.api.burst),
            ),
            sweep_interval: parse_var("RATE_LIMIT_SWEEP_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.admission.sweep_interval),
            blacklist: env::var("BLACKLIST_ENTRIES")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        };

        if admission.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            trust_proxy_headers: env::var("TRUST_PROXY_HEADERS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.trust_proxy_headers),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_allowed_origins),
            admin_api_key: env::var("ADMIN_API_KEY").ok().filter(|k| !k.is_empty()),
            slow_request_threshold: parse_var("SLOW_REQUEST_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.slow_request_threshold),
            admission,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let parsed = value.trim().parse::<T>().ok();
            match parsed {
                Some(v) => Ok(Some(v)),
                None => Err(ConfigError::InvalidValue { key, value }),
            }
        }
        Err(_) => Ok(None),
    }
}

/// Comma-separated list, blanks dropped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_policy() {
        let config = AppConfig::default();
        assert_eq!(config.admission.global, RateLimitConfig::new(30, 50));
        assert_eq!(config.admission.api, RateLimitConfig::new(10, 15));
        assert_eq!(config.admission.sweep_interval, Duration::from_secs(300));
        assert!(config.admin_api_key.is_none());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" 10.0.0.0/8, ,203.0.113.5,"),
            vec!["10.0.0.0/8".to_string(), "203.0.113.5".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
