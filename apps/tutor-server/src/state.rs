//! Application state - shared across all handlers and middlewares.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tutor_core::ConfigError;
use tutor_core::domain::{LimiterScope, RateLimitConfig};
use tutor_core::ports::{ClientRateLimiter, IpBlacklist};
use tutor_infra::{InMemoryBlacklist, KeyedRateLimiter};

use crate::config::AppConfig;

/// Shared application state.
///
/// Built once at startup; every request-handling worker gets a clone that
/// points at the same registries.
#[derive(Clone)]
pub struct AppState {
    pub blacklist: Arc<dyn IpBlacklist>,
    pub global_limiter: Arc<dyn ClientRateLimiter>,
    pub api_limiter: Arc<dyn ClientRateLimiter>,
    pub global_limits: RateLimitConfig,
    pub api_limits: RateLimitConfig,
    pub trust_proxy_headers: bool,
    pub cors_allowed_origins: Arc<[String]>,
    pub admin_api_key: Option<Arc<str>>,
    pub slow_request_threshold: Duration,
    pub started_at: Instant,
}

impl AppState {
    /// Build the registries from configuration.
    ///
    /// Fails on invalid limiter parameters so nothing is checked per request.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let admission = &config.admission;

        let global_limiter = KeyedRateLimiter::new(LimiterScope::Global, admission.global)?;
        let api_limiter = KeyedRateLimiter::new(LimiterScope::Api, admission.api)?;
        let blacklist = InMemoryBlacklist::with_entries(&admission.blacklist);

        if !blacklist.is_empty() {
            tracing::info!(entries = blacklist.len(), "Blacklist seeded from configuration");
        }
        if config.admin_api_key.is_none() {
            tracing::info!("ADMIN_API_KEY not set. Admin API disabled.");
        }

        tracing::info!("Application state initialized");

        Ok(Self {
            blacklist: Arc::new(blacklist),
            global_limiter: Arc::new(global_limiter),
            api_limiter: Arc::new(api_limiter),
            global_limits: admission.global,
            api_limits: admission.api,
            trust_proxy_headers: config.trust_proxy_headers,
            cors_allowed_origins: config.cors_allowed_origins.clone().into(),
            admin_api_key: config.admin_api_key.as_deref().map(Arc::from),
            slow_request_threshold: config.slow_request_threshold,
            started_at: Instant::now(),
        })
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
