//! Admission-control decisions and limiter parameters.

use std::fmt;
use std::num::NonZeroU32;

use crate::error::ConfigError;

/// Which rate limiter registry a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimiterScope {
    /// Consulted for every request.
    Global,
    /// Consulted in addition to `Global` for the API subtree.
    Api,
}

impl LimiterScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimiterScope::Global => "global",
            LimiterScope::Api => "api",
        }
    }
}

impl fmt::Display for LimiterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was refused before reaching its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Blacklisted,
    RateLimited(LimiterScope),
}

impl Denial {
    /// HTTP status code, also echoed as `code` in the response body.
    pub fn status_code(&self) -> u16 {
        match self {
            Denial::Blacklisted => 403,
            Denial::RateLimited(_) => 429,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Denial::Blacklisted => "Your IP address has been blocked",
            Denial::RateLimited(LimiterScope::Global) => {
                "Too many requests, please try again later"
            }
            Denial::RateLimited(LimiterScope::Api) => {
                "Too many API requests, please try again later"
            }
        }
    }
}

/// Token-bucket parameters shared by every client of one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Tokens refilled per second.
    pub requests_per_second: u32,
    /// Bucket capacity, also the initial token count of a new client.
    pub burst: u32,
}

impl RateLimitConfig {
    pub const fn new(requests_per_second: u32, burst: u32) -> Self {
        Self {
            requests_per_second,
            burst,
        }
    }

    /// 30 requests per second, burst 50.
    pub const fn global_default() -> Self {
        Self::new(30, 50)
    }

    /// 10 requests per second, burst 15.
    pub const fn api_default() -> Self {
        Self::new(10, 15)
    }

    /// Checks both parameters are non-zero.
    pub fn validate(&self, scope: LimiterScope) -> Result<(NonZeroU32, NonZeroU32), ConfigError> {
        let rate = NonZeroU32::new(self.requests_per_second).ok_or(ConfigError::ZeroRate {
            scope: scope.as_str(),
        })?;
        let burst = NonZeroU32::new(self.burst).ok_or(ConfigError::ZeroBurst {
            scope: scope.as_str(),
        })?;
        Ok((rate, burst))
    }
}
