//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of blacklist add/remove requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntryRequest {
    /// Literal address or CIDR block.
    pub entry: String,
}

/// Response listing the blacklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistResponse {
    pub entries: Vec<String>,
    pub total: usize,
}

/// Response for a single blacklist mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntryResponse {
    pub entry: String,
    pub blocked: bool,
}

/// Per-limiter counters reported by `/metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterMetrics {
    pub tracked_clients: usize,
    pub requests_per_second: u32,
    pub burst: u32,
}

/// Response of the `/metrics` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub uptime_secs: u64,
    pub global_limiter: LimiterMetrics,
    pub api_limiter: LimiterMetrics,
    pub blacklist_entries: usize,
}
