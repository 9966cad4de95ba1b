//! Health, readiness and metrics endpoints.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tutor_core::domain::RateLimitConfig;
use tutor_core::ports::{ClientRateLimiter, IpBlacklist};
use tutor_shared::dto::{LimiterMetrics, MetricsResponse};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub time: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        time: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /health/ready
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ReadinessResponse {
        status: "ready",
        uptime_secs: state.uptime().as_secs(),
    })
}

fn limiter_metrics(limiter: &dyn ClientRateLimiter, limits: RateLimitConfig) -> LimiterMetrics {
    LimiterMetrics {
        tracked_clients: limiter.tracked_clients(),
        requests_per_second: limits.requests_per_second,
        burst: limits.burst,
    }
}

/// GET /metrics
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(MetricsResponse {
        uptime_secs: state.uptime().as_secs(),
        global_limiter: limiter_metrics(state.global_limiter.as_ref(), state.global_limits),
        api_limiter: limiter_metrics(state.api_limiter.as_ref(), state.api_limits),
        blacklist_entries: state.blacklist.len(),
    })
}
