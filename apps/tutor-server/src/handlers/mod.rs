//! HTTP handlers and route configuration.

mod blacklist;
mod health;

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::middleware::error::AppError;
use crate::middleware::{ClientId, RateLimitMiddleware};

/// GET /api/ping - echoes the identifier admission control saw.
async fn ping(client: ClientId) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "pong", "client": client.as_str() }))
}

/// Configure all application routes.
///
/// `api_limit` guards the `/api` subtree on top of the app-wide limiter.
pub fn configure_routes(cfg: &mut web::ServiceConfig, api_limit: RateLimitMiddleware) {
    // Body errors use the same JSON error shape as everything else
    let json_config = web::JsonConfig::default()
        .limit(4096)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/health", web::get().to(health::health_check))
        .route("/health/ready", web::get().to(health::readiness_check))
        .route("/metrics", web::get().to(health::metrics))
        .service(
            web::scope("/api")
                .wrap(api_limit)
                .route("/ping", web::get().to(ping))
                .service(
                    web::resource("/admin/blacklist")
                        .route(web::get().to(blacklist::list))
                        .route(web::post().to(blacklist::add))
                        .route(web::delete().to(blacklist::remove)),
                ),
        );
}
