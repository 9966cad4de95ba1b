//! End-to-end tests of the request pipeline.

use actix_web::body::to_bytes;
use actix_web::dev::Service;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{HttpResponse, test, web};
use serde_json::{Value, json};
use std::net::SocketAddr;

use tutor_core::domain::RateLimitConfig;
use tutor_core::ports::{ClientRateLimiter, IpBlacklist};

use crate::app::build_app;
use crate::config::AppConfig;
use crate::state::AppState;

const CLIENT: &str = "203.0.113.5:40000";
const ADMIN: &str = "192.0.2.10:40000";
const ADMIN_KEY: &str = "s3cret";

fn test_state(configure: impl FnOnce(&mut AppConfig)) -> AppState {
    let mut config = AppConfig::default();
    configure(&mut config);
    AppState::new(&config).unwrap()
}

fn peer(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

fn get(uri: &str, from: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri).peer_addr(peer(from))
}

fn admin(method: Method, entry: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::default()
        .method(method)
        .uri("/api/admin/blacklist")
        .peer_addr(peer(ADMIN))
        .insert_header((header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}")));
    match entry {
        Some(entry) => req.set_json(json!({ "entry": entry })),
        None => req,
    }
}

#[actix_web::test]
async fn test_allowed_client_reaches_handler() {
    let app = test::init_service(build_app(test_state(|_| {}))).await;

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "pong");
    assert_eq!(body["client"], "203.0.113.5");
}

#[actix_web::test]
async fn test_blacklisted_client_is_denied() {
    let state = test_state(|c| c.admission.blacklist = vec!["203.0.113.0/24".to_string()]);
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 403);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    // Health is outside /api but still behind the blacklist
    let resp = test::call_service(&app, get("/health", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, get("/api/ping", "198.51.100.1:1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_blacklist_wins_over_exhausted_quota() {
    let state = test_state(|c| c.admission.api = RateLimitConfig::new(1, 1));
    let blacklist = state.blacklist.clone();
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    blacklist.add("203.0.113.5");
    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_api_limiter_denies_after_burst() {
    let app = test::init_service(build_app(test_state(|_| {}))).await;

    for i in 0..15 {
        let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "request {} should pass", i + 1);
    }

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get("x-ratelimit-scope").unwrap(), "api");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 429);

    // Another client has its own bucket
    let resp = test::call_service(&app, get("/api/ping", "203.0.113.6:1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The global limiter still has quota for the exhausted client
    let resp = test::call_service(&app, get("/health", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_global_limiter_covers_every_route() {
    let state = test_state(|c| c.admission.global = RateLimitConfig::new(1, 3));
    let app = test::init_service(build_app(state)).await;

    for _ in 0..3 {
        let resp = test::call_service(&app, get("/health", CLIENT).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get("x-ratelimit-scope").unwrap(), "global");
}

#[actix_web::test]
async fn test_sweep_restores_quota_end_to_end() {
    let state = test_state(|c| c.admission.api = RateLimitConfig::new(1, 1));
    let api_limiter = state.api_limiter.clone();
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    assert_eq!(api_limiter.sweep(), 1);

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_forwarded_header_respects_trust_setting() {
    let blocked = vec!["10.0.0.0/8".to_string()];

    let trusting = test_state(|c| c.admission.blacklist = blocked.clone());
    let app = test::init_service(build_app(trusting)).await;
    let req = get("/api/ping", CLIENT)
        .insert_header(("X-Forwarded-For", "10.1.2.3"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let direct = test_state(|c| {
        c.admission.blacklist = blocked.clone();
        c.trust_proxy_headers = false;
    });
    let app = test::init_service(build_app(direct)).await;
    let req = get("/api/ping", CLIENT)
        .insert_header(("X-Forwarded-For", "10.1.2.3"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_blacklist_round_trip() {
    let state = test_state(|c| c.admin_api_key = Some(ADMIN_KEY.to_string()));
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, admin(Method::POST, Some("203.0.113.0/24")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"entry": "203.0.113.0/24", "blocked": true}));

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, admin(Method::GET, None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"entries": ["203.0.113.0/24"], "total": 1}));

    let resp = test::call_service(&app, admin(Method::DELETE, Some("203.0.113.0/24")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["blocked"], false);

    let resp = test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_requires_valid_key() {
    let state = test_state(|c| c.admin_api_key = Some(ADMIN_KEY.to_string()));
    let app = test::init_service(build_app(state)).await;

    let req = get("/api/admin/blacklist", ADMIN).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 401);

    let req = get("/api/admin/blacklist", ADMIN)
        .insert_header((header::AUTHORIZATION, "Bearer wrong"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, admin(Method::POST, Some("   ")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_admin_body_uses_error_shape() {
    let state = test_state(|c| c.admin_api_key = Some(ADMIN_KEY.to_string()));
    let app = test::init_service(build_app(state)).await;

    let req = admin(Method::POST, None)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{entry: 10.0.0.1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 400);
    assert_eq!(body["error"], "Bad request");
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));
}

#[actix_web::test]
async fn test_ipv4_mapped_peer_matches_ipv4_entry() {
    let state = test_state(|c| {
        c.admission.blacklist = vec!["203.0.113.5".to_string()];
        c.trust_proxy_headers = false;
    });
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, get("/api/ping", "[::ffff:203.0.113.5]:40000").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, get("/api/ping", "[::ffff:203.0.113.6]:40000").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["client"], "203.0.113.6");
}

#[actix_web::test]
async fn test_admin_disabled_without_key() {
    let app = test::init_service(build_app(test_state(|_| {}))).await;

    let resp = test::call_service(&app, admin(Method::GET, None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cors_preflight_for_allowed_origin() {
    let state = test_state(|c| c.cors_allowed_origins = vec!["https://admin.example.com".to_string()]);
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/ping")
        .peer_addr(peer(CLIENT))
        .insert_header((header::ORIGIN, "https://admin.example.com"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://admin.example.com"
    );

    let req = get("/api/ping", CLIENT)
        .insert_header((header::ORIGIN, "https://elsewhere.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[actix_web::test]
async fn test_metrics_report_registry_sizes() {
    let state = test_state(|c| c.admission.blacklist = vec!["10.0.0.0/8".to_string()]);
    let app = test::init_service(build_app(state)).await;

    test::call_service(&app, get("/api/ping", CLIENT).to_request()).await;
    test::call_service(&app, get("/api/ping", "203.0.113.6:1").to_request()).await;

    let resp = test::call_service(&app, get("/metrics", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["global_limiter"]["tracked_clients"], 2);
    assert_eq!(body["global_limiter"]["burst"], 50);
    assert_eq!(body["api_limiter"]["tracked_clients"], 2);
    assert_eq!(body["api_limiter"]["burst"], 15);
    assert_eq!(body["blacklist_entries"], 1);
}

async fn exploding_handler() -> HttpResponse {
    panic!("handler exploded");
}

#[actix_web::test]
async fn test_panic_becomes_500() {
    let app = test::init_service(
        build_app(test_state(|_| {})).route("/boom", web::get().to(exploding_handler)),
    )
    .await;

    let Err(err) = app.call(get("/boom", CLIENT).to_request()).await else {
        panic!("a panicking handler must not produce a response");
    };
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Internal server error", "code": 500}));

    // The worker keeps serving afterwards
    let resp = test::call_service(&app, get("/health", CLIENT).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
