//! Application assembly - middleware order and routes.

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use tracing_actix_web::TracingLogger;
use tutor_core::domain::LimiterScope;

use crate::handlers;
use crate::middleware::{BlacklistMiddleware, RateLimitMiddleware, Recovery, cors, security_headers};
use crate::observability::AccessLog;
use crate::state::AppState;

/// Build the application around `state`.
///
/// Request order, outermost first: panic recovery, tracing span, security
/// headers, blacklist, global rate limit, access log, CORS, then routing
/// (where `/api` adds the API rate limit).
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let trust = state.trust_proxy_headers;
    let api_limit = RateLimitMiddleware::new(state.api_limiter.clone(), LimiterScope::Api, trust);

    App::new()
        .app_data(web::Data::new(state.clone()))
        .configure(|cfg| handlers::configure_routes(cfg, api_limit))
        .wrap(cors(&state.cors_allowed_origins))
        .wrap(AccessLog::new(state.slow_request_threshold))
        .wrap(RateLimitMiddleware::new(
            state.global_limiter.clone(),
            LimiterScope::Global,
            trust,
        ))
        .wrap(BlacklistMiddleware::new(state.blacklist.clone(), trust))
        .wrap(security_headers())
        .wrap(TracingLogger::default())
        .wrap(Recovery)
}
