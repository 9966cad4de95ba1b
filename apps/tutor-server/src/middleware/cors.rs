//! CORS policy built from the configured origin allow-list.

use actix_cors::Cors;
use actix_web::http::{Method, Uri, header};

const MAX_AGE_SECS: usize = 86400;

/// Whether `origin` is something `Cors::allowed_origin` accepts.
fn is_valid_origin(origin: &str) -> bool {
    origin
        .parse::<Uri>()
        .is_ok_and(|uri| uri.scheme().is_some() && uri.host().is_some())
}

/// Build the CORS middleware.
///
/// An empty allow-list or a `*` entry admits every origin. Requests from
/// other origins pass through without CORS headers instead of being
/// rejected, so non-browser clients are unaffected.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allowed_header("x-requested-with")
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .block_on_origin_mismatch(false)
        .max_age(MAX_AGE_SECS);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins.iter().fold(cors, |cors, origin| {
        if is_valid_origin(origin) {
            cors.allowed_origin(origin)
        } else {
            tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
            cors
        }
    })
}
