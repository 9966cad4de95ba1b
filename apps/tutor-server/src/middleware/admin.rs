//! Admin API key extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use subtle::ConstantTimeEq;

use super::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured admin key.
///
/// Use this in handlers to require admin access:
/// ```ignore
/// async fn admin_route(_admin: AdminAccess) -> impl Responder {
///     "secret"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

/// Constant-time for equal lengths; a length mismatch fails immediately.
fn keys_match(expected: &[u8], given: &[u8]) -> bool {
    expected.ct_eq(given).into()
}

fn authorize(req: &HttpRequest) -> Result<AdminAccess, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })?;

    let Some(expected) = state.admin_api_key.as_deref() else {
        return Err(AppError::NotFound("Admin API is disabled".to_string()));
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    if !keys_match(expected.as_bytes(), token.trim().as_bytes()) {
        tracing::warn!(path = %req.path(), "Rejected admin request with invalid key");
        return Err(AppError::Unauthorized);
    }

    Ok(AdminAccess)
}

impl FromRequest for AdminAccess {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}
