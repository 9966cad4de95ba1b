//! Admin blacklist handlers.

use actix_web::{HttpResponse, web};

use tutor_core::domain::blacklist_entry;
use tutor_core::ports::IpBlacklist;
use tutor_shared::dto::{BlacklistEntryRequest, BlacklistEntryResponse, BlacklistResponse};

use crate::middleware::admin::AdminAccess;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/blacklist
pub async fn list(_admin: AdminAccess, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let mut entries = state.blacklist.list();
    entries.sort();

    Ok(HttpResponse::Ok().json(BlacklistResponse {
        total: entries.len(),
        entries,
    }))
}

/// POST /api/admin/blacklist
pub async fn add(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    body: web::Json<BlacklistEntryRequest>,
) -> AppResult<HttpResponse> {
    let entry = blacklist_entry(&body.entry)?;

    state.blacklist.add(&entry);
    tracing::info!(entry = %entry, "Blacklist entry added");

    Ok(HttpResponse::Created().json(BlacklistEntryResponse {
        entry,
        blocked: true,
    }))
}

/// DELETE /api/admin/blacklist
pub async fn remove(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    body: web::Json<BlacklistEntryRequest>,
) -> AppResult<HttpResponse> {
    let entry = blacklist_entry(&body.entry)?;

    state.blacklist.remove(&entry);
    tracing::info!(entry = %entry, "Blacklist entry removed");

    Ok(HttpResponse::Ok().json(BlacklistEntryResponse {
        entry,
        blocked: false,
    }))
}
