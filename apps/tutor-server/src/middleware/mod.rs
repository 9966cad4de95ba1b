//! Middleware modules.

pub mod admin;
pub mod blacklist;
pub mod client_id;
pub mod cors;
pub mod error;
pub mod rate_limit;
pub mod recovery;
pub mod security;

pub use blacklist::BlacklistMiddleware;
pub use client_id::ClientId;
pub use cors::cors;
pub use rate_limit::RateLimitMiddleware;
pub use recovery::Recovery;
pub use security::security_headers;
