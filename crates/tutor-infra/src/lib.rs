//! # Tutor Infrastructure
//!
//! Concrete implementations of the ports defined in `tutor-core`.
//!
//! - [`InMemoryBlacklist`] - exact and CIDR address denial
//! - [`KeyedRateLimiter`] - per-client token buckets via governor

pub mod blacklist;
pub mod rate_limit;

pub use blacklist::InMemoryBlacklist;
pub use rate_limit::KeyedRateLimiter;
