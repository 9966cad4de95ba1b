//! Ports - trait definitions for the admission-control registries.
//! These are the "interfaces" that infrastructure must implement.

mod blacklist;
mod rate_limit;

pub use blacklist::IpBlacklist;
pub use rate_limit::ClientRateLimiter;
