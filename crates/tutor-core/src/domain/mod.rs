//! Domain types for admission control.

mod admission;
mod cidr;
mod client;

pub use admission::{Denial, LimiterScope, RateLimitConfig};
pub use cidr::{CidrBlock, CidrParseError};
pub use client::{UNKNOWN_CLIENT, blacklist_entry, client_id};
