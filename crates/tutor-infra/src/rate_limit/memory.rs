//! In-memory per-client rate limiter using governor crate.

use std::collections::HashMap;
use std::mem;
use std::sync::{PoisonError, RwLock};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use tutor_core::ConfigError;
use tutor_core::domain::{LimiterScope, RateLimitConfig};
use tutor_core::ports::ClientRateLimiter;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Per-client rate limiter using the GCRA algorithm.
///
/// Every client gets its own direct limiter, created on first sight with a
/// full bucket. The table is never pruned entry by entry; [`sweep`] swaps
/// the whole map for an empty one, which also hands every client a fresh
/// quota.
///
/// Note: Limits are per-process and lost on restart.
///
/// [`sweep`]: ClientRateLimiter::sweep
pub struct KeyedRateLimiter {
    scope: LimiterScope,
    quota: Quota,
    clients: RwLock<HashMap<String, DirectRateLimiter>>,
}

impl KeyedRateLimiter {
    pub fn new(scope: LimiterScope, config: RateLimitConfig) -> Result<Self, ConfigError> {
        let (rate, burst) = config.validate(scope)?;
        let quota = Quota::per_second(rate).allow_burst(burst);

        tracing::debug!(
            scope = %scope,
            rate = config.requests_per_second,
            burst = config.burst,
            "Rate limiter created"
        );

        Ok(Self {
            scope,
            quota,
            clients: RwLock::new(HashMap::new()),
        })
    }
}

impl ClientRateLimiter for KeyedRateLimiter {
    fn allow(&self, client_id: &str) -> bool {
        // Fast path: known client, shared lock only
        {
            let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(limiter) = clients.get(client_id) {
                return limiter.check().is_ok();
            }
        }

        // Another request may have inserted the client between the two locks
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        let limiter = clients.entry(client_id.to_string()).or_insert_with(|| {
            tracing::trace!(scope = %self.scope, client = %client_id, "New client bucket");
            DirectRateLimiter::direct(self.quota)
        });
        limiter.check().is_ok()
    }

    fn sweep(&self) -> usize {
        let dropped = {
            let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
            mem::take(&mut *clients)
        };
        dropped.len()
    }

    fn tracked_clients(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
