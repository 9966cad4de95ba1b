//! Rate limiting port.

/// Per-client admission control - one independent token bucket per client.
///
/// Implementations must be synchronous and never block on I/O: `allow` sits
/// inline on every request.
pub trait ClientRateLimiter: Send + Sync {
    /// Consume one token from `client_id`'s bucket.
    /// Returns `false` (consuming nothing) when the bucket is empty.
    fn allow(&self, client_id: &str) -> bool;

    /// Discard every tracked client, restoring full quota for all of them.
    /// Returns the number of entries dropped.
    fn sweep(&self) -> usize;

    /// Number of clients currently holding a bucket.
    fn tracked_clients(&self) -> usize;
}
