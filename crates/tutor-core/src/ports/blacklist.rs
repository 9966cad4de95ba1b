/// Access-denial registry - exact addresses and CIDR blocks.
pub trait IpBlacklist: Send + Sync {
    /// Insert a literal address or CIDR block. Adding twice is a no-op.
    fn add(&self, entry: &str);

    /// Remove an entry by exact string. Absent entries are ignored.
    fn remove(&self, entry: &str);

    /// True if `client_id` equals an entry or lies inside a stored CIDR block.
    fn is_blocked(&self, client_id: &str) -> bool;

    /// All stored entries, in no particular order.
    fn list(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
