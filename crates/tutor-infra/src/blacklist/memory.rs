//! In-memory IP blacklist with CIDR support.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{PoisonError, RwLock};

use tutor_core::domain::CidrBlock;
use tutor_core::ports::IpBlacklist;

/// In-memory blacklist guarded by a std `RwLock`.
///
/// Each entry keeps the string it was added under; entries containing a `/`
/// that parse as CIDR also carry the parsed block, so lookups never re-parse.
/// Note: Entries are lost on process restart.
#[derive(Default)]
pub struct InMemoryBlacklist {
    entries: RwLock<HashMap<String, Option<CidrBlock>>>,
}

impl InMemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a blacklist pre-populated with `entries`.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blacklist = Self::new();
        for entry in entries {
            blacklist.add(entry.as_ref());
        }
        blacklist
    }

    fn parse_block(entry: &str) -> Option<CidrBlock> {
        if !entry.contains('/') {
            return None;
        }
        match entry.parse() {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(entry = %entry, error = %e, "Blacklist entry is not a valid CIDR block, matching literally");
                None
            }
        }
    }
}

impl IpBlacklist for InMemoryBlacklist {
    fn add(&self, entry: &str) {
        let block = Self::parse_block(entry);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(entry.to_string(), block);
    }

    fn remove(&self, entry: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(entry);
    }

    fn is_blocked(&self, client_id: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        if entries.contains_key(client_id) {
            return true;
        }

        let Ok(addr) = client_id.parse::<IpAddr>() else {
            return false;
        };
        entries.values().flatten().any(|block| block.contains(addr))
    }

    fn list(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
