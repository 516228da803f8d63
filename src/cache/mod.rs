//! In-memory snapshot store for last-known-good record lists
//!
//! One [`SourceCache`] per upstream source, grouped in a [`SnapshotStore`]
//! that the scheduler writes and the query surface reads. The store is
//! memory-only; it starts empty and is rebuilt from source on every process
//! restart.
//!
//! Replacement contract: an entry is only overwritten by a non-empty
//! candidate. A refresh that produced nothing - fetch failure, parse
//! failure, or a legitimately empty page - leaves the previous snapshot
//! untouched, so callers are served stale-but-valid data instead of nothing.

use tokio::sync::RwLock;

use crate::models::{Conference, Course};

/// Last-known-good record list for one source
///
/// The whole list is swapped atomically under a write lock held only for the
/// swap itself; readers see either the old or the new full sequence, never
/// an interleaving.
pub struct SourceCache<T> {
    /// Source label used in log fields
    name: &'static str,

    records: RwLock<Vec<T>>,
}

impl<T: Clone> SourceCache<T> {
    /// Create an empty cache entry
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Get the current snapshot
    ///
    /// Never waits on an in-flight refresh beyond the swap instant; an empty
    /// vec means no successful refresh has happened yet.
    pub async fn get(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    /// Number of records in the current snapshot
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the current snapshot is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Replace the snapshot, but only with a non-empty candidate
    ///
    /// Returns `true` if the snapshot was replaced. An empty candidate is a
    /// no-op that logs a "keeping stale cache" notice and returns `false`.
    pub async fn replace_if_non_empty(&self, candidate: Vec<T>) -> bool {
        if candidate.is_empty() {
            let retained = self.len().await;
            tracing::warn!(
                source = self.name,
                retained,
                "refresh produced no records, keeping stale cache"
            );
            return false;
        }

        let count = candidate.len();
        *self.records.write().await = candidate;
        tracing::info!(source = self.name, count, "cache updated");
        true
    }
}

/// Process-wide holder of the per-source cache entries
///
/// Constructed explicitly and shared via `Arc` so tests can build isolated
/// instances. The two entries are independent: a failed refresh of one never
/// blocks or corrupts the other.
pub struct SnapshotStore {
    /// Course listings from source A
    pub courses: SourceCache<Course>,

    /// Conference listings from source B
    pub conferences: SourceCache<Conference>,
}

impl SnapshotStore {
    /// Create a store with both entries empty
    pub fn new() -> Self {
        Self {
            courses: SourceCache::new("courses"),
            conferences: SourceCache::new("conferences"),
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
