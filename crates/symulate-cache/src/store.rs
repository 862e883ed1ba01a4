//! Two-tier cache store.
//!
//! Remote-first reads for authenticated callers with local fallback,
//! write-through to both tiers, and clearing that operates on each tier
//! independently and reports what it found.

use tracing::{debug, warn};

use symulate_core::SymulateConfig;

use crate::entry::CacheEntry;
use crate::local::LocalStore;
use crate::remote::{RemoteCacheClient, RemoteCacheConfig};

/// What to clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearScope {
    /// Everything, both tiers.
    All,
    /// One entry by exact key.
    Key(String),
    /// All entries whose key contains the substring.
    Pattern(String),
}

/// How many entries each tier actually contained for a clear request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    pub local_removed: usize,
    pub remote_removed: usize,
}

impl ClearOutcome {
    /// Whether either tier contained the target.
    pub fn any(&self) -> bool {
        self.local_removed > 0 || self.remote_removed > 0
    }
}

/// The two-tier cache store.
pub struct TieredCache {
    local: LocalStore,
    remote: Option<RemoteCacheClient>,
}

impl TieredCache {
    pub fn new(local: LocalStore, remote: Option<RemoteCacheClient>) -> Self {
        Self { local, remote }
    }

    /// Build from the SDK-wide configuration: a file-backed local tier
    /// unless persistence is disabled, and a remote tier only for
    /// authenticated callers.
    pub fn from_config(config: &SymulateConfig) -> Self {
        let local = if config.persistent_cache {
            LocalStore::file(config.cache_file_path())
        } else {
            LocalStore::memory()
        };

        let remote = RemoteCacheConfig::from_config(config)
            .and_then(|remote_config| match RemoteCacheClient::new(remote_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "Remote cache tier unavailable");
                    None
                }
            });

        Self::new(local, remote)
    }

    /// Whether a remote tier is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The local tier, for diagnostics and tests.
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Look up an entry: remote tier first when available, local tier on
    /// remote miss or remote error.
    pub async fn get(&self, key: &str, credential_id: Option<&str>) -> Option<CacheEntry> {
        if let Some(remote) = &self.remote {
            match remote.get(key, credential_id).await {
                Ok(Some(entry)) => return Some(entry),
                Ok(None) => {}
                Err(e) => {
                    warn!(cache_key = key, error = %e, "Remote cache read failed, falling back to local");
                }
            }
        }
        self.local.get(key)
    }

    /// Store an entry: always local, best-effort remote.
    pub async fn put(&self, key: &str, entry: CacheEntry) {
        self.local.put(key, entry.clone());
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.put(&entry).await {
                warn!(cache_key = key, error = %e, "Remote cache write failed");
            }
        }
        debug!(cache_key = key, "Cache SET");
    }

    /// Clear entries from both tiers independently.
    pub async fn clear(&self, scope: ClearScope) -> ClearOutcome {
        let local_removed = match &scope {
            ClearScope::All => self.local.clear_all(),
            ClearScope::Key(key) => usize::from(self.local.remove(key)),
            ClearScope::Pattern(pattern) => self.local.remove_pattern(pattern),
        };

        let remote_removed = match &self.remote {
            None => 0,
            Some(remote) => {
                let result = match &scope {
                    ClearScope::All => remote.delete_all().await,
                    ClearScope::Key(key) => remote.delete(key).await.map(u64::from),
                    ClearScope::Pattern(pattern) => remote.delete_pattern(pattern).await,
                };
                match result {
                    Ok(count) => count as usize,
                    Err(e) => {
                        warn!(error = %e, "Remote cache clear failed");
                        0
                    }
                }
            }
        };

        let outcome = ClearOutcome {
            local_removed,
            remote_removed,
        };
        debug!(
            local_removed = outcome.local_removed,
            remote_removed = outcome.remote_removed,
            "Cache CLEAR"
        );
        outcome
    }
}
