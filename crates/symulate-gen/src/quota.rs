//! Per-credential quota state for the remote generation path.
//!
//! Tracks whether an API key is currently rate-limited, with a fixed
//! cool-down before the remote path is presumptively retried. In-memory,
//! process-lifetime state; nothing persists across restarts.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use symulate_core::defaults;

/// Quota snapshot for one API key.
#[derive(Debug, Clone)]
pub struct QuotaState {
    pub exceeded: bool,
    pub last_checked: Instant,
    pub tokens_remaining: Option<u64>,
    pub tokens_limit: Option<u64>,
}

/// Per-credential quota state machine.
///
/// `Unknown` (no record) → `Exceeded` (after a 429) → exceeded persists
/// until the cool-down window elapses, after which a fresh attempt is
/// allowed → a successful call with usage headers transitions back to
/// normal.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    states: Mutex<HashMap<String, QuotaState>>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the remote path is currently blocked for this key.
    ///
    /// Pure read; owns the cool-down arithmetic. Once the window has
    /// elapsed the key is presumptively retryable even though the state
    /// still records the last exhaustion.
    pub fn is_exceeded(&self, id: &str) -> bool {
        let states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        match states.get(id) {
            None => false,
            Some(state) if !state.exceeded => false,
            Some(state) => {
                let cooldown = Duration::from_secs(defaults::QUOTA_COOLDOWN_SECS);
                if state.last_checked.elapsed() >= cooldown {
                    debug!(op = "quota_check", "Cool-down elapsed, allowing remote retry");
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Record a quota-exceeded response for this key.
    pub fn mark_exceeded(&self, id: &str, used: Option<u64>, limit: Option<u64>) {
        let remaining = match (used, limit) {
            (Some(u), Some(l)) => Some(l.saturating_sub(u)),
            _ => None,
        };
        warn!(tokens_limit = ?limit, "AI generation quota exceeded, cooling down");
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.insert(
            id.to_string(),
            QuotaState {
                exceeded: true,
                last_checked: Instant::now(),
                tokens_remaining: remaining,
                tokens_limit: limit,
            },
        );
    }

    /// Record the usage counters from a successful remote call. Clears the
    /// exceeded flag and warns when remaining quota runs low.
    pub fn update_status(&self, id: &str, remaining: u64, limit: u64) {
        if limit > 0 && (remaining as f64) < (limit as f64) * defaults::QUOTA_WARN_RATIO {
            warn!(
                tokens_remaining = remaining,
                tokens_limit = limit,
                "Remaining AI generation quota is low"
            );
        }
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.insert(
            id.to_string(),
            QuotaState {
                exceeded: false,
                last_checked: Instant::now(),
                tokens_remaining: Some(remaining),
                tokens_limit: Some(limit),
            },
        );
    }

    /// Drop state for one key, or all keys when `id` is `None`.
    pub fn clear(&self, id: Option<&str>) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        match id {
            Some(id) => {
                states.remove(id);
            }
            None => states.clear(),
        }
    }

    /// Current snapshot for a key, if one exists.
    pub fn state(&self, id: &str) -> Option<QuotaState> {
        let states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.get(id).cloned()
    }
}
