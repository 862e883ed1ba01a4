//! The stored cache record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cached generation result.
///
/// Created on a generation miss, read on every call, never mutated —
/// only replaced wholesale when cleared or regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The generated value-tree, returned verbatim on hits.
    pub template: Value,
    pub timestamp: DateTime<Utc>,
    /// The cache key this entry was stored under.
    pub schema_hash: String,
}

impl CacheEntry {
    pub fn new(template: Value, schema_hash: impl Into<String>) -> Self {
        Self {
            template,
            timestamp: Utc::now(),
            schema_hash: schema_hash.into(),
        }
    }
}
