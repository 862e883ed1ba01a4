//! Remote cache tier.
//!
//! A generic key/value REST resource scoped by user and, when set, by
//! project. A remote hit also fires a detached hit-count increment whose
//! failure never fails the read.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use symulate_core::{Error, Result, SymulateConfig};

use crate::entry::CacheEntry;

/// Request header carrying the API key.
pub const HEADER_API_KEY: &str = "x-api-key";

/// Configuration for the remote cache client.
#[derive(Debug, Clone)]
pub struct RemoteCacheConfig {
    /// Remote cache resource URL.
    pub cache_api_url: String,
    /// API key; the remote tier only exists for authenticated callers.
    pub api_key: String,
    /// Project scope; falls back to user-or-null scope when unset.
    pub project_id: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl RemoteCacheConfig {
    /// Derive from the SDK-wide configuration; `None` when unauthenticated.
    pub fn from_config(config: &SymulateConfig) -> Option<Self> {
        config.api_key.as_ref().map(|api_key| Self {
            cache_api_url: config.cache_api_url.clone(),
            api_key: api_key.clone(),
            project_id: config.project_id.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }
}

/// Wire shape of one remote cache record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCacheRecord {
    pub schema_hash: String,
    pub template: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub hit_count: u64,
}

#[derive(Deserialize, Default)]
struct DeleteResponse {
    #[serde(default)]
    deleted: u64,
}

/// Client for the remote key/value cache resource.
pub struct RemoteCacheClient {
    client: Client,
    config: RemoteCacheConfig,
}

impl RemoteCacheClient {
    pub fn new(config: RemoteCacheConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn scope_params(&self) -> Vec<(&'static str, String)> {
        match &self.config.project_id {
            Some(project_id) => vec![("project_id", project_id.clone())],
            None => Vec::new(),
        }
    }

    /// Fetch the entry stored under `schema_hash`, optionally further
    /// filtered by credential id. A hit fires a detached hit-count
    /// increment.
    pub async fn get(
        &self,
        schema_hash: &str,
        credential_id: Option<&str>,
    ) -> Result<Option<CacheEntry>> {
        let mut params = self.scope_params();
        params.push(("schema_hash", schema_hash.to_string()));
        if let Some(id) = credential_id {
            params.push(("api_key_id", id.to_string()));
        }

        let response = self
            .client
            .get(&self.config.cache_api_url)
            .header(HEADER_API_KEY, &self.config.api_key)
            .query(&params)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(cache_key = schema_hash, tier = "remote", "Cache MISS");
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "Remote cache returned {}",
                response.status()
            )));
        }

        let record: Option<RemoteCacheRecord> = response.json().await?;
        match record {
            Some(record) => {
                debug!(cache_key = schema_hash, tier = "remote", "Cache HIT");
                self.spawn_hit_increment(record.schema_hash.clone());
                Ok(Some(CacheEntry {
                    template: record.template,
                    timestamp: record.created_at,
                    schema_hash: record.schema_hash,
                }))
            }
            None => {
                debug!(cache_key = schema_hash, tier = "remote", "Cache MISS");
                Ok(None)
            }
        }
    }

    /// Upsert one entry (POST-with-merge on the resource).
    pub async fn put(&self, entry: &CacheEntry) -> Result<()> {
        let record = RemoteCacheRecord {
            schema_hash: entry.schema_hash.clone(),
            template: entry.template.clone(),
            user_id: None,
            api_key_id: None,
            project_id: self.config.project_id.clone(),
            created_at: entry.timestamp,
            hit_count: 0,
        };

        let response = self
            .client
            .post(&self.config.cache_api_url)
            .header(HEADER_API_KEY, &self.config.api_key)
            .query(&[("merge", "true")])
            .json(&record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "Remote cache write returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Delete the entry stored under `schema_hash`; true when one existed.
    pub async fn delete(&self, schema_hash: &str) -> Result<bool> {
        let mut params = self.scope_params();
        params.push(("schema_hash", schema_hash.to_string()));
        Ok(self.delete_by(&params).await? > 0)
    }

    /// Delete every entry whose key contains `pattern`; returns how many.
    pub async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let mut params = self.scope_params();
        params.push(("pattern", pattern.to_string()));
        self.delete_by(&params).await
    }

    /// Delete everything in scope; returns how many.
    pub async fn delete_all(&self) -> Result<u64> {
        let params = self.scope_params();
        self.delete_by(&params).await
    }

    async fn delete_by(&self, params: &[(&'static str, String)]) -> Result<u64> {
        let response = self
            .client
            .delete(&self.config.cache_api_url)
            .header(HEADER_API_KEY, &self.config.api_key)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "Remote cache delete returned {}",
                response.status()
            )));
        }

        let body: DeleteResponse = response.json().await.unwrap_or_default();
        Ok(body.deleted)
    }

    // Detached task: the read path never waits on, or fails from, the
    // hit counter.
    fn spawn_hit_increment(&self, schema_hash: String) {
        let client = self.client.clone();
        let url = format!("{}/hit", self.config.cache_api_url.trim_end_matches('/'));
        let api_key = self.config.api_key.clone();
        tokio::spawn(async move {
            let result = client
                .post(&url)
                .header(HEADER_API_KEY, &api_key)
                .json(&serde_json::json!({ "schema_hash": schema_hash }))
                .send()
                .await;
            if let Err(e) = result {
                debug!(error = %e, "Hit-count increment failed");
            }
        });
    }
}
