//! Remote AI generation client.
//!
//! Calls the hosted generation service, parses usage headers, and feeds
//! the [`QuotaTracker`]. Implements [`GenerationBackend`] so the resolver
//! only ever sees the trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use symulate_core::traits::{GenerationBackend, GenerationSpec, SessionStore};
use symulate_core::{defaults, Error, Result, SymulateConfig};

use crate::quota::QuotaTracker;

/// Request header carrying the API key.
pub const HEADER_API_KEY: &str = "x-api-key";

/// Request header carrying the resolved project identity.
pub const HEADER_PROJECT_ID: &str = "x-project-id";

/// Response header: tokens consumed by this request.
pub const HEADER_TOKENS_USED: &str = "tokens-used";

/// Response header: tokens remaining for the credential.
pub const HEADER_TOKENS_REMAINING: &str = "tokens-remaining";

/// Response header: token limit for the credential.
pub const HEADER_TOKENS_LIMIT: &str = "tokens-limit";

/// Response header: whether the service answered from its own cache.
pub const HEADER_CACHED: &str = "cached";

/// Configuration for the remote generation client.
#[derive(Debug, Clone)]
pub struct RemoteGenConfig {
    /// Generation service URL.
    pub generation_url: String,
    /// API key; required before any request is attempted.
    pub api_key: Option<String>,
    /// Explicit project identity; takes priority over the session store.
    pub project_id: Option<String>,
    /// Preferred content language.
    pub language: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for RemoteGenConfig {
    fn default() -> Self {
        Self {
            generation_url: defaults::GENERATION_URL.to_string(),
            api_key: None,
            project_id: None,
            language: None,
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RemoteGenConfig {
    /// Derive from the SDK-wide configuration.
    pub fn from_config(config: &SymulateConfig) -> Self {
        Self {
            generation_url: config.generation_url.clone(),
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            language: config.language.clone(),
            timeout_seconds: config.timeout_seconds,
        }
    }
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    schema: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instruction: Option<&'a str>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Deserialize, Default)]
struct ServiceErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    tokens_used: Option<u64>,
    #[serde(default)]
    tokens_limit: Option<u64>,
}

/// Client for the hosted generation service.
pub struct RemoteGenerationClient {
    client: Client,
    config: RemoteGenConfig,
    quota: Arc<QuotaTracker>,
    session: Option<Arc<dyn SessionStore>>,
}

impl RemoteGenerationClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteGenConfig, quota: Arc<QuotaTracker>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            quota,
            session: None,
        })
    }

    /// Attach a session store used to resolve the project identity when
    /// the configuration carries none.
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RemoteGenConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config.api_key.as_deref().ok_or_else(|| {
            Error::Config(
                "AI generation requires an API key. Set SYMULATE_API_KEY or pass \
                 api_key in the configuration."
                    .to_string(),
            )
        })
    }

    fn resolved_project_id(&self) -> Result<String> {
        if let Some(id) = &self.config.project_id {
            return Ok(id.clone());
        }
        if let Some(session) = &self.session {
            if let Some(id) = session.project_id() {
                return Ok(id);
            }
        }
        Err(Error::Config(
            "No project selected for AI generation. Set SYMULATE_PROJECT_ID or select \
             a project with `symulate project use <id>`."
                .to_string(),
        ))
    }

    fn header_u64(response: &reqwest::Response, name: &str) -> Option<u64> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    async fn request(&self, spec: &GenerationSpec) -> Result<Value> {
        let api_key = self.api_key()?.to_string();
        let project_id = self.resolved_project_id()?;

        let body = GenerateBody {
            schema: &spec.type_description,
            instruction: spec.instruction.as_deref(),
            count: spec.count,
            language: spec
                .language
                .as_deref()
                .or(self.config.language.as_deref()),
        };

        debug!(
            count = spec.count,
            has_instruction = spec.instruction.is_some(),
            "Requesting AI generation"
        );

        let response = self
            .client
            .post(&self.config.generation_url)
            .header(HEADER_API_KEY, &api_key)
            .header(HEADER_PROJECT_ID, &project_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::RemoteGeneration {
                status: None,
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body: ServiceErrorBody = response.json().await.unwrap_or_default();
            return Err(Error::RemoteAuth(
                body.error
                    .unwrap_or_else(|| "API key rejected by the generation service".to_string()),
            ));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body: ServiceErrorBody = response.json().await.unwrap_or_default();
            self.quota
                .mark_exceeded(&api_key, body.tokens_used, body.tokens_limit);
            return Err(Error::RemoteQuota {
                used: body.tokens_used,
                limit: body.tokens_limit,
            });
        }

        if !status.is_success() {
            let body: ServiceErrorBody = response.json().await.unwrap_or_default();
            return Err(Error::RemoteGeneration {
                status: Some(status.as_u16()),
                message: body
                    .error
                    .unwrap_or_else(|| format!("Generation service returned {}", status)),
            });
        }

        let used = Self::header_u64(&response, HEADER_TOKENS_USED);
        let remaining = Self::header_u64(&response, HEADER_TOKENS_REMAINING);
        let limit = Self::header_u64(&response, HEADER_TOKENS_LIMIT);
        let cached = response
            .headers()
            .get(HEADER_CACHED)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if let (Some(remaining), Some(limit)) = (remaining, limit) {
            self.quota.update_status(&api_key, remaining, limit);
        }

        debug!(
            tokens_used = ?used,
            tokens_remaining = ?remaining,
            cached,
            "AI generation complete"
        );

        let payload: Value = response.json().await.map_err(|e| Error::RemoteGeneration {
            status: None,
            message: format!("Failed to parse generation response: {}", e),
        })?;

        Ok(payload)
    }
}

#[async_trait]
impl GenerationBackend for RemoteGenerationClient {
    async fn generate(&self, spec: &GenerationSpec) -> Result<Value> {
        let result = self.request(spec).await;
        if let Err(e) = &result {
            warn!(error = %e, "AI generation failed");
        }
        result
    }

    fn name(&self) -> &str {
        "ai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use symulate_core::schema::{PrimitiveKind, SchemaNode};
    use symulate_core::StaticSession;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn spec() -> GenerationSpec {
        GenerationSpec::new(
            SchemaNode::object(vec![("id", SchemaNode::primitive(PrimitiveKind::Uuid))]),
            2,
        )
        .with_instruction("realistic ids")
    }

    fn client_for(server: &MockServer, quota: Arc<QuotaTracker>) -> RemoteGenerationClient {
        let config = RemoteGenConfig {
            generation_url: format!("{}/v1/generate", server.uri()),
            api_key: Some("sk-test".to_string()),
            project_id: Some("proj_1".to_string()),
            language: None,
            timeout_seconds: 5,
        };
        RemoteGenerationClient::new(config, quota).expect("client")
    }

    #[tokio::test]
    async fn success_returns_payload_and_updates_quota() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .and(header(HEADER_API_KEY, "sk-test"))
            .and(header(HEADER_PROJECT_ID, "proj_1"))
            .and(body_partial_json(json!({"count": 2, "instruction": "realistic ids"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(HEADER_TOKENS_USED, "12")
                    .insert_header(HEADER_TOKENS_REMAINING, "988")
                    .insert_header(HEADER_TOKENS_LIMIT, "1000")
                    .set_body_json(json!([{"id": "a"}, {"id": "b"}])),
            )
            .mount(&server)
            .await;

        let quota = Arc::new(QuotaTracker::new());
        let client = client_for(&server, quota.clone());

        let value = client.generate(&spec()).await.expect("success");
        assert_eq!(value, json!([{"id": "a"}, {"id": "b"}]));

        let state = quota.state("sk-test").expect("quota updated");
        assert!(!state.exceeded);
        assert_eq!(state.tokens_remaining, Some(988));
        assert_eq!(state.tokens_limit, Some(1000));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_remote_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad key"})))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(QuotaTracker::new()));
        let err = client.generate(&spec()).await.unwrap_err();
        match err {
            Error::RemoteAuth(msg) => assert_eq!(msg, "bad key"),
            other => panic!("Expected RemoteAuth, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn quota_exceeded_marks_tracker() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"tokens_used": 1000, "tokens_limit": 1000})),
            )
            .mount(&server)
            .await;

        let quota = Arc::new(QuotaTracker::new());
        let client = client_for(&server, quota.clone());

        let err = client.generate(&spec()).await.unwrap_err();
        match err {
            Error::RemoteQuota { used, limit } => {
                assert_eq!(used, Some(1000));
                assert_eq!(limit, Some(1000));
            }
            other => panic!("Expected RemoteQuota, got {:?}", other),
        }
        assert!(quota.is_exceeded("sk-test"));
    }

    #[tokio::test]
    async fn server_error_maps_to_remote_generation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(QuotaTracker::new()));
        let err = client.generate(&spec()).await.unwrap_err();
        match err {
            Error::RemoteGeneration { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "boom");
            }
            other => panic!("Expected RemoteGeneration, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        let config = RemoteGenConfig::default();
        let client = RemoteGenerationClient::new(config, Arc::new(QuotaTracker::new())).unwrap();
        let err = client.generate(&spec()).await.unwrap_err();
        match err {
            Error::Config(msg) => assert!(msg.contains("SYMULATE_API_KEY")),
            other => panic!("Expected Config, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_project_is_config_error_with_remediation() {
        let config = RemoteGenConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let client = RemoteGenerationClient::new(config, Arc::new(QuotaTracker::new())).unwrap();
        let err = client.generate(&spec()).await.unwrap_err();
        match err {
            Error::Config(msg) => assert!(msg.contains("symulate project use")),
            other => panic!("Expected Config, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn session_store_supplies_project_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header(HEADER_PROJECT_ID, "proj_from_session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let config = RemoteGenConfig {
            generation_url: format!("{}/v1/generate", server.uri()),
            api_key: Some("sk-test".to_string()),
            project_id: None,
            language: None,
            timeout_seconds: 5,
        };
        let client = RemoteGenerationClient::new(config, Arc::new(QuotaTracker::new()))
            .unwrap()
            .with_session(Arc::new(StaticSession::new(Some(
                "proj_from_session".to_string(),
            ))));

        let value = client.generate(&spec()).await.expect("success");
        assert_eq!(value, json!({"ok": true}));
    }
}
