//! Mock generation backend for deterministic testing.
//!
//! Stands in for the remote AI client in resolver tests: returns a fixed
//! payload or always fails, and records every spec it was asked to
//! generate so tests can assert on call counts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use symulate_core::traits::{GenerationBackend, GenerationSpec};
use symulate_core::{Error, Result};

/// Mock generation backend.
#[derive(Clone)]
pub struct MockGenerationBackend {
    inner: Arc<MockInner>,
}

struct MockInner {
    response: Value,
    failure: Option<String>,
    specs: Mutex<Vec<GenerationSpec>>,
}

impl MockGenerationBackend {
    /// Backend that answers every request with a fixed marker payload.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockInner {
                response: json!({"mock": true}),
                failure: None,
                specs: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Backend that answers every request with `response`.
    pub fn with_response(response: Value) -> Self {
        Self {
            inner: Arc::new(MockInner {
                response,
                failure: None,
                specs: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Backend that fails every request with a remote generation error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                response: Value::Null,
                failure: Some(message.into()),
                specs: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Number of generate calls received.
    pub fn call_count(&self) -> usize {
        self.inner.specs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The most recent spec received, if any.
    pub fn last_spec(&self) -> Option<GenerationSpec> {
        self.inner
            .specs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, spec: &GenerationSpec) -> Result<Value> {
        self.inner
            .specs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(spec.clone());
        match &self.inner.failure {
            Some(message) => Err(Error::RemoteGeneration {
                status: None,
                message: message.clone(),
            }),
            None => Ok(self.inner.response.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symulate_core::schema::{PrimitiveKind, SchemaNode};

    fn spec() -> GenerationSpec {
        GenerationSpec::new(SchemaNode::primitive(PrimitiveKind::Uuid), 1)
    }

    #[tokio::test]
    async fn fixed_response_and_call_log() {
        let backend = MockGenerationBackend::with_response(json!({"id": "fixed"}));
        let value = backend.generate(&spec()).await.unwrap();
        assert_eq!(value, json!({"id": "fixed"}));
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.last_spec().unwrap().count, 1);
    }

    #[tokio::test]
    async fn failing_backend_errors_every_time() {
        let backend = MockGenerationBackend::failing("down for maintenance");
        for _ in 0..3 {
            let err = backend.generate(&spec()).await.unwrap_err();
            match err {
                Error::RemoteGeneration { message, .. } => {
                    assert_eq!(message, "down for maintenance")
                }
                other => panic!("Expected RemoteGeneration, got {:?}", other),
            }
        }
        assert_eq!(backend.call_count(), 3);
    }
}
