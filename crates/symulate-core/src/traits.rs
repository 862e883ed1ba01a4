//! Core traits for symulate abstractions.
//!
//! These traits define the seams between the resolver and its
//! collaborators, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::schema::SchemaNode;

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// Everything a backend needs to synthesize one value-tree.
#[derive(Debug, Clone)]
pub struct GenerationSpec {
    pub schema: SchemaNode,
    /// Schema rendered as human-readable type text.
    pub type_description: String,
    /// Interpolated generation instruction, if any.
    pub instruction: Option<String>,
    /// Number of samples; <= 1 yields a single value.
    pub count: usize,
    /// Preferred content language, if configured.
    pub language: Option<String>,
}

impl GenerationSpec {
    pub fn new(schema: SchemaNode, count: usize) -> Self {
        let type_description = schema.type_description();
        Self {
            schema,
            type_description,
            instruction: None,
            count,
            language: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A source of generated value-trees.
///
/// Implemented by the remote AI client and by test stubs; the resolver
/// only ever sees this trait.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a value-tree for the given spec.
    async fn generate(&self, spec: &GenerationSpec) -> Result<Value>;

    /// Backend identifier for logs.
    fn name(&self) -> &str;
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Persisted-session collaborator: the source of project identity when the
/// configuration carries none. Storage itself is out of scope; the SDK
/// only reads.
pub trait SessionStore: Send + Sync {
    /// Active project identity, if a session has one.
    fn project_id(&self) -> Option<String>;

    /// Active organization identity, if a session has one.
    fn organization_id(&self) -> Option<String> {
        None
    }
}

/// Fixed in-memory session, used by tests and by hosts that resolve
/// identity up front.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    project_id: Option<String>,
    organization_id: Option<String>,
}

impl StaticSession {
    pub fn new(project_id: Option<String>) -> Self {
        Self {
            project_id,
            organization_id: None,
        }
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }
}

impl SessionStore for StaticSession {
    fn project_id(&self) -> Option<String> {
        self.project_id.clone()
    }

    fn organization_id(&self) -> Option<String> {
        self.organization_id.clone()
    }
}
