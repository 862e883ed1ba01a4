//! Endpoint definitions: the immutable records describing one mockable
//! route, its parameters, its declared errors, and its mock options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::SchemaNode;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Where a declared parameter travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
}

/// One declared call parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParamLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: false,
            schema: None,
            example: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_schema(mut self, schema: SchemaNode) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }
}

/// One declared error response. With `force_trigger` set, every invocation
/// of the endpoint raises this error instead of generating data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpec {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub force_trigger: bool,
}

impl ErrorSpec {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            schema: None,
            description: None,
            force_trigger: false,
        }
    }

    pub fn with_schema(mut self, schema: SchemaNode) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn force_trigger(mut self) -> Self {
        self.force_trigger = true;
        self
    }
}

/// Mock-generation options for an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockOptions {
    /// Number of samples to generate (<= 1 returns a single value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Generation instruction; `{{param}}` placeholders interpolate
    /// call-time parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    /// Artificial delay replayed on cache hits, to simulate latency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

/// Per-endpoint override of the environment-default mode decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointMode {
    Mock,
    Production,
}

/// Immutable definition of one mockable endpoint.
///
/// Created once by the declaring call and never mutated afterwards, except
/// for a one-time [`stamp_source_file`](Self::stamp_source_file) used for
/// diagnostics and sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Path template with `:name` placeholders, e.g. `/api/users/:id`.
    pub path: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<MockOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParameterSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<EndpointMode>,
    /// Source file that declared this endpoint, stamped after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl EndpointDefinition {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            response_schema: None,
            mock: None,
            params: Vec::new(),
            errors: Vec::new(),
            mode: None,
            source_file: None,
        }
    }

    pub fn with_response_schema(mut self, schema: SchemaNode) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_mock(mut self, mock: MockOptions) -> Self {
        self.mock = Some(mock);
        self
    }

    pub fn with_params(mut self, params: Vec<ParameterSpec>) -> Self {
        self.params = params;
        self
    }

    pub fn with_errors(mut self, errors: Vec<ErrorSpec>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_mode(mut self, mode: EndpointMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Registry key, e.g. `"GET /api/users/:id"`.
    pub fn registry_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Names of the `:name` tokens in the path template.
    pub fn path_param_names(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|seg| seg.strip_prefix(':'))
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Whether `name` appears as a `:name` token in the path template.
    pub fn is_path_param(&self, name: &str) -> bool {
        self.path_param_names().contains(&name)
    }

    /// Stamp the declaring source file. First stamp wins.
    pub fn stamp_source_file(&mut self, file: impl Into<String>) {
        if self.source_file.is_none() {
            self.source_file = Some(file.into());
        }
    }

    /// Declared sample count, defaulting to a single value.
    pub fn sample_count(&self) -> usize {
        self.mock
            .as_ref()
            .and_then(|m| m.count)
            .unwrap_or(crate::defaults::SAMPLE_COUNT)
    }

    /// Declared cache-hit replay delay, if any.
    pub fn mock_delay_ms(&self) -> Option<u64> {
        self.mock.as_ref().and_then(|m| m.delay_ms)
    }

    /// Declared generation instruction, if any.
    pub fn instruction(&self) -> Option<&str> {
        self.mock.as_ref().and_then(|m| m.instruction.as_deref())
    }
}
