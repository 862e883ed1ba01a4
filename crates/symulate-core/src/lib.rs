//! # symulate-core
//!
//! Core types, traits, and abstractions for the symulate SDK.
//!
//! This crate provides:
//! - The schema model for generatable values ([`SchemaNode`])
//! - Endpoint definitions and parameter/error specs
//! - The configuration surface ([`SymulateConfig`])
//! - The stable cache-key function ([`cache_key`])
//! - Backend and session traits
//! - The shared error taxonomy and structured-logging field constants

pub mod config;
pub mod defaults;
pub mod endpoint;
pub mod error;
pub mod hash;
pub mod logging;
pub mod schema;
pub mod traits;

pub use config::{Environment, GenerationMode, SymulateConfig};
pub use endpoint::{
    EndpointDefinition, EndpointMode, ErrorSpec, HttpMethod, MockOptions, ParamLocation,
    ParameterSpec,
};
pub use error::{Error, Result};
pub use hash::{cache_key, key_of_value, GenerationRequest};
pub use schema::{PrimitiveKind, SchemaNode};
pub use traits::{GenerationBackend, GenerationSpec, SessionStore, StaticSession};
