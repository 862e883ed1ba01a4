//! # symulate-sdk
//!
//! The endpoint-resolution pipeline for symulate.
//!
//! This crate provides:
//! - [`Symulate`]: the SDK instance owning configuration, cache, quota
//!   state, and the endpoint registry
//! - [`MockEndpoint`]: the callable handle returned for each declared
//!   endpoint, implementing the per-invocation resolution state machine
//! - The backend forward path for production pass-through
//! - Fire-and-forget usage tracking
//! - Instruction placeholder interpolation
//!
//! # Example
//!
//! ```rust,no_run
//! use symulate_core::endpoint::{EndpointDefinition, HttpMethod};
//! use symulate_core::schema::{PrimitiveKind, SchemaNode};
//! use symulate_core::SymulateConfig;
//! use symulate_sdk::Symulate;
//!
//! #[tokio::main]
//! async fn main() -> symulate_core::Result<()> {
//!     let sym = Symulate::new(SymulateConfig::from_env())?;
//!     let users = sym.endpoint(
//!         EndpointDefinition::new(HttpMethod::Get, "/api/users/:id").with_response_schema(
//!             SchemaNode::object(vec![
//!                 ("id", SchemaNode::primitive(PrimitiveKind::Uuid)),
//!                 ("name", SchemaNode::primitive(PrimitiveKind::PersonFullName)),
//!             ]),
//!         ),
//!     );
//!     let user = users.invoke(None).await?;
//!     println!("{user}");
//!     Ok(())
//! }
//! ```

pub mod forward;
pub mod interpolate;
pub mod registry;
pub mod resolver;
pub mod tracking;

// Re-export core types
pub use symulate_core::*;

pub use forward::BackendForwarder;
pub use interpolate::interpolate;
pub use registry::EndpointRegistry;
pub use resolver::{MockEndpoint, Symulate, SymulateBuilder};
pub use tracking::UsageTracker;
