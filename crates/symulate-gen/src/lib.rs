//! # symulate-gen
//!
//! Generation backends for symulate.
//!
//! This crate provides:
//! - The deterministic, seedable faker generator
//! - The remote AI generation client with usage-header parsing
//! - The per-credential quota tracker with cool-down
//! - A mock generation backend for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust
//! use symulate_core::schema::{PrimitiveKind, SchemaNode};
//! use symulate_gen::Generator;
//!
//! let schema = SchemaNode::object(vec![
//!     ("id", SchemaNode::primitive(PrimitiveKind::Uuid)),
//!     ("name", SchemaNode::primitive(PrimitiveKind::PersonFullName)),
//! ]);
//! let value = Generator::new(Some(42)).generate(&schema, 1);
//! assert!(value.is_object());
//! ```

pub mod faker;
pub mod quota;
pub mod remote;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use faker::Generator;
pub use quota::{QuotaState, QuotaTracker};
pub use remote::{RemoteGenConfig, RemoteGenerationClient};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerationBackend;
