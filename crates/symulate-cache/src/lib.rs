//! # symulate-cache
//!
//! Two-tier cache store for symulate.
//!
//! This crate provides:
//! - The [`CacheEntry`] record and its on-disk format
//! - The local tier: a durable JSON file or an in-memory map
//! - The remote tier: a client for the hosted key/value cache resource
//! - [`TieredCache`]: remote-first reads, write-through, scoped clearing

pub mod entry;
pub mod local;
pub mod remote;
pub mod store;

pub use entry::CacheEntry;
pub use local::{FileStore, LocalStore, MemoryStore};
pub use remote::{RemoteCacheClient, RemoteCacheConfig, RemoteCacheRecord};
pub use store::{ClearOutcome, ClearScope, TieredCache};
