//! Endpoint registry.
//!
//! An explicit registry object owned by the hosting application (or by a
//! [`Symulate`](crate::Symulate) instance) rather than process-wide
//! mutable state, so tests instantiate a fresh one per run. Keyed
//! `"{METHOD} {path}"`, lifetime = owner's lifetime, no eviction.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{info, warn};

use symulate_core::endpoint::EndpointDefinition;

/// Registry of declared endpoint definitions.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    endpoints: Mutex<HashMap<String, EndpointDefinition>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its `"{METHOD} {path}"` key. Returns
    /// the key. Registering the same key twice replaces the definition.
    pub fn register(&self, def: EndpointDefinition) -> String {
        let key = def.registry_key();
        let mut endpoints = self.endpoints.lock().unwrap_or_else(|e| e.into_inner());
        if endpoints.insert(key.clone(), def).is_some() {
            warn!(endpoint = %key, "Endpoint re-registered, replacing previous definition");
        } else {
            info!(endpoint = %key, "Registered endpoint");
        }
        key
    }

    /// Fetch a definition by key.
    pub fn get(&self, key: &str) -> Option<EndpointDefinition> {
        self.endpoints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// All registered keys, sorted for stable listings.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .endpoints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Stamp the declaring source file on a registered definition.
    /// Returns false when the key is unknown.
    pub fn stamp_source_file(&self, key: &str, file: &str) -> bool {
        let mut endpoints = self.endpoints.lock().unwrap_or_else(|e| e.into_inner());
        match endpoints.get_mut(key) {
            Some(def) => {
                def.stamp_source_file(file);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symulate_core::endpoint::HttpMethod;

    #[test]
    fn register_and_get() {
        let registry = EndpointRegistry::new();
        let key = registry.register(EndpointDefinition::new(HttpMethod::Get, "/api/users/:id"));
        assert_eq!(key, "GET /api/users/:id");
        assert!(registry.get(&key).is_some());
        assert!(registry.get("POST /api/users").is_none());
    }

    #[test]
    fn duplicate_registration_replaces() {
        let registry = EndpointRegistry::new();
        let def = EndpointDefinition::new(HttpMethod::Get, "/api/users");
        registry.register(def.clone());
        registry.register(def.with_mode(symulate_core::endpoint::EndpointMode::Mock));

        assert_eq!(registry.len(), 1);
        let stored = registry.get("GET /api/users").expect("present");
        assert!(stored.mode.is_some());
    }

    #[test]
    fn keys_are_sorted() {
        let registry = EndpointRegistry::new();
        registry.register(EndpointDefinition::new(HttpMethod::Post, "/b"));
        registry.register(EndpointDefinition::new(HttpMethod::Get, "/a"));
        assert_eq!(registry.keys(), vec!["GET /a", "POST /b"]);
    }

    #[test]
    fn stamp_source_file_on_registered_endpoint() {
        let registry = EndpointRegistry::new();
        let key = registry.register(EndpointDefinition::new(HttpMethod::Get, "/api/users"));

        assert!(registry.stamp_source_file(&key, "src/api/users.rs"));
        assert_eq!(
            registry.get(&key).expect("present").source_file.as_deref(),
            Some("src/api/users.rs")
        );
        assert!(!registry.stamp_source_file("GET /nope", "x.rs"));
    }
}
