//! Stable cache keys for generation requests.
//!
//! A generation request is canonicalized (mapping keys recursively sorted,
//! arrays kept in order), serialized, digested, folded into a fixed-width
//! integer, and rendered base-36. Value-equal requests always yield the
//! same key regardless of field insertion order; a changed leaf yields a
//! different key with overwhelming probability.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::config::GenerationMode;
use crate::endpoint::HttpMethod;
use crate::error::Result;

/// Hash input for one generation request. Derived per call, never
/// persisted on its own. Optional fields absent from the request are
/// skipped during serialization, so partially specified requests hash
/// without error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Schema rendered as human-readable type text.
    pub type_description: String,
    pub sample_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    pub path: String,
    pub generation_mode: GenerationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_params: Option<Value>,
    /// Included only when regenerate-on-config-change is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<HttpMethod>,
    /// Included only when regenerate-on-config-change is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_delay_ms: Option<u64>,
}

/// Compute the stable cache key for a generation request.
pub fn cache_key(request: &GenerationRequest) -> Result<String> {
    let value = serde_json::to_value(request)?;
    Ok(key_of_value(&value))
}

/// Canonicalize and hash an arbitrary JSON value.
pub fn key_of_value(value: &Value) -> String {
    let canonical = canonicalize(value).to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    let mut folded = [0u8; 8];
    folded.copy_from_slice(&digest[..8]);
    to_base36(u64::from_be_bytes(folded))
}

/// Recursively sort mapping keys; arrays keep their order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (k, v) in entries {
                out.insert(k.clone(), canonicalize(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.iter().rev().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            type_description: "{ id: uuid, name: person-full-name }".to_string(),
            sample_count: 3,
            instruction: Some("realistic names".to_string()),
            path: "/api/users".to_string(),
            generation_mode: GenerationMode::Auto,
            call_params: Some(json!({"limit": 10})),
            http_method: Some(HttpMethod::Get),
            mock_delay_ms: None,
        }
    }

    #[test]
    fn same_request_same_key() {
        assert_eq!(cache_key(&request()).unwrap(), cache_key(&request()).unwrap());
    }

    #[test]
    fn key_is_base36() {
        let key = cache_key(&request()).unwrap();
        assert!(!key.is_empty());
        assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn key_order_independent() {
        let a = json!({"alpha": 1, "beta": {"x": true, "y": [1, 2]}});
        let b = json!({"beta": {"y": [1, 2], "x": true}, "alpha": 1});
        assert_eq!(key_of_value(&a), key_of_value(&b));
    }

    #[test]
    fn array_order_matters() {
        let a = json!({"items": [1, 2, 3]});
        let b = json!({"items": [3, 2, 1]});
        assert_ne!(key_of_value(&a), key_of_value(&b));
    }

    #[test]
    fn leaf_change_changes_key() {
        let base = cache_key(&request()).unwrap();

        let mut changed = request();
        changed.sample_count = 4;
        assert_ne!(base, cache_key(&changed).unwrap());

        let mut changed = request();
        changed.instruction = Some("grumpy names".to_string());
        assert_ne!(base, cache_key(&changed).unwrap());

        let mut changed = request();
        changed.generation_mode = GenerationMode::Faker;
        assert_ne!(base, cache_key(&changed).unwrap());
    }

    #[test]
    fn missing_optional_fields_tolerated() {
        let req = GenerationRequest {
            type_description: "uuid".to_string(),
            sample_count: 1,
            instruction: None,
            path: "/api/ids".to_string(),
            generation_mode: GenerationMode::Faker,
            call_params: None,
            http_method: None,
            mock_delay_ms: None,
        };
        let key = cache_key(&req).unwrap();
        assert!(!key.is_empty());
    }

    #[test]
    fn hash_gated_fields_affect_key() {
        let with_method = cache_key(&request()).unwrap();

        let mut without_method = request();
        without_method.http_method = None;
        assert_ne!(with_method, cache_key(&without_method).unwrap());
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u64::MAX), "3w5e11264sgsf");
    }
}
