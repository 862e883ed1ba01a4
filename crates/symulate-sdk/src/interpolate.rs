//! `{{param}}` placeholder interpolation for generation instructions.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

/// Replace `{{name}}` placeholders in `template` with call-time parameter
/// values. String values interpolate raw; other values interpolate as
/// their JSON rendering. Placeholders with no matching parameter are left
/// verbatim.
pub fn interpolate(template: &str, params: Option<&Map<String, Value>>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match params.and_then(|p| p.get(name)) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
