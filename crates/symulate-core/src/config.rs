//! Configuration surface consumed by the resolution pipeline.
//!
//! All behavior toggles are explicit fields threaded through
//! [`SymulateConfig`] rather than read from ambient process state at call
//! time, so the core stays testable without environment mutation.
//! `from_env` is the one place environment variables are consulted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::defaults;

/// Deployment environment driving the default mock-vs-forward decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Endpoints mock by default.
    Development,
    /// Endpoints forward to the real backend by default.
    Production,
}

impl Environment {
    /// Parse from string (case-insensitive, accepts common short forms).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Generation strategy for mocked endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Remote AI generation; failures surface to the caller.
    Ai,
    /// Local deterministic synthesis.
    Faker,
    /// Try AI, fall back to faker on failure or quota exhaustion.
    Auto,
}

impl GenerationMode {
    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ai" => Some(Self::Ai),
            "faker" => Some(Self::Faker),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ai => write!(f, "ai"),
            Self::Faker => write!(f, "faker"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Configuration for the symulate SDK.
#[derive(Debug, Clone)]
pub struct SymulateConfig {
    /// API key for the hosted generation and cache services. Mocking
    /// requires one regardless of generation mode.
    pub api_key: Option<String>,
    /// Explicit project identity; takes priority over the session store.
    pub project_id: Option<String>,
    /// Base URL of the real backend for pass-through mode.
    pub backend_base_url: Option<String>,
    /// Environment driving the default mock-vs-forward decision.
    pub environment: Environment,
    /// Whether generated results are cached at all.
    pub cache_enabled: bool,
    /// Whether the local tier persists to disk (false = in-memory only).
    pub persistent_cache: bool,
    /// Default generation strategy for endpoints without an override.
    pub generation_mode: GenerationMode,
    /// Seed for the deterministic generator. Repeated runs with the same
    /// seed and schema produce identical output.
    pub seed: Option<u64>,
    /// Preferred language for AI-generated content.
    pub language: Option<String>,
    /// Include HTTP method and mock delay in the cache key so config
    /// changes regenerate cached data.
    pub regenerate_on_config_change: bool,
    /// Override for the local cache file path.
    pub cache_file: Option<PathBuf>,
    /// Hosted generation service URL.
    pub generation_url: String,
    /// Remote cache resource URL.
    pub cache_api_url: String,
    /// Usage-tracking endpoint URL.
    pub tracking_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SymulateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            backend_base_url: None,
            environment: Environment::Development,
            cache_enabled: true,
            persistent_cache: true,
            generation_mode: GenerationMode::Auto,
            seed: None,
            language: None,
            regenerate_on_config_change: true,
            cache_file: None,
            generation_url: defaults::GENERATION_URL.to_string(),
            cache_api_url: defaults::CACHE_API_URL.to_string(),
            tracking_url: defaults::TRACKING_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SymulateConfig {
    /// Load configuration from `SYMULATE_*` environment variables with
    /// fallback to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.api_key = std::env::var("SYMULATE_API_KEY").ok().filter(|s| !s.is_empty());
        config.project_id = std::env::var("SYMULATE_PROJECT_ID").ok().filter(|s| !s.is_empty());
        config.backend_base_url = std::env::var("SYMULATE_BACKEND_URL").ok();

        if let Ok(val) = std::env::var("SYMULATE_ENV") {
            if let Some(env) = Environment::from_str_loose(&val) {
                config.environment = env;
            } else {
                warn!(value = %val, "Invalid SYMULATE_ENV, using default");
            }
        }

        if let Ok(val) = std::env::var("SYMULATE_CACHE") {
            config.cache_enabled = val != "false" && val != "0";
        }

        if let Ok(val) = std::env::var("SYMULATE_PERSISTENT_CACHE") {
            config.persistent_cache = val != "false" && val != "0";
        }

        if let Ok(val) = std::env::var("SYMULATE_MODE") {
            if let Some(mode) = GenerationMode::from_str_loose(&val) {
                config.generation_mode = mode;
            } else {
                warn!(value = %val, "Invalid SYMULATE_MODE, using default");
            }
        }

        if let Ok(val) = std::env::var("SYMULATE_SEED") {
            if let Ok(seed) = val.parse::<u64>() {
                config.seed = Some(seed);
            } else {
                warn!(value = %val, "Invalid SYMULATE_SEED, ignoring");
            }
        }

        config.language = std::env::var("SYMULATE_LANGUAGE").ok();

        if let Ok(val) = std::env::var("SYMULATE_REGENERATE_ON_CONFIG_CHANGE") {
            config.regenerate_on_config_change = val != "false" && val != "0";
        }

        if let Ok(val) = std::env::var("SYMULATE_CACHE_FILE") {
            config.cache_file = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SYMULATE_GENERATION_URL") {
            config.generation_url = val;
        }

        if let Ok(val) = std::env::var("SYMULATE_CACHE_API_URL") {
            config.cache_api_url = val;
        }

        if let Ok(val) = std::env::var("SYMULATE_TRACKING_URL") {
            config.tracking_url = val;
        }

        if let Ok(val) = std::env::var("SYMULATE_TIMEOUT") {
            if let Ok(secs) = val.parse::<u64>() {
                config.timeout_seconds = secs;
            }
        }

        config
    }

    /// Effective local cache file path.
    pub fn cache_file_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::CACHE_FILE))
    }
}
