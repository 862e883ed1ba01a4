//! Endpoint resolver: the per-invocation decision engine.
//!
//! Given an endpoint definition and call-time parameters, decides whether
//! to mock or forward, derives the cache key, probes the cache, selects a
//! generation strategy, persists the result, and returns the value-tree.
//!
//! Two invocations for the same cache key issued concurrently are not
//! deduplicated: both may miss and both may generate, with a last-write-
//! wins race on the cache entry. Acceptable for regenerable mock data.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use symulate_cache::{CacheEntry, ClearOutcome, ClearScope, TieredCache};
use symulate_core::endpoint::{EndpointDefinition, EndpointMode, ParamLocation};
use symulate_core::hash::{cache_key, GenerationRequest};
use symulate_core::schema::SchemaNode;
use symulate_core::traits::{GenerationBackend, GenerationSpec, SessionStore};
use symulate_core::{Environment, Error, GenerationMode, Result, SymulateConfig};
use symulate_gen::{Generator, QuotaTracker, RemoteGenConfig, RemoteGenerationClient};

use crate::forward::BackendForwarder;
use crate::interpolate::interpolate;
use crate::registry::EndpointRegistry;
use crate::tracking::UsageTracker;

// =============================================================================
// SDK ENTRY POINT
// =============================================================================

struct ResolverContext {
    config: SymulateConfig,
    cache: TieredCache,
    quota: Arc<QuotaTracker>,
    ai_backend: Arc<dyn GenerationBackend>,
    tracker: UsageTracker,
}

/// Builder for a [`Symulate`] instance.
pub struct SymulateBuilder {
    config: SymulateConfig,
    session: Option<Arc<dyn SessionStore>>,
    backend: Option<Arc<dyn GenerationBackend>>,
    tracker: Option<UsageTracker>,
    cache: Option<TieredCache>,
}

impl SymulateBuilder {
    /// Attach a session store used to resolve the project identity when
    /// the configuration carries none.
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Replace the AI generation backend (test seam).
    pub fn generation_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replace the usage tracker.
    pub fn usage_tracker(mut self, tracker: UsageTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Replace the cache store.
    pub fn cache(mut self, cache: TieredCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<Symulate> {
        let quota = Arc::new(QuotaTracker::new());

        let ai_backend: Arc<dyn GenerationBackend> = match self.backend {
            Some(backend) => backend,
            None => {
                let mut client = RemoteGenerationClient::new(
                    RemoteGenConfig::from_config(&self.config),
                    Arc::clone(&quota),
                )?;
                if let Some(session) = self.session {
                    client = client.with_session(session);
                }
                Arc::new(client)
            }
        };

        let tracker = self
            .tracker
            .unwrap_or_else(|| UsageTracker::from_config(&self.config));

        let cache = self
            .cache
            .unwrap_or_else(|| TieredCache::from_config(&self.config));

        let ctx = ResolverContext {
            cache,
            quota,
            ai_backend,
            tracker,
            config: self.config,
        };

        Ok(Symulate {
            ctx: Arc::new(ctx),
            registry: EndpointRegistry::new(),
        })
    }
}

/// The symulate SDK instance: owns the configuration, the cache, the quota
/// tracker, and the endpoint registry.
pub struct Symulate {
    ctx: Arc<ResolverContext>,
    registry: EndpointRegistry,
}

impl Symulate {
    /// Create an instance from the given configuration.
    pub fn new(config: SymulateConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building an instance with optional collaborators.
    pub fn builder(config: SymulateConfig) -> SymulateBuilder {
        SymulateBuilder {
            config,
            session: None,
            backend: None,
            tracker: None,
            cache: None,
        }
    }

    /// Declare an endpoint: registers the definition and returns the
    /// callable handle. The declaring source file is stamped for
    /// diagnostics.
    #[track_caller]
    pub fn endpoint(&self, mut def: EndpointDefinition) -> MockEndpoint {
        def.stamp_source_file(std::panic::Location::caller().file());
        self.registry.register(def.clone());
        MockEndpoint {
            def: Arc::new(def),
            ctx: Arc::clone(&self.ctx),
        }
    }

    /// The endpoint registry.
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &SymulateConfig {
        &self.ctx.config
    }

    /// The quota tracker.
    pub fn quota(&self) -> &QuotaTracker {
        &self.ctx.quota
    }

    /// Clear cached entries from both tiers.
    pub async fn clear_cache(&self, scope: ClearScope) -> ClearOutcome {
        self.ctx.cache.clear(scope).await
    }
}

// =============================================================================
// ENDPOINT HANDLE
// =============================================================================

/// Callable handle for one declared endpoint.
#[derive(Clone)]
pub struct MockEndpoint {
    def: Arc<EndpointDefinition>,
    ctx: Arc<ResolverContext>,
}

impl MockEndpoint {
    /// The underlying definition.
    pub fn definition(&self) -> &EndpointDefinition {
        &self.def
    }

    /// Invoke the endpoint with optional call-time parameters.
    ///
    /// Linear per-call state machine: validate → mode decision →
    /// [forced error | forward | mock]; mock → preconditions → key
    /// derivation → cache probe → [hit | generate → cache write] → return.
    pub async fn invoke(&self, params: Option<Map<String, Value>>) -> Result<Value> {
        self.validate(params.as_ref())?;

        let mock = match self.def.mode {
            Some(EndpointMode::Mock) => true,
            Some(EndpointMode::Production) => false,
            None => self.ctx.config.environment == Environment::Development,
        };

        if !mock {
            let forwarder = BackendForwarder::from_config(&self.ctx.config)?;
            return forwarder.forward(&self.def, params.as_ref()).await;
        }

        self.mock(params).await
    }

    // Every declared non-path required parameter must be present. The
    // error lists every offender, not just the first.
    fn validate(&self, params: Option<&Map<String, Value>>) -> Result<()> {
        let missing: Vec<String> = self
            .def
            .params
            .iter()
            .filter(|p| {
                p.required && p.location != ParamLocation::Path && !self.def.is_path_param(&p.name)
            })
            .filter(|p| params.map_or(true, |m| !m.contains_key(&p.name)))
            .map(|p| p.name.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { missing })
        }
    }

    async fn mock(&self, params: Option<Map<String, Value>>) -> Result<Value> {
        // Forced-error short-circuit: no generation, no caching, no
        // usage recording. The first force-triggered error wins.
        if let Some(error_spec) = self.def.errors.iter().find(|e| e.force_trigger) {
            let data = match &error_spec.schema {
                Some(schema) => Generator::new(self.ctx.config.seed).generate(schema, 1),
                None => json!({
                    "error": error_spec
                        .description
                        .clone()
                        .unwrap_or_else(|| format!("Simulated {} error", error_spec.status)),
                }),
            };
            debug!(
                endpoint = %self.def.registry_key(),
                status = error_spec.status,
                "Raising forced error"
            );
            return Err(Error::Simulated {
                status: error_spec.status,
                data,
            });
        }

        // Mocking preconditions. The API key gate applies uniformly,
        // local generation included.
        let api_key = self.ctx.config.api_key.clone().ok_or_else(|| {
            Error::Config(
                "Mock endpoints require an API key, even for local generation. Set \
                 SYMULATE_API_KEY or run `symulate login`."
                    .to_string(),
            )
        })?;
        let schema = self.def.response_schema.clone().ok_or_else(|| {
            Error::Config(format!(
                "Endpoint {} declares no response schema to generate from. Add a \
                 response schema to the endpoint definition.",
                self.def.registry_key()
            ))
        })?;

        let instruction = self
            .def
            .instruction()
            .map(|template| interpolate(template, params.as_ref()));
        let request = GenerationRequest {
            type_description: schema.type_description(),
            sample_count: self.def.sample_count(),
            instruction: instruction.clone(),
            path: self.def.path.clone(),
            generation_mode: self.ctx.config.generation_mode,
            call_params: params.clone().map(Value::Object),
            http_method: self
                .ctx
                .config
                .regenerate_on_config_change
                .then_some(self.def.method),
            mock_delay_ms: if self.ctx.config.regenerate_on_config_change {
                self.def.mock_delay_ms()
            } else {
                None
            },
        };
        let key = cache_key(&request)?;

        // A cache hit replays the configured artificial delay and
        // returns the stored template verbatim.
        if self.ctx.config.cache_enabled {
            if let Some(entry) = self.ctx.cache.get(&key, Some(&api_key)).await {
                if let Some(delay_ms) = self.def.mock_delay_ms() {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                debug!(
                    endpoint = %self.def.registry_key(),
                    cache_key = %key,
                    "Serving cached template"
                );
                return Ok(entry.template);
            }
        }

        let value = self.generate(&schema, instruction, &api_key).await?;

        if self.ctx.config.cache_enabled {
            self.ctx
                .cache
                .put(&key, CacheEntry::new(value.clone(), &key))
                .await;
        }

        Ok(value)
    }

    async fn generate(
        &self,
        schema: &SchemaNode,
        instruction: Option<String>,
        api_key: &str,
    ) -> Result<Value> {
        let count = self.def.sample_count();
        match self.ctx.config.generation_mode {
            GenerationMode::Faker => Ok(self.faker_generate(schema, count)),
            GenerationMode::Ai => {
                let spec = self.generation_spec(schema, instruction, count);
                self.ctx.ai_backend.generate(&spec).await
            }
            GenerationMode::Auto => {
                if self.ctx.quota.is_exceeded(api_key) {
                    debug!(
                        endpoint = %self.def.registry_key(),
                        "Quota exceeded, using local generator"
                    );
                    return Ok(self.faker_generate(schema, count));
                }
                let spec = self.generation_spec(schema, instruction, count);
                match self.ctx.ai_backend.generate(&spec).await {
                    Ok(value) => Ok(value),
                    Err(e) => {
                        warn!(
                            endpoint = %self.def.registry_key(),
                            error = %e,
                            "AI generation failed, falling back to local generator"
                        );
                        Ok(self.faker_generate(schema, count))
                    }
                }
            }
        }
    }

    fn generation_spec(
        &self,
        schema: &SchemaNode,
        instruction: Option<String>,
        count: usize,
    ) -> GenerationSpec {
        GenerationSpec {
            schema: schema.clone(),
            type_description: schema.type_description(),
            instruction,
            count,
            language: self.ctx.config.language.clone(),
        }
    }

    // Every faker-path generation reports usage, detached and
    // best-effort.
    fn faker_generate(&self, schema: &SchemaNode, count: usize) -> Value {
        let value = Generator::new(self.ctx.config.seed).generate(schema, count);
        self.ctx
            .tracker
            .record("faker", &self.def.registry_key(), false);
        value
    }
}
