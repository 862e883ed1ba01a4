//! Structured logging schema and field name constants for symulate.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by standardized names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Unexpected failure surfaced to the caller |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, registry changes |
//! | DEBUG | Decision points: mode selection, cache hit/miss, key derivation |
//! | TRACE | Per-field generation detail |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Endpoint registry key, e.g. "GET /api/users/:id".
pub const ENDPOINT: &str = "endpoint";

/// Subsystem originating the log event.
/// Values: "sdk", "gen", "cache", "core"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "invoke", "generate", "forward", "clear"
pub const OPERATION: &str = "op";

// ─── Resolution fields ─────────────────────────────────────────────────────

/// Derived cache key for the current invocation.
pub const CACHE_KEY: &str = "cache_key";

/// Resolved generation mode: "ai", "faker", "auto".
pub const MODE: &str = "mode";

/// Cache tier touched by an operation: "local", "remote".
pub const TIER: &str = "tier";

/// Number of samples requested from a generator.
pub const SAMPLE_COUNT: &str = "sample_count";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// HTTP status code from a remote call.
pub const STATUS: &str = "status";

/// Remaining generation tokens reported by the service.
pub const TOKENS_REMAINING: &str = "tokens_remaining";

/// Generation token limit reported by the service.
pub const TOKENS_LIMIT: &str = "tokens_limit";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean cache-hit indicator.
pub const CACHED: &str = "cached";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize a compact tracing subscriber filtered by `RUST_LOG`.
///
/// Opt-in convenience for host applications and examples; returns quietly
/// if a subscriber is already installed.
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .try_init();
}
