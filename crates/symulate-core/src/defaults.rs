//! Centralized default constants for symulate.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// QUOTA
// =============================================================================

/// Cool-down window after a quota-exceeded response, in seconds. Once it
/// elapses the remote generation path is presumptively retried.
pub const QUOTA_COOLDOWN_SECS: u64 = 60;

/// Remaining-quota ratio below which a low-quota warning is emitted.
pub const QUOTA_WARN_RATIO: f64 = 0.10;

// =============================================================================
// GENERATION
// =============================================================================

/// Minimum length for generated arrays (inclusive).
pub const ARRAY_LEN_MIN: usize = 3;

/// Maximum length for generated arrays (inclusive).
pub const ARRAY_LEN_MAX: usize = 5;

/// Lower bound for generated numbers (inclusive).
pub const NUMBER_MIN: i64 = 1;

/// Upper bound for generated numbers (inclusive).
pub const NUMBER_MAX: i64 = 1000;

/// Sample count used when an endpoint declares none.
pub const SAMPLE_COUNT: usize = 1;

// =============================================================================
// CACHE
// =============================================================================

/// Default local cache file name, relative to the working directory.
pub const CACHE_FILE: &str = ".symulate-cache.json";

// =============================================================================
// SERVICE ENDPOINTS
// =============================================================================

/// Default hosted generation service URL.
pub const GENERATION_URL: &str = "https://api.symulate.dev/v1/generate";

/// Default remote cache resource URL.
pub const CACHE_API_URL: &str = "https://api.symulate.dev/v1/cache";

/// Default usage-tracking endpoint URL.
pub const TRACKING_URL: &str = "https://api.symulate.dev/v1/usage";

/// Default HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_bounds_ordered() {
        const {
            assert!(ARRAY_LEN_MIN <= ARRAY_LEN_MAX);
            assert!(ARRAY_LEN_MIN > 0);
        }
    }

    #[test]
    fn number_bounds_ordered() {
        const {
            assert!(NUMBER_MIN < NUMBER_MAX);
        }
    }

    #[test]
    fn quota_warn_ratio_is_a_ratio() {
        assert!(QUOTA_WARN_RATIO > 0.0 && QUOTA_WARN_RATIO < 1.0);
    }

    #[test]
    fn cache_file_is_hidden_json() {
        assert!(CACHE_FILE.starts_with('.'));
        assert!(CACHE_FILE.ends_with(".json"));
    }
}
