//! Configuration from environment variables.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Top-level DraftShield configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// HTTP server port.
    pub port: u16,
    /// Base URL of the local model endpoint (Ollama-compatible).
    pub model_base_url: String,
    /// Model id used for PII detection (L1).
    pub detect_model: String,
    /// Model id used for the semantic audit (L3).
    pub audit_model: String,
    /// Per-request timeout for model calls, in seconds. Short and fail-fast
    /// so an unreachable detector degrades to the regex fallback instead of
    /// stalling the run.
    pub request_timeout_secs: u64,
    /// Maximum accepted input length in characters.
    pub max_input_chars: usize,
    /// TTL for raw event payloads (seconds).
    pub event_ttl_secs: u64,
    /// TTL for token↔value mappings (seconds).
    pub mapping_ttl_secs: u64,
    /// TTL for per-event verdict status records (seconds).
    pub verdict_ttl_secs: u64,
    /// TTL for approval token hashes (seconds).
    pub approval_ttl_secs: u64,
    /// Default anonymization retry budget (callers may request up to 3).
    pub max_retries: u32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            model_base_url: "http://127.0.0.1:11434".into(),
            detect_model: "ministral:3b".into(),
            audit_model: "ministral:3b".into(),
            request_timeout_secs: 10,
            max_input_chars: 20_000,
            event_ttl_secs: 3600,
            mapping_ttl_secs: 900,
            verdict_ttl_secs: 3600,
            approval_ttl_secs: 3600,
            max_retries: 2,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ShieldConfig {
    /// Create configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            port: env_or("DRAFTSHIELD_PORT", defaults.port),
            model_base_url: std::env::var("DRAFTSHIELD_MODEL_URL")
                .unwrap_or(defaults.model_base_url),
            detect_model: std::env::var("DRAFTSHIELD_DETECT_MODEL")
                .unwrap_or(defaults.detect_model),
            audit_model: std::env::var("DRAFTSHIELD_AUDIT_MODEL")
                .unwrap_or(defaults.audit_model),
            request_timeout_secs: env_or(
                "DRAFTSHIELD_MODEL_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            max_input_chars: env_or("DRAFTSHIELD_MAX_INPUT_CHARS", defaults.max_input_chars),
            event_ttl_secs: env_or("DRAFTSHIELD_EVENT_TTL_SECS", defaults.event_ttl_secs),
            mapping_ttl_secs: env_or("DRAFTSHIELD_MAPPING_TTL_SECS", defaults.mapping_ttl_secs),
            verdict_ttl_secs: env_or("DRAFTSHIELD_VERDICT_TTL_SECS", defaults.verdict_ttl_secs),
            approval_ttl_secs: env_or(
                "DRAFTSHIELD_APPROVAL_TTL_SECS",
                defaults.approval_ttl_secs,
            ),
            max_retries: env_or("DRAFTSHIELD_MAX_RETRIES", defaults.max_retries),
        };

        info!(
            port = config.port,
            detect_model = %config.detect_model,
            audit_model = %config.audit_model,
            timeout_secs = config.request_timeout_secs,
            "configuration loaded"
        );

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShieldConfig::default();
        assert_eq!(config.mapping_ttl_secs, 900);
        assert_eq!(config.max_retries, 2);
        assert!(config.request_timeout_secs <= 30);
    }
}
