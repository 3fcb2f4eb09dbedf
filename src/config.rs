//! Configuration file parser for ~/.config/brief/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields`
//! off), though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
///
/// The custom Debug impl masks `backend_api_key` to prevent secret leakage
/// in logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-Agent header sent on every outbound request.
    pub user_agent: String,

    /// Per-request timeout in seconds, applied to every network call.
    pub request_timeout_secs: u64,

    /// Freshness window for the feed cache in seconds. 0 disables caching.
    pub feed_cache_ttl_secs: u64,

    /// Maximum number of feeds held in the cache.
    pub feed_cache_capacity: usize,

    /// Extracted text shorter than this (in characters) is reported as too
    /// thin to summarize instead of being sent to the backend.
    pub min_summary_input_chars: usize,

    /// Extracted article text is truncated to this many characters.
    pub max_article_chars: usize,

    /// Endpoint of the summarization backend.
    pub backend_url: String,

    /// Backend API key (alternative to the BRIEF_BACKEND_API_KEY env var).
    /// Env var takes precedence over config file.
    pub backend_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: concat!("brief/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
            feed_cache_ttl_secs: 3600,
            feed_cache_capacity: 64,
            min_summary_input_chars: 100,
            max_article_chars: 15_000,
            backend_url: "http://127.0.0.1:8787/v1/summaries".to_string(),
            backend_api_key: None,
        }
    }
}

/// Mask backend_api_key in Debug output to prevent secret leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("feed_cache_ttl_secs", &self.feed_cache_ttl_secs)
            .field("feed_cache_capacity", &self.feed_cache_capacity)
            .field("min_summary_input_chars", &self.min_summary_input_chars)
            .field("max_article_chars", &self.max_article_chars)
            .field("backend_url", &self.backend_url)
            .field(
                "backend_api_key",
                &self.backend_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted or
        // maliciously large config file into memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "user_agent",
                "request_timeout_secs",
                "feed_cache_ttl_secs",
                "feed_cache_capacity",
                "min_summary_input_chars",
                "max_article_chars",
                "backend_url",
                "backend_api_key",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), backend = %config.backend_url, "Loaded configuration");
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.user_agent.starts_with("brief/"));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.feed_cache_ttl_secs, 3600);
        assert_eq!(config.feed_cache_capacity, 64);
        assert_eq!(config.min_summary_input_chars, 100);
        assert_eq!(config.max_article_chars, 15_000);
        assert!(config.backend_api_key.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/brief_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("brief_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_article_chars, 15_000);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("brief_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "max_article_chars = 5000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_article_chars, 5000);
        assert_eq!(config.min_summary_input_chars, 100); // default
        assert_eq!(config.feed_cache_ttl_secs, 3600); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("brief_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
user_agent = "newsbot/2.0"
request_timeout_secs = 10
feed_cache_ttl_secs = 600
feed_cache_capacity = 16
min_summary_input_chars = 250
max_article_chars = 8000
backend_url = "https://summaries.example.com/v1/summaries"
backend_api_key = "test-key-123"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.user_agent, "newsbot/2.0");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.feed_cache_ttl_secs, 600);
        assert_eq!(config.feed_cache_capacity, 16);
        assert_eq!(config.min_summary_input_chars, 250);
        assert_eq!(config.max_article_chars, 8000);
        assert_eq!(config.backend_url, "https://summaries.example.com/v1/summaries");
        assert_eq!(config.backend_api_key.as_deref(), Some("test-key-123"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("brief_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("brief_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
request_timeout_secs = 15
totally_fake_key = "should not fail"
"#;
        std::fs::write(&path, content).unwrap();

        // Should succeed (unknown keys ignored)
        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 15);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = std::env::temp_dir().join("brief_config_test_wrongtype");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        // max_article_chars should be an integer, not a string
        std::fs::write(&path, "max_article_chars = \"lots\"\n").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("brief_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        // Write a file just over 1MB
        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config {
            backend_api_key: Some("super-secret-key-12345".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("super-secret-key-12345"),
            "Debug output should not contain the API key"
        );
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should show [REDACTED] for API key"
        );
    }
}
