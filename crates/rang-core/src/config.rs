//! Configuration module
//!
//! Environment-driven configuration for the colorization client and
//! workflow: API base URL and token, upload limits and allow-lists, and the
//! timer periods that drive polling and the simulated progress animation.

use std::env;
use std::path::PathBuf;

// Common constants
const MAX_FILE_SIZE_MB: usize = 10;
const POLL_INTERVAL_MS: u64 = 2000;
const PROGRESS_TICK_MS: u64 = 500;
const SLOW_PROCESSING_AFTER_SECS: u64 = 30;
const HTTP_TIMEOUT_SECS: u64 = 60;

const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp,bmp,tif,tiff,svg";
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/jpg,image/png,image/gif,\
     image/webp,image/bmp,image/tiff,image/svg+xml";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the colorization/stats API.
    pub api_base_url: String,
    /// Bearer token attached to submissions when present.
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    // Upload intake
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    // Workflow timers
    pub poll_interval_ms: u64,
    pub progress_tick_ms: u64,
    /// Elapsed seconds after which a still-running colorization is flagged
    /// as slow in status snapshots.
    pub slow_processing_after_secs: u64,
    // Result presentation
    pub download_dir: PathBuf,
    /// Link included in share payloads.
    pub share_link: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_CONTENT_TYPES.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let config = Config {
            api_base_url: env::var("RANG_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            api_token: env::var("RANG_API_TOKEN").ok().filter(|s| !s.is_empty()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            allowed_content_types,
            poll_interval_ms: env::var("POLL_INTERVAL_MS")
                .unwrap_or_else(|_| POLL_INTERVAL_MS.to_string())
                .parse()
                .unwrap_or(POLL_INTERVAL_MS),
            progress_tick_ms: env::var("PROGRESS_TICK_MS")
                .unwrap_or_else(|_| PROGRESS_TICK_MS.to_string())
                .parse()
                .unwrap_or(PROGRESS_TICK_MS),
            slow_processing_after_secs: env::var("SLOW_PROCESSING_AFTER_SECS")
                .unwrap_or_else(|_| SLOW_PROCESSING_AFTER_SECS.to_string())
                .parse()
                .unwrap_or(SLOW_PROCESSING_AFTER_SECS),
            download_dir: env::var("RANG_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            share_link: env::var("RANG_SHARE_LINK")
                .unwrap_or_else(|_| "https://rang.indrasol.com".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "RANG_API_URL must be an http:// or https:// URL"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("POLL_INTERVAL_MS must be greater than 0"));
        }

        if self.progress_tick_ms == 0 {
            return Err(anyhow::anyhow!("PROGRESS_TICK_MS must be greater than 0"));
        }

        if self.allowed_extensions.is_empty() || self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS and ALLOWED_CONTENT_TYPES must not be empty"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000".to_string(),
            api_token: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .split(',')
                .map(|s| s.to_string())
                .collect(),
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            poll_interval_ms: POLL_INTERVAL_MS,
            progress_tick_ms: PROGRESS_TICK_MS,
            slow_processing_after_secs: SLOW_PROCESSING_AFTER_SECS,
            download_dir: PathBuf::from("."),
            share_link: "https://rang.indrasol.com".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.progress_tick_ms, 500);
        assert_eq!(config.slow_processing_after_secs, 30);
    }

    #[test]
    fn default_allowlists_cover_strict_image_set() {
        let config = Config::default();
        for ct in [
            "image/jpeg",
            "image/jpg",
            "image/png",
            "image/gif",
            "image/webp",
            "image/bmp",
            "image/tiff",
            "image/svg+xml",
        ] {
            assert!(
                config.allowed_content_types.contains(&ct.to_string()),
                "missing {}",
                ct
            );
        }
        assert!(config.allowed_extensions.contains(&"jpeg".to_string()));
        assert!(!config.allowed_content_types.contains(&"text/plain".to_string()));
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let config = Config {
            api_base_url: "ftp://example.com".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let config = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
