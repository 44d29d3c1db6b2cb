//! Runtime configuration for the classifier boundary and the remote store.
//!
//! Configuration is read from a TOML file (explicit path or the platform
//! config dir), with environment variables overriding the secrets so keys
//! never have to live on disk:
//!
//! - `PANTRY_CHEF_API_KEY` — classifier API key
//! - `PANTRY_CHEF_REMOTE_URL` — remote store base URL
//! - `PANTRY_CHEF_REMOTE_ANON_KEY` — remote store anonymous key

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Settings for the external multimodal classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// API key for the classifier provider.
    #[serde(default)]
    pub api_key: String,
    /// Base endpoint, without a trailing path.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for the analysis round trip.
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used for best-effort illustrative images.
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            image_model: default_image_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for the per-user remote store. Absent when the app runs
/// without remote persistence (everything then stays local-only).
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    /// Load configuration from a TOML file and apply env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let mut config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.apply_env_overrides();
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from the default location, or fall back to an env-only config
    /// if no file exists there.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                let mut config = AppConfig::default();
                config.apply_env_overrides();
                Ok(config)
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PANTRY_CHEF_API_KEY") {
            if !key.is_empty() {
                self.classifier.api_key = key;
            }
        }
        let url = std::env::var("PANTRY_CHEF_REMOTE_URL").ok().filter(|v| !v.is_empty());
        let anon_key = std::env::var("PANTRY_CHEF_REMOTE_ANON_KEY")
            .ok()
            .filter(|v| !v.is_empty());
        match (&mut self.remote, url, anon_key) {
            (Some(remote), url, anon_key) => {
                if let Some(url) = url {
                    remote.url = url;
                }
                if let Some(anon_key) = anon_key {
                    remote.anon_key = anon_key;
                }
            }
            (remote @ None, Some(url), Some(anon_key)) => {
                *remote = Some(RemoteConfig { url, anon_key });
            }
            _ => {}
        }
    }
}

/// Default config file path: `<platform config dir>/pantry-chef/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pantry-chef").join("config.toml"))
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[classifier]
api_key = "test-key"
model = "gemini-3-flash-preview"
timeout_secs = 30

[remote]
url = "https://project.supabase.co"
anon_key = "anon"
"#,
        );

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.classifier.api_key, "test-key");
        assert_eq!(config.classifier.timeout_secs, 30);
        // Unspecified fields fall back to defaults
        assert_eq!(config.classifier.image_model, "gemini-2.5-flash-image");
        let remote = config.remote.unwrap();
        assert_eq!(remote.url, "https://project.supabase.co");
        assert_eq!(remote.anon_key, "anon");
    }

    #[test]
    fn test_load_minimal_config_has_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[classifier]\napi_key = \"k\"\n");

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.classifier.endpoint, "https://generativelanguage.googleapis.com");
        assert_eq!(config.classifier.model, "gemini-3-flash-preview");
        assert_eq!(config.classifier.timeout_secs, 60);
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load(&dir.path().join("nope.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "not [valid toml");
        let result = AppConfig::load(&path);
        assert!(result.is_err());
    }
}
