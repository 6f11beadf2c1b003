//! Configuration management for textlens using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ocr::{DEFAULT_ENDPOINT, DEFAULT_LANGUAGE};

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Session filename under the data directory.
const SESSION_FILENAME: &str = "session.json";

/// OCR endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct OcrConfig {
    /// Parse endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Access credential for the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Recognition language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl OcrConfig {
    /// Check if this is the default (empty) config.
    pub fn is_default(&self) -> bool {
        self.endpoint.is_none() && self.api_key.is_none() && self.language.is_none()
    }
}

/// Row store / identity provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct StoreConfig {
    /// Service base URL. When unset, history lives in process memory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Public api key sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl StoreConfig {
    /// Check if this is the default (empty) config.
    pub fn is_default(&self) -> bool {
        self.url.is_none() && self.api_key.is_none()
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "target")]
    pub data_dir: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// OCR endpoint configuration.
    #[serde(default, skip_serializing_if = "OcrConfig::is_default")]
    #[prefer(default)]
    pub ocr: OcrConfig,
    /// Row store configuration.
    #[serde(default, skip_serializing_if = "StoreConfig::is_default")]
    #[prefer(default)]
    pub store: StoreConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers textlens config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("textlens").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(_) => Self::default(),
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML, YAML, and other formats based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => {
                toml::from_str(&contents).map_err(|e| format!("Failed to parse TOML config: {}", e))?
            }
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref endpoint) = self.ocr.endpoint {
            settings.ocr.endpoint = endpoint.clone();
        }
        if let Some(ref api_key) = self.ocr.api_key {
            settings.ocr.api_key = Some(api_key.clone());
        }
        if let Some(ref language) = self.ocr.language {
            settings.ocr.language = language.clone();
        }
        if let Some(ref url) = self.store.url {
            settings.store.url = Some(url.clone());
        }
        if let Some(ref api_key) = self.store.api_key {
            settings.store.api_key = Some(api_key.clone());
        }
    }
}

/// Resolved OCR endpoint settings.
#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub language: String,
}

/// Resolved store / identity provider settings.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory (session file lives here).
    pub data_dir: PathBuf,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// OCR endpoint settings.
    pub ocr: OcrSettings,
    /// Store settings.
    pub store: StoreSettings,
}

impl Default for Settings {
    fn default() -> Self {
        // Falls back gracefully: platform data dir -> home dir -> current dir
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("textlens");

        Self {
            data_dir,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            ocr: OcrSettings {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                api_key: None,
                language: DEFAULT_LANGUAGE.to_string(),
            },
            store: StoreSettings {
                url: None,
                api_key: None,
            },
        }
    }
}

impl Settings {
    /// Full path to the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILENAME)
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }

    /// Check that configured service URLs actually parse as URLs.
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.ocr.endpoint)
            .map_err(|e| format!("invalid OCR endpoint '{}': {}", self.ocr.endpoint, e))?;
        if let Some(ref url) = self.store.url {
            Url::parse(url).map_err(|e| format!("invalid store URL '{}': {}", url, e))?;
        }
        Ok(())
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
    /// Data directory override (--target flag).
    pub data: Option<PathBuf>,
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = if let Some(ref config_path) = options.config_path {
        Config::load_from_path(config_path)
            .await
            .unwrap_or_default()
    } else {
        Config::load().await
    };

    let mut settings = Settings::default();

    // Determine base directory for resolving relative paths
    let base_dir = if options.use_cwd {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else {
        config
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    };

    config.apply_to_settings(&mut settings, &base_dir);

    // --target override takes precedence for the data directory
    if let Some(ref data) = options.data {
        settings.data_dir = if data.is_absolute() {
            data.clone()
        } else {
            base_dir.join(data)
        };
    }

    // Environment variables take highest precedence
    if let Some(key) = env_var("OCR_API_KEY") {
        tracing::debug!("Using OCR_API_KEY from environment");
        settings.ocr.api_key = Some(key);
    }
    if let Some(endpoint) = env_var("OCR_ENDPOINT") {
        tracing::debug!("Using OCR_ENDPOINT from environment: {}", endpoint);
        settings.ocr.endpoint = endpoint;
    }
    if let Some(language) = env_var("OCR_LANGUAGE") {
        settings.ocr.language = language;
    }
    if let Some(url) = env_var("STORE_URL") {
        tracing::debug!("Using STORE_URL from environment: {}", url);
        settings.store.url = Some(url);
    }
    if let Some(key) = env_var("STORE_API_KEY") {
        tracing::debug!("Using STORE_API_KEY from environment");
        settings.store.api_key = Some(key);
    }

    (settings, config)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_config() {
        let toml_src = r#"
            data_dir = "/var/lib/textlens"
            request_timeout = 60

            [ocr]
            api_key = "k-123"
            language = "deu"

            [store]
            url = "https://store.example.com"
            api_key = "anon"
        "#;

        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("/var/lib/textlens"));
        assert_eq!(config.request_timeout, Some(60));
        assert_eq!(config.ocr.language.as_deref(), Some("deu"));
        assert_eq!(config.store.url.as_deref(), Some("https://store.example.com"));
    }

    #[test]
    fn test_apply_to_settings_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "state"

            [ocr]
            endpoint = "https://ocr.example.com/parse"
        "#,
        )
        .unwrap();

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/etc/textlens"));

        assert_eq!(settings.data_dir, PathBuf::from("/etc/textlens/state"));
        assert_eq!(settings.ocr.endpoint, "https://ocr.example.com/parse");
        // Untouched fields keep their defaults.
        assert_eq!(settings.ocr.language, DEFAULT_LANGUAGE);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut settings = Settings::default();
        settings.store.url = Some("not a url".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_session_path_under_data_dir() {
        let settings = Settings::default();
        assert_eq!(
            settings.session_path(),
            settings.data_dir.join("session.json")
        );
    }

    #[test]
    fn test_resolve_path_absolute_untouched() {
        let config = Config::default();
        assert_eq!(
            config.resolve_path("/abs/path", Path::new("/base")),
            PathBuf::from("/abs/path")
        );
        assert_eq!(
            config.resolve_path("rel/path", Path::new("/base")),
            PathBuf::from("/base/rel/path")
        );
    }
}
