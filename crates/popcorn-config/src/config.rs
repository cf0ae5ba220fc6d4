use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Environment variable that takes precedence over `omdb.api_key`.
pub const API_KEY_ENV: &str = "POPCORN_OMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Trimmed queries shorter than this never hit the network.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetailConfig {
    #[serde(default)]
    pub reselect_policy: ReselectPolicy,
}

/// What happens to an in-flight detail request when another movie is selected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReselectPolicy {
    /// Cancel it; only the newest selection can commit.
    #[default]
    CancelStale,
    /// Let it run; whichever response lands last becomes the open movie.
    LastResponseWins,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_watched_key")]
    pub watched_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
}

fn default_base_url() -> String {
    DEFAULT_OMDB_BASE_URL.to_string()
}

fn default_min_query_len() -> usize {
    3
}

fn default_watched_key() -> String {
    "watched".to_string()
}

fn default_title() -> String {
    "usePopcorn".to_string()
}

fn default_max_rating() -> u8 {
    10
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watched_key: default_watched_key(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            max_rating: default_max_rating(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            debug!("Using OMDb API key from {}", API_KEY_ENV);
            self.omdb.api_key = key;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "omdb.api_key is not set (run `popcorn config set-key` or export {})",
                API_KEY_ENV
            ));
        }
        if self.omdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("omdb.base_url cannot be empty"));
        }
        if self.search.min_query_len == 0 {
            return Err(anyhow::anyhow!("search.min_query_len must be at least 1"));
        }
        if self.ui.max_rating == 0 {
            return Err(anyhow::anyhow!("ui.max_rating must be at least 1"));
        }
        if self.storage.watched_key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.watched_key cannot be empty"));
        }
        Ok(())
    }

    pub fn is_api_key_configured(&self) -> bool {
        !self.omdb.api_key.trim().is_empty()
    }

    /// API key with everything but the first two characters hidden. Keys of
    /// two characters or fewer are hidden entirely.
    pub fn masked_api_key(&self) -> String {
        let key = self.omdb.api_key.as_str();
        if key.is_empty() {
            return "(not set)".to_string();
        }
        let len = key.chars().count();
        if len <= 2 {
            return "*".repeat(len);
        }
        let visible: String = key.chars().take(2).collect();
        format!("{}{}", visible, "*".repeat(key.chars().count().saturating_sub(2)))
    }
}
