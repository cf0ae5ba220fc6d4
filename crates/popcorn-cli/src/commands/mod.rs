pub mod clear;
pub mod config;
pub mod prompts;
pub mod search;
pub mod show;
pub mod watched;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use popcorn_config::{Config, PathManager};
use popcorn_core::{FileStorage, KeyValueStorage, NoopTitle, Session, TitleSink, WatchedList};
use popcorn_sources::{MovieDatabase, OmdbClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Paths and config shared by every command.
pub struct Context {
    pub paths: PathManager,
    config_override: Option<PathBuf>,
}

impl Context {
    pub fn new(config_override: Option<PathBuf>) -> Self {
        Self {
            paths: PathManager::default(),
            config_override,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_override
            .clone()
            .unwrap_or_else(|| self.paths.config_file())
    }

    /// Config file (or defaults) with environment overrides applied.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_file();
        let mut config = Config::load_or_default(&path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like `load_config`, but refuses to go on without a usable API key.
    pub fn load_validated_config(&self) -> Result<Config> {
        let config = self.load_config()?;
        config.validate().map_err(|e| eyre!("{}", e))?;
        Ok(config)
    }

    pub fn storage(&self) -> Result<Arc<dyn KeyValueStorage>> {
        let storage = FileStorage::new(self.paths.storage_dir())
            .map_err(|e| eyre!("{}", e))
            .wrap_err("Failed to open watched list storage")?;
        Ok(Arc::new(storage))
    }

    pub fn watched_list(&self, config: &Config) -> Result<WatchedList> {
        Ok(WatchedList::load(self.storage()?, config.storage.watched_key.clone()))
    }

    pub fn database(&self, config: &Config) -> Arc<dyn MovieDatabase> {
        Arc::new(OmdbClient::from_config(&config.omdb))
    }

    /// A session for one-shot commands; nothing shows a title.
    pub fn session(&self, config: &Config) -> Result<Session> {
        self.session_with_title(config, Arc::new(NoopTitle))
    }

    pub fn session_with_title(&self, config: &Config, title: Arc<dyn TitleSink>) -> Result<Session> {
        Ok(Session::new(self.database(config), self.storage()?, title, config))
    }
}
