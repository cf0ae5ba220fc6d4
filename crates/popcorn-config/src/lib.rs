pub mod config;
pub mod paths;

pub use config::{Config, DetailConfig, OmdbConfig, ReselectPolicy, SearchConfig, StorageConfig, UiConfig, API_KEY_ENV, DEFAULT_OMDB_BASE_URL};
pub use paths::{PathManager, home_override};
