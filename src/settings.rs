use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::pagination::{PageSize, DEFAULT_PAGE_SIZE};

/// Runtime settings, read from `TRIVIA_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub page_size: usize,
}

impl Settings {
    /// Loads `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env(Environment::with_prefix("TRIVIA"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("database_url", "sqlite:trivia.db")?
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("page_size", DEFAULT_PAGE_SIZE as i64)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.page_size == 0 {
            return Err(ConfigError::Message(
                "page_size must be at least 1".to_owned(),
            ));
        }
        Ok(settings)
    }

    pub fn page_size(&self) -> PageSize {
        PageSize(self.page_size)
    }
}
