use std::env;
use std::path::PathBuf;

use lead_wizard::Locale;
use thiserror::Error;

pub const DEFAULT_STORE: &str = "leads.json";
pub const DEFAULT_LOG: &str = "warn";

/// Settings read from the environment (and an optional `.env` file).
#[derive(Debug, Clone, PartialEq)]
pub struct LeadConfig {
    pub store_path: PathBuf,
    pub log_level: String,
    pub locale: Locale,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LEADWIZ_LOCALE: {0}")]
    InvalidLocale(String),
}

impl LeadConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = lookup("LEADWIZ_STORE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        let log_level = lookup("LEADWIZ_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG.to_string());
        let locale = match lookup("LEADWIZ_LOCALE") {
            Some(value) if !value.trim().is_empty() => {
                value.parse().map_err(ConfigError::InvalidLocale)?
            }
            _ => Locale::default(),
        };
        Ok(Self {
            store_path,
            log_level,
            locale,
        })
    }

    /// Store path, with a command-line override taking precedence.
    pub fn store_path_or(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.store_path.clone())
    }
}
