use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::search::normalize::ImageOptions;

const APP_NAME: &str = "tmdb-lookup";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_LANGUAGE: &str = "en";

/// On-disk configuration file layout. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiSection,
    images: ImageOptions,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ApiSection {
    api_key: Option<String>,
    language: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Resolved application configuration: file values overlaid with
/// environment variables.
#[derive(Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: String,
    pub images: ImageOptions,
}

impl AppConfig {
    /// Load configuration from the config file (if any) and the
    /// environment. Environment variables win over file values.
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)?;
                match toml::from_str::<ConfigFile>(&raw) {
                    Ok(parsed) => {
                        tracing::debug!("Loaded configuration from {}", path.display());
                        parsed
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring malformed config file {}: {}",
                            path.display(),
                            e
                        );
                        ConfigFile::default()
                    }
                }
            }
            _ => ConfigFile::default(),
        };

        let api_key = std::env::var("TMDB_API_KEY").ok().or(file.api.api_key);
        let language = std::env::var("TMDB_LOOKUP_LANG").unwrap_or(file.api.language);

        Ok(Self {
            api_key,
            language,
            images: file.images,
        })
    }

    /// `TMDB_LOOKUP_CONFIG_DIR` overrides the platform config directory;
    /// the current directory is the last resort.
    fn config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("TMDB_LOOKUP_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join(CONFIG_FILENAME));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join(CONFIG_FILENAME))
            .or_else(|| Some(PathBuf::from(CONFIG_FILENAME)))
    }

    pub fn log_config(&self) {
        tracing::info!("Language: {}", self.language);
        tracing::info!("Image base URL: {}", self.images.base_url);
        tracing::info!(
            "API key: {}",
            if self.api_key.is_some() {
                "configured"
            } else {
                "missing"
            }
        );
    }
}
