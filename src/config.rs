//! Optional YAML configuration.
//!
//! Every setting has a built-in default, so the file is only needed to point
//! at a different endpoint, change the article language, or switch models.
//! The search query and page size are not configurable. Credentials are never
//! read from this file; they come from the CLI or the environment.
//!
//! ```yaml
//! news:
//!   language: en
//! gemini:
//!   model: gemini-2.0-flash
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::model::{DEFAULT_MODEL, GEMINI_API_URL};
use crate::source::NEWS_API_URL;

/// NewsAPI request settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    pub endpoint: String,
    pub language: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: NEWS_API_URL.to_string(),
            language: "en".to_string(),
        }
    }
}

/// Gemini settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: GEMINI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub news: NewsConfig,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Parse a YAML document. Missing sections and keys take their defaults;
    /// unknown keys are rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

/// Load the configuration file at `path`, or the defaults when no path is given.
#[instrument(level = "info", skip_all)]
pub async fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(Config::default());
    };
    let yaml = fs::read_to_string(path).await?;
    let config = Config::from_yaml(&yaml)?;
    info!(path = %path.display(), model = %config.gemini.model, "Loaded configuration");
    Ok(config)
}
