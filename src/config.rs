use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crumbscope_repos::{FEATURE_CUSTOM_SYMBOL_SOURCES, SCOPE_PROJECT_WRITE};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "crumbscope.toml";
/// Fallback for `api.token`
pub const TOKEN_ENV: &str = "CRUMBSCOPE_API_TOKEN";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub access: AccessConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Use the HTTP client against this API root when set
    pub base_url: Option<String>,
    pub token: Option<String>,
    /// Offline project document used without `base_url`
    pub project_file: PathBuf,
    pub organization: String,
    pub project: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            project_file: PathBuf::from("project.json"),
            organization: "default".to_string(),
            project: "default".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub features: Vec<String>,
    pub scopes: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            features: vec![FEATURE_CUSTOM_SYMBOL_SOURCES.to_string()],
            scopes: vec![SCOPE_PROJECT_WRITE.to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub relative_time: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            relative_time: false,
        }
    }
}

impl Config {
    /// Load `path`, or the default file if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default().with_env());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config.with_env())
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn with_env(mut self) -> Self {
        if self.api.token.is_none() {
            self.api.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        }
        self
    }
}
