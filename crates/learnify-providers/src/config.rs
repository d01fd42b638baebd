//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gemini::GeminiClient;

/// Top-level learnify configuration.
///
/// Note: Custom Debug impl masks the API key to prevent accidental
/// exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct LearnifyConfig {
    /// Gemini API key. Supports `${VAR_NAME}` references.
    #[serde(default)]
    pub api_key: String,
    /// Override for the Gemini endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Generation model.
    #[serde(default = "default_model")]
    pub model: String,
    /// Where the learner roster and progress live.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl std::fmt::Debug for LearnifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnifyConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("store_path", &self.store_path)
            .finish()
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./learnify-data.json")
}

impl Default for LearnifyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: default_model(),
            store_path: default_store_path(),
        }
    }
}

impl LearnifyConfig {
    /// Build a Gemini client from this config.
    pub fn create_client(&self) -> GeminiClient {
        GeminiClient::new(&self.api_key, self.base_url.clone(), Some(self.model.clone()))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or `learnify.toml` in the current
/// directory.
///
/// Environment variable override: `LEARNIFY_API_KEY`.
pub fn load_config(path: Option<&Path>) -> Result<LearnifyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("learnify.toml");
        local.exists().then_some(local)
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LearnifyConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LearnifyConfig::default(),
    };

    if let Ok(key) = std::env::var("LEARNIFY_API_KEY") {
        config.api_key = key;
    }
    config.api_key = resolve_env_vars(&config.api_key);
    if let Some(url) = &config.base_url {
        config.base_url = Some(resolve_env_vars(url));
    }

    Ok(config)
}
