//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use learnscape_core::traits::{ExamEvaluator, QuestionGenerator};

use crate::gemini::GeminiEvaluator;
use crate::openai::OpenAiEvaluator;

/// Configuration for a single evaluation provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                model,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                model,
                base_url,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Top-level learnscape configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnscapeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Directory where graded submissions are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./submissions")
}

impl Default for LearnscapeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            output_dir: default_output_dir(),
        }
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

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            model,
            base_url,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            model: model.clone(),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            model,
            base_url,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            model: model.clone(),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `learnscape.toml` in the current directory
/// 2. `~/.config/learnscape/config.toml`
///
/// Environment variable overrides: `LEARNSCAPE_GEMINI_KEY`,
/// `LEARNSCAPE_OPENAI_KEY`.
pub fn load_config() -> Result<LearnscapeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LearnscapeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("learnscape.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LearnscapeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LearnscapeConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("LEARNSCAPE_GEMINI_KEY") {
        config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                model: None,
                base_url: None,
            });
        if let Some(ProviderConfig::Gemini { api_key, .. }) = config.providers.get_mut("gemini") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("LEARNSCAPE_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                model: None,
                base_url: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("learnscape"))
}

/// Create an exam evaluator from its configuration.
pub fn create_evaluator(config: &ProviderConfig) -> Result<Box<dyn ExamEvaluator>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            model,
            base_url,
        } => Ok(Box::new(GeminiEvaluator::new(
            api_key,
            model.clone(),
            base_url.clone(),
        ))),
        ProviderConfig::OpenAI {
            api_key,
            model,
            base_url,
        } => Ok(Box::new(OpenAiEvaluator::new(
            api_key,
            model.clone(),
            base_url.clone(),
        ))),
    }
}

/// Create a question generator from its configuration.
pub fn create_generator(config: &ProviderConfig) -> Result<Box<dyn QuestionGenerator>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            model,
            base_url,
        } => Ok(Box::new(GeminiEvaluator::new(
            api_key,
            model.clone(),
            base_url.clone(),
        ))),
        ProviderConfig::OpenAI {
            api_key,
            model,
            base_url,
        } => Ok(Box::new(OpenAiEvaluator::new(
            api_key,
            model.clone(),
            base_url.clone(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_LEARNSCAPE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_LEARNSCAPE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_LEARNSCAPE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_LEARNSCAPE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = LearnscapeConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert!(config.providers.is_empty());
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
[providers.gemini]
type = "gemini"
api_key = "sk-test"
model = "gemini-2.0-flash"

[providers.openai]
type = "openai"
api_key = "sk-openai"

default_provider = "gemini"
"#;
        let config: LearnscapeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.providers.get("gemini"),
            Some(ProviderConfig::Gemini { .. })
        ));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            model: None,
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnscape.toml");
        std::fs::write(
            &path,
            r#"
default_provider = "openai"

[providers.openai]
type = "openai"
api_key = "sk-test"
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.providers.len(), 1);
    }

    #[test]
    fn load_config_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
