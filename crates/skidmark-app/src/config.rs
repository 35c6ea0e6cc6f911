// Configuration loading and parsing (skidmark.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use skidmark_core::DEFAULT_BATCH_SIZE;
use skidmark_llm::client::{
    ANTHROPIC_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use skidmark_llm::LlmSettings;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "SKIDMARK_CONFIG_DIR";

/// Environment variable consulted when credentials.toml has no key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub llm: LlmConfig,
    pub batching: BatchingConfig,
    pub server: ServerConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Settings for building the generation client.
    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.credentials.anthropic_api_key.clone(),
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
            api_url: self.llm.api_url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// skidmark.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire skidmark.toml file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SkidmarkFile {
    llm: LlmConfig,
    batching: BatchingConfig,
    server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub api_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    /// Teams per generation call.
    pub batch_size: usize,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `skidmark.toml` and (optionally)
/// `credentials.toml` inside `config_dir`. Both files are optional.
pub fn load_config_from(config_dir: &Path) -> Result<Config, ConfigError> {
    let env_key = std::env::var(API_KEY_ENV).ok();
    load_config_with_env(config_dir, env_key)
}

/// Convenience wrapper: loads config from `$SKIDMARK_CONFIG_DIR`, or
/// `./config` under the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            // An explicit override must point at something real.
            if !dir.is_dir() {
                return Err(ConfigError::FileNotFound { path: dir });
            }
            dir
        }
        None => std::env::current_dir()
            .map_err(|_| ConfigError::FileNotFound {
                path: PathBuf::from("."),
            })?
            .join("config"),
    };
    load_config_from(&config_dir)
}

fn load_config_with_env(
    config_dir: &Path,
    env_key: Option<String>,
) -> Result<Config, ConfigError> {
    // --- skidmark.toml (optional) ---
    let settings_path = config_dir.join("skidmark.toml");
    let file: SkidmarkFile = if settings_path.exists() {
        let text = read_file(&settings_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: settings_path.clone(),
            source: e,
        })?
    } else {
        SkidmarkFile::default()
    };

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let mut credentials: CredentialsConfig = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };
    credentials.anthropic_api_key = resolve_api_key(credentials.anthropic_api_key, env_key);

    let config = Config {
        llm: file.llm,
        batching: file.batching,
        server: file.server,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// The credentials file wins over the environment; blank values count as
/// absent.
fn resolve_api_key(from_file: Option<String>, from_env: Option<String>) -> Option<String> {
    let non_blank = |key: Option<String>| {
        key.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    };
    non_blank(from_file).or_else(|| non_blank(from_env))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "llm.model".into(),
            message: "must not be empty".into(),
        });
    }

    if config.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".into(),
            message: "must be greater than 0".into(),
        });
    }

    let temp = config.llm.temperature;
    if !(0.0..=1.0).contains(&temp) {
        return Err(ConfigError::ValidationError {
            field: "llm.temperature".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {temp}"),
        });
    }

    if config.batching.batch_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "batching.batch_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
