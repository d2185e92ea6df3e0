use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{llm::groq, provider::openweather};

pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const OPENWEATHER_API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const GROQ_MODEL_VAR: &str = "GROQ_MODEL";
pub const GROQ_BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const OPENWEATHER_BASE_URL_VAR: &str = "OPENWEATHER_BASE_URL";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// groq_api_key = "..."
/// openweather_api_key = "..."
/// model = "llama-3.3-70b-versatile"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub groq_base_url: Option<String>,
    pub openweather_base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Config file merged with the process environment; the environment wins.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Override fields from `lookup`. Empty values count as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(GROQ_API_KEY_VAR) {
            self.groq_api_key = Some(v);
        }
        if let Some(v) = get(OPENWEATHER_API_KEY_VAR) {
            self.openweather_api_key = Some(v);
        }
        if let Some(v) = get(GROQ_MODEL_VAR) {
            self.model = Some(v);
        }
        if let Some(v) = get(GROQ_BASE_URL_VAR) {
            self.groq_base_url = Some(v);
        }
        if let Some(v) = get(OPENWEATHER_BASE_URL_VAR) {
            self.openweather_base_url = Some(v);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-chat")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn groq_api_key(&self) -> Result<&str> {
        non_empty(self.groq_api_key.as_deref()).ok_or_else(|| missing_key(GROQ_API_KEY_VAR))
    }

    pub fn openweather_api_key(&self) -> Result<&str> {
        non_empty(self.openweather_api_key.as_deref())
            .ok_or_else(|| missing_key(OPENWEATHER_API_KEY_VAR))
    }

    /// Fails with a hint naming every missing key.
    pub fn require_keys(&self) -> Result<()> {
        match (self.groq_api_key(), self.openweather_api_key()) {
            (Ok(_), Ok(_)) => Ok(()),
            (Err(_), Err(_)) => Err(anyhow!(
                "API keys not found! Set {GROQ_API_KEY_VAR} and {OPENWEATHER_API_KEY_VAR} \
                 in your environment or `.env` file.\n\
                 Hint: copy `.env.example` to `.env`, or run `weather-chat configure`."
            )),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    pub fn model(&self) -> &str {
        non_empty(self.model.as_deref()).unwrap_or(groq::DEFAULT_MODEL)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn groq_base_url(&self) -> &str {
        non_empty(self.groq_base_url.as_deref()).unwrap_or(groq::DEFAULT_BASE_URL)
    }

    pub fn openweather_base_url(&self) -> &str {
        non_empty(self.openweather_base_url.as_deref()).unwrap_or(openweather::DEFAULT_BASE_URL)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_key(var: &str) -> anyhow::Error {
    anyhow!(
        "No API key configured: {var} is not set.\n\
         Hint: add {var}=... to your `.env` file, or run `weather-chat configure`."
    )
}
