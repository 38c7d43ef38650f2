//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::extract::ExtractorConfig;
use crate::intent::IntentParams;
use crate::retrieval::RetrievalConfig;
use crate::storage::{DEFAULT_DATA_DIR, DEFAULT_DB_FILE, DatabaseConfig, resolve_database_path};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "N4L_CONFIG_DIR";

/// N4L configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub intent: IntentParams,
    pub retrieval: RetrievalConfig,
    pub extraction: ExtractorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; relative paths live under `data_dir`
    pub db_path: String,
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_FILE.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            intent: IntentParams::default(),
            retrieval: RetrievalConfig::default(),
            extraction: ExtractorConfig::default(),
        }
    }
}

const KEYS: &[&str] = &[
    "storage.db_path",
    "storage.data_dir",
    "intent.coherence",
    "intent.rho",
    "retrieval.top_k",
    "retrieval.intent_weight",
    "extraction.action_verbs",
    "extraction.causal_verbs",
    "extraction.lead_in_verbs",
    "extraction.provide_verbs",
    "extraction.express_verbs",
    "extraction.relatives",
    "extraction.connectives",
    "extraction.qualifier_prepositions",
];

impl StorageConfig {
    /// Resolved database location
    pub fn database_path(&self) -> PathBuf {
        resolve_database_path(&self.db_path, &self.data_dir)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("n4l")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the config file, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.db_path.trim().is_empty() {
            return Err(invalid("storage.db_path must not be empty"));
        }
        if !(self.intent.coherence.is_finite() && self.intent.coherence > 0.0) {
            return Err(invalid("intent.coherence must be greater than 0"));
        }
        if !self.intent.rho.is_finite() {
            return Err(invalid("intent.rho must be a finite number"));
        }
        self.retrieval.validate()?;
        Ok(())
    }

    /// Database settings for the configured path
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::with_path(self.storage.database_path())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "storage.db_path" => Ok(self.storage.db_path.clone()),
            "storage.data_dir" => Ok(self.storage.data_dir.clone()),

            "intent.coherence" => Ok(self.intent.coherence.to_string()),
            "intent.rho" => Ok(self.intent.rho.to_string()),

            "retrieval.top_k" => Ok(self.retrieval.top_k.to_string()),
            "retrieval.intent_weight" => Ok(self.retrieval.intent_weight.to_string()),

            _ => match self.word_list(key) {
                Some(words) => Ok(words.join(", ")),
                None => Err(unknown_key(key)),
            },
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "storage.db_path" => {
                if value.trim().is_empty() {
                    return Err(invalid("storage.db_path must not be empty"));
                }
                self.storage.db_path = value.to_string();
            }
            "storage.data_dir" => {
                self.storage.data_dir = value.to_string();
            }

            "intent.coherence" => {
                let coherence: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid coherence value: {}", value))?;
                if !(coherence.is_finite() && coherence > 0.0) {
                    return Err(invalid("Coherence must be greater than 0"));
                }
                self.intent.coherence = coherence;
            }
            "intent.rho" => {
                let rho: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid rho value: {}", value))?;
                if !rho.is_finite() {
                    return Err(invalid("Rho must be a finite number"));
                }
                self.intent.rho = rho;
            }

            "retrieval.top_k" => {
                let top_k: usize = value
                    .parse()
                    .with_context(|| format!("Invalid top_k value: {}", value))?;
                if top_k == 0 {
                    return Err(invalid("top_k must be at least 1"));
                }
                self.retrieval.top_k = top_k;
            }
            "retrieval.intent_weight" => {
                let weight: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid intent_weight value: {}", value))?;
                if !(weight.is_finite() && weight >= 0.0) {
                    return Err(invalid("intent_weight must be non-negative"));
                }
                self.retrieval.intent_weight = weight;
            }

            _ => {
                let words = self.word_list_mut(key).ok_or_else(|| unknown_key(key))?;
                *words = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
        Ok(())
    }

    /// All configuration keys
    pub fn keys() -> &'static [&'static str] {
        KEYS
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        KEYS.iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }

    fn word_list(&self, key: &str) -> Option<&Vec<String>> {
        let e = &self.extraction;
        Some(match key {
            "extraction.action_verbs" => &e.action_verbs,
            "extraction.causal_verbs" => &e.causal_verbs,
            "extraction.lead_in_verbs" => &e.lead_in_verbs,
            "extraction.provide_verbs" => &e.provide_verbs,
            "extraction.express_verbs" => &e.express_verbs,
            "extraction.relatives" => &e.relatives,
            "extraction.connectives" => &e.connectives,
            "extraction.qualifier_prepositions" => &e.qualifier_prepositions,
            _ => return None,
        })
    }

    fn word_list_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        let e = &mut self.extraction;
        Some(match key {
            "extraction.action_verbs" => &mut e.action_verbs,
            "extraction.causal_verbs" => &mut e.causal_verbs,
            "extraction.lead_in_verbs" => &mut e.lead_in_verbs,
            "extraction.provide_verbs" => &mut e.provide_verbs,
            "extraction.express_verbs" => &mut e.express_verbs,
            "extraction.relatives" => &mut e.relatives,
            "extraction.connectives" => &mut e.connectives,
            "extraction.qualifier_prepositions" => &mut e.qualifier_prepositions,
            _ => return None,
        })
    }
}

fn invalid(message: &str) -> anyhow::Error {
    Error::ConfigError(message.to_string()).into()
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(
        "Unknown configuration key: {}. Use `n4l config list` to see available keys.",
        key
    )
}
