//! Configuration management for notesearch
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags. The API key is never part of the configuration.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dataset::{ColumnNames, DEFAULT_EMBEDDING_COLUMN, DEFAULT_TEXT_COLUMN};
use crate::provider::{ProviderConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::search::DEFAULT_RESULT_COUNT;

pub const CONFIG_ENV_VAR: &str = "NOTESEARCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Embedding model identifier, must match the model the dataset was built with
  #[serde(default = "default_model")]
  pub model: String,
  /// Base URL of the embeddings API
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Number of results returned when not given on the command line
  #[serde(default = "default_results")]
  pub results: usize,
  #[serde(default = "default_text_column")]
  pub text_column: String,
  #[serde(default = "default_embedding_column")]
  pub embedding_column: String,
}

fn default_model() -> String {
  DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
  DEFAULT_TIMEOUT_SECS
}
fn default_results() -> usize {
  DEFAULT_RESULT_COUNT
}
fn default_text_column() -> String {
  DEFAULT_TEXT_COLUMN.to_string()
}
fn default_embedding_column() -> String {
  DEFAULT_EMBEDDING_COLUMN.to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      model: default_model(),
      base_url: default_base_url(),
      timeout_secs: default_timeout_secs(),
      results: default_results(),
      text_column: default_text_column(),
      embedding_column: default_embedding_column(),
    }
  }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub model: Option<String>,
  pub base_url: Option<String>,
  pub text_column: Option<String>,
  pub embedding_column: Option<String>,
}

impl Config {
  /// Load configuration from a YAML file
  pub fn load_from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&content)
      .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
  }

  /// Load configuration from an explicit path, `NOTESEARCH_CONFIG`, the user
  /// config directory, or defaults, in that order
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::load_from_file(path);
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
      let path = PathBuf::from(path);
      if !path.is_file() {
        return Err(anyhow!("{} points to a missing file: {}", CONFIG_ENV_VAR, path.display()));
      }
      return Self::load_from_file(&path);
    }

    match default_config_path() {
      Some(path) if path.is_file() => Self::load_from_file(&path),
      _ => {
        debug!("no config file found, using defaults");
        Ok(Self::default())
      }
    }
  }

  pub fn with_overrides(mut self, overrides: Overrides) -> Self {
    if let Some(model) = overrides.model {
      self.model = model;
    }
    if let Some(base_url) = overrides.base_url {
      self.base_url = base_url;
    }
    if let Some(text_column) = overrides.text_column {
      self.text_column = text_column;
    }
    if let Some(embedding_column) = overrides.embedding_column {
      self.embedding_column = embedding_column;
    }
    self
  }

  pub fn provider_config(&self) -> ProviderConfig {
    ProviderConfig {
      base_url: self.base_url.clone(),
      model: self.model.clone(),
      timeout_secs: self.timeout_secs,
    }
  }

  pub fn columns(&self) -> ColumnNames {
    ColumnNames { text: self.text_column.clone(), embedding: self.embedding_column.clone() }
  }
}

/// `<config dir>/notesearch/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("notesearch").join("config.yaml"))
}
