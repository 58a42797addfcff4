//! Configuration Management
//!
//! Handles persistent configuration storage for cwmetrics and loading of the
//! option/secret parameter files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default file holding plugin options
    #[serde(default)]
    pub options_file: Option<PathBuf>,
    /// Default file holding secret data
    #[serde(default)]
    pub secret_file: Option<PathBuf>,
    /// Region used when neither the resource nor the secret data names one
    #[serde(default)]
    pub region: Option<String>,
    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cwmetrics").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective options file (CLI > config)
    pub fn effective_options_file(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf).or_else(|| self.options_file.clone())
    }

    /// Get effective secret file (CLI > config)
    pub fn effective_secret_file(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf).or_else(|| self.secret_file.clone())
    }

    /// Set secret file and save
    pub fn set_secret_file(&mut self, path: &Path) -> Result<()> {
        self.secret_file = Some(path.to_path_buf());
        self.save()
    }

    /// Set options file and save
    pub fn set_options_file(&mut self, path: &Path) -> Result<()> {
        self.options_file = Some(path.to_path_buf());
        self.save()
    }

    /// Set fallback region and save
    pub fn set_region(&mut self, region: &str) -> Result<()> {
        self.region = Some(region.to_string());
        self.save()
    }

    /// Set JSON output style and save
    pub fn set_pretty(&mut self, pretty: bool) -> Result<()> {
        self.pretty = pretty;
        self.save()
    }
}

/// Load a parameter map from a YAML or JSON file
pub fn load_params(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {:?}", path))?;
    parse_params(&content).with_context(|| format!("Invalid parameter file {:?}", path))
}

/// Parse a parameter map; the document must be a mapping (an empty one is allowed)
pub fn parse_params(content: &str) -> Result<Map<String, Value>> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_yaml::from_str(content).context("Failed to parse YAML")?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(anyhow::anyhow!(
            "Parameters must be a mapping, got {}",
            json_type_name(&other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
