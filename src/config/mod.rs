//! Configuration system for jsonsteps.
//!
//! The configuration decides how node expressions are evaluated for the whole
//! test run, and how much work a single expression may do. It can be loaded
//! from a TOML file and overridden from the command line.
//!
//! # Example
//!
//! ```
//! use jsonsteps::config::{Config, EvaluationMode};
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.evaluation_mode, EvaluationMode::Expression);
//! assert_eq!(config.max_steps, 10_000);
//!
//! // Create custom configuration
//! let custom = Config {
//!     evaluation_mode: EvaluationMode::Path,
//!     ..Config::default()
//! };
//! assert_eq!(custom.max_depth, 256);
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// How node expressions are resolved against a document.
///
/// Chosen once when the evaluator is built and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Dotted path traversal: `a.b[0].c`.
    #[serde(alias = "php")]
    #[value(alias = "php")]
    Path,
    /// Sandboxed expressions over the document: `items.length == 3`.
    #[serde(alias = "javascript")]
    #[value(alias = "javascript")]
    Expression,
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMode::Path => f.write_str("path"),
            EvaluationMode::Expression => f.write_str("expression"),
        }
    }
}

/// Configuration for a jsonsteps run.
///
/// # Fields
///
/// * `evaluation_mode` - Node expression strategy (default: expression)
/// * `max_steps` - Evaluation steps one expression may take (default: 10,000)
/// * `max_depth` - Nesting depth an expression may reach (default: 256)
/// * `validate_formats` - Enforce the schema `format` keyword (default: false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Node expression strategy
    #[serde(default = "default_evaluation_mode")]
    pub evaluation_mode: EvaluationMode,

    /// Evaluation steps one expression may take
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Nesting depth an expression may reach, both when parsing and evaluating
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Enforce the `format` keyword during schema validation
    #[serde(default)]
    pub validate_formats: bool,
}

/// Returns the default evaluation mode.
fn default_evaluation_mode() -> EvaluationMode {
    EvaluationMode::Expression
}

/// Returns the default step budget.
fn default_max_steps() -> usize {
    10_000
}

/// Returns the default nesting limit.
fn default_max_depth() -> usize {
    256
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evaluation_mode: default_evaluation_mode(),
            max_steps: default_max_steps(),
            max_depth: default_max_depth(),
            validate_formats: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/jsonsteps/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("jsonsteps");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {}: {:#}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Loads configuration from an explicit file, reporting any problem.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves configuration to the given file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = toml::from_str("max_steps = 5").unwrap();
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.evaluation_mode, EvaluationMode::Expression);
        assert_eq!(config.max_depth, 256);
        assert!(!config.validate_formats);
    }

    #[test]
    fn test_legacy_mode_names() {
        let config: Config = toml::from_str("evaluation_mode = \"php\"").unwrap();
        assert_eq!(config.evaluation_mode, EvaluationMode::Path);

        let config: Config = toml::from_str("evaluation_mode = \"javascript\"").unwrap();
        assert_eq!(config.evaluation_mode, EvaluationMode::Expression);
    }
}
