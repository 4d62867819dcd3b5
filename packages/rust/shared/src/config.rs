//! Application configuration for Rulebook.
//!
//! Project config lives at `rulebook.toml` in the working directory.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulebookError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "rulebook.toml";

// ---------------------------------------------------------------------------
// Config structs (matching rulebook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory containing the rule files.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,

    /// Manifest file consumed by the document header.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Compiled document output file.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            manifest: default_manifest(),
            output: default_output(),
        }
    }
}

fn default_rules_dir() -> String {
    "rules".into()
}
fn default_manifest() -> String {
    "manifest.json".into()
}
fn default_output() -> String {
    "AGENTS.md".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config file in the working directory.
pub fn config_file_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| RulebookError::config(format!("cannot determine working directory: {e}")))?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RulebookError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| RulebookError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file in the working directory.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RulebookError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RulebookError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
