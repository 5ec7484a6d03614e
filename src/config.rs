use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILENAME;
use crate::rewrite::RewritePolicy;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for decoalesce.
    pub decoalesce: DecoalesceConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for decoalesce.
pub struct DecoalesceConfig {
    /// Rewrite policy for deep optional chains.
    pub policy: Option<RewritePolicy>,
    /// File extension of source units (default: "swift").
    pub extension: Option<String>,
    /// List of folders to exclude from enumeration.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to force-include (overrides excludes).
    pub include_folders: Option<Vec<String>>,
    /// Write files back by default instead of previewing.
    pub apply: Option<bool>,
}

impl Config {
    /// Loads configuration from the current directory or any parent.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let config_toml = current.join(CONFIG_FILENAME);
            if config_toml.exists() {
                if let Ok(content) = fs::read_to_string(&config_toml) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(config_toml);
                        return config;
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
