//! Configuration file handling.
//!
//! This module provides loading and saving of modcatalog configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/modcatalog/config.toml`
//! - macOS: `~/Library/Application Support/modcatalog/config.toml`
//! - Windows: `%APPDATA%\modcatalog\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! extensions = ["jar", "zip", "disabled"]
//! output_file = "mods.json"
//! max_skipped_shown = 10
//! parallel = true
//! jobs = 0
//! default_format = "summary"
//! exclude = ["*-sources.jar"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration.
///
/// Every field has a default, so a partial file is valid.
///
/// # Example
///
/// ```no_run
/// use modcatalog::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Writing catalog to {}", config.output_file);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File extensions treated as mod archives, compared case-insensitively.
    ///
    /// Default: `["jar", "zip", "disabled"]`
    pub extensions: Vec<String>,

    /// Catalog file name. Relative paths resolve against the working directory.
    ///
    /// Default: `"mods.json"`
    pub output_file: String,

    /// How many skipped file names the summary lists before collapsing the rest.
    ///
    /// Default: 10
    pub max_skipped_shown: usize,

    /// Whether archives are processed on a worker pool.
    ///
    /// Default: true
    pub parallel: bool,

    /// Worker count for parallel scans. `0` uses the number of logical CPUs.
    ///
    /// Default: 0
    pub jobs: usize,

    /// Console format when no `--format` flag is provided.
    ///
    /// Valid values: "summary", "table"
    /// Default: "summary"
    pub default_format: String,

    /// File name patterns to leave out of the scan.
    ///
    /// Supports `*` wildcards (e.g. "*-sources.jar", "optifine*").
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec!["jar".to_string(), "zip".to_string(), "disabled".to_string()],
            output_file: "mods.json".to_string(),
            max_skipped_shown: 10,
            parallel: true,
            jobs: 0,
            default_format: "summary".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// Returns default configuration if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use modcatalog::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modcatalog")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Check if a file name has one of the configured archive extensions.
    pub fn is_candidate(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| {
            let ext = ext.trim_start_matches('.').to_lowercase();
            lower
                .strip_suffix(ext.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// Check if a file name matches one of the exclude patterns.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, file_name))
    }

    /// Resolves the catalog path against `cwd` when it is relative.
    pub fn output_path(&self, cwd: &Path) -> PathBuf {
        let path = PathBuf::from(&self.output_file);
        if path.is_absolute() {
            path
        } else {
            cwd.join(path)
        }
    }
}

/// Matches `text` against `pattern`, where `*` stands for any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut segments = pattern.split('*');
    let head = segments.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };

    let segments: Vec<&str> = segments.collect();
    let Some((tail, middle)) = segments.split_last() else {
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(tail)
}
