//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Site configuration matching the config.yaml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Absolute URL the site is published under (used for feed links)
    pub root_url: String,

    /// Output directory
    pub path: String,

    /// Entries per index/galley page
    pub per_page: usize,

    /// Size of the "recent posts" sidebar list
    pub recent_posts: usize,

    #[serde(default)]
    pub rss_title: Option<String>,

    #[serde(default)]
    pub rss_description: Option<String>,

    #[serde(default = "default_entries")]
    pub entries: PathBuf,

    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    #[serde(default = "default_static", rename = "static")]
    pub static_dir: PathBuf,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_entries() -> PathBuf {
    PathBuf::from("entries")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_static() -> PathBuf {
    PathBuf::from("static")
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse and normalize configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(contents)?;

        if config.per_page == 0 {
            return Err(ConfigError::Invalid(
                "per_page must be at least 1".to_string(),
            ));
        }

        config.root_url = trailing_slash(&config.root_url);
        config.path = trailing_slash(&config.path);

        Ok(config)
    }

    /// Feed title and description, present only when both are configured
    pub fn rss(&self) -> Option<(&str, &str)> {
        match (&self.rss_title, &self.rss_description) {
            (Some(title), Some(description)) => Some((title, description)),
            _ => None,
        }
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(Path::new(&self.path))
    }

    /// Get the entries directory, resolved relative to config file
    pub fn entries_dir(&self) -> PathBuf {
        self.resolve_path(&self.entries)
    }

    /// Get the templates directory, resolved relative to config file
    pub fn templates_dir(&self) -> PathBuf {
        self.resolve_path(&self.templates)
    }

    /// Get the static assets directory, resolved relative to config file
    pub fn static_dir(&self) -> PathBuf {
        self.resolve_path(&self.static_dir)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

/// Ensure a URL or path ends with exactly one slash
pub fn trailing_slash(raw: &str) -> String {
    if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    }
}
