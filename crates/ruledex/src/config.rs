//! Configuration schema for ruledex
//!
//! Config lives at `.config/ruledex/config.yaml` relative to the project root:
//!
//! ```yaml
//! root: standards
//! search:
//!   limit_per_field: 20
//!   backend: tantivy
//! ```
//!
//! Every key is optional.

use eyre::{Result, WrapErr, eyre};
use facet::Facet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Location of the config file relative to the project root
pub const CONFIG_PATH: &str = ".config/ruledex/config.yaml";

/// Per-field result cap used when the config does not set one
pub const DEFAULT_LIMIT_PER_FIELD: usize = 20;

/// Root configuration for ruledex
#[derive(Debug, Clone, Default, Facet)]
pub struct Config {
    /// Directory containing `features/`, relative to the project root
    #[facet(default)]
    pub root: Option<String>,

    #[facet(default)]
    pub search: Option<SearchConfig>,
}

/// Search index settings
#[derive(Debug, Clone, Default, Facet)]
pub struct SearchConfig {
    /// Results taken from each field before merging
    #[facet(default)]
    pub limit_per_field: Option<usize>,

    #[facet(default)]
    pub backend: Option<SearchBackend>,
}

/// Which index implementation answers queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Facet)]
#[facet(rename_all = "lowercase")]
#[repr(u8)]
pub enum SearchBackend {
    /// Tokenized full-text index (needs the `search` feature)
    #[default]
    Tantivy,
    /// Case-insensitive substring matching
    Simple,
}

/// Resolved search settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit_per_field: usize,
    pub backend: SearchBackend,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit_per_field: DEFAULT_LIMIT_PER_FIELD,
            backend: SearchBackend::default(),
        }
    }
}

impl Config {
    /// Parse a config from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        facet_yaml::from_str::<Config>(yaml).map_err(|e| eyre!("Invalid config: {}", e))
    }

    /// Load the config of a project. A missing file yields the defaults.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_PATH);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content)
                .wrap_err_with(|| format!("Config file {} has errors", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e)
                .wrap_err_with(|| format!("Config file {} not readable", path.display())),
        }
    }

    /// Directory containing `features/`
    pub fn spec_root(&self, project_root: &Path) -> PathBuf {
        match &self.root {
            Some(root) => project_root.join(root),
            None => project_root.to_path_buf(),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        let defaults = SearchOptions::default();
        let Some(search) = &self.search else {
            return defaults;
        };
        SearchOptions {
            limit_per_field: search
                .limit_per_field
                .filter(|&n| n > 0)
                .unwrap_or(defaults.limit_per_field),
            backend: search.backend.unwrap_or(defaults.backend),
        }
    }
}
