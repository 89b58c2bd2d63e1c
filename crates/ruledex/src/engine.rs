//! Core engine for a ruledex host.
//!
//! The engine owns the configuration and the current [`Catalog`]. Readers
//! take a cheap `Arc` snapshot; a rebuild constructs a complete new
//! catalog off to the side and swaps it in, so a reader never observes a
//! partially built catalog.

use eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;

/// Outcome of a successful [`Engine::rebuild`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebuild {
    pub version: u64,
    /// False when the new tree produced the same rules, skipped documents
    /// and warnings as before
    pub changed: bool,
    pub elapsed: Duration,
}

pub struct Engine {
    project_root: PathBuf,
    config: Config,
    /// Current snapshot, replaced wholesale on rebuild
    current: RwLock<Arc<Catalog>>,
    /// Incremented only when the published content changes
    version: AtomicU64,
}

impl Engine {
    /// Load the project config and build the initial catalog.
    pub fn new(project_root: impl Into<PathBuf>) -> Result<Self> {
        let project_root = project_root.into();
        let config = Config::load(&project_root)?;
        Self::with_config(project_root, config)
    }

    pub fn with_config(project_root: impl Into<PathBuf>, config: Config) -> Result<Self> {
        let project_root = project_root.into();
        let catalog = Self::build_catalog(&project_root, &config)?;
        info!(
            "Loaded {} rules from {}",
            catalog.len(),
            config.spec_root(&project_root).display()
        );
        Ok(Self {
            project_root,
            config,
            current: RwLock::new(Arc::new(catalog)),
            version: AtomicU64::new(1),
        })
    }

    fn build_catalog(project_root: &Path, config: &Config) -> Result<Catalog> {
        Catalog::build(&config.spec_root(project_root), config.search_options())
    }

    /// The current snapshot. It stays valid across later rebuilds.
    pub fn catalog(&self) -> Arc<Catalog> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&current)
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-read the specification tree and publish the result.
    ///
    /// On error the previous snapshot stays published.
    pub fn rebuild(&self) -> Result<Rebuild> {
        let start = Instant::now();

        let catalog = match Self::build_catalog(&self.project_root, &self.config) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Rebuild failed, keeping previous catalog: {:#}", e);
                return Err(e);
            }
        };

        let changed = {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            let changed = !current.same_content(&catalog);
            if changed {
                *current = Arc::new(catalog);
            }
            changed
        };

        let version = if changed {
            self.version.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            self.version()
        };

        let elapsed = start.elapsed();
        info!(
            "Rebuild completed in {:?} (version {}, changed: {})",
            elapsed, version, changed
        );
        Ok(Rebuild {
            version,
            changed,
            elapsed,
        })
    }
}
