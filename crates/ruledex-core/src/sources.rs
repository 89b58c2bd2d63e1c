//! Document providers for rule extraction

use eyre::Result;
use std::path::PathBuf;

/// File extension of feature documents
pub const FEATURE_EXTENSION: &str = "feature";

/// A raw document and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
}

/// A document that did not make it into the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Documents gathered by a [`Sources`] implementation
#[derive(Debug, Default)]
pub struct SourceSet {
    /// Readable documents, in a deterministic order
    pub documents: Vec<SourceDocument>,
    /// Documents that could not be read
    pub skipped: Vec<SkippedDocument>,
    /// Non-fatal problems with the tree itself (missing groupings, ...)
    pub warnings: Vec<String>,
}

/// Trait for providing feature documents to build rules from
pub trait Sources {
    /// Gather all documents.
    ///
    /// Only a failure to access the tree as a whole is an error; single
    /// unreadable documents end up in [`SourceSet::skipped`].
    fn collect(self) -> Result<SourceSet>;
}

/// In-memory sources (useful for testing)
pub struct MemorySources(Vec<(PathBuf, String)>);

impl MemorySources {
    /// Create empty memory sources
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a document with content
    pub fn add(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.0.push((path.into(), content.into()));
        self
    }
}

impl Default for MemorySources {
    fn default() -> Self {
        Self::new()
    }
}

impl Sources for MemorySources {
    fn collect(self) -> Result<SourceSet> {
        Ok(SourceSet {
            documents: self
                .0
                .into_iter()
                .map(|(path, text)| SourceDocument { path, text })
                .collect(),
            ..SourceSet::default()
        })
    }
}

/// Gitignore-aware walker over `<root>/features/<part>/**/*.feature`
#[cfg(feature = "walk")]
pub struct WalkSources {
    root: PathBuf,
}

#[cfg(feature = "walk")]
impl WalkSources {
    /// Create a walker for the project root that contains `features/`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(feature = "walk")]
impl Sources for WalkSources {
    fn collect(self) -> Result<SourceSet> {
        use crate::rule::{Part, SPEC_ROOT_MARKER};
        use eyre::WrapErr;
        use ignore::WalkBuilder;
        use tracing::{debug, warn};

        let spec_root = self.root.join(SPEC_ROOT_MARKER);
        let metadata = std::fs::metadata(&spec_root).wrap_err_with(|| {
            format!("Specification root {} is not accessible", spec_root.display())
        })?;
        if !metadata.is_dir() {
            eyre::bail!("Specification root {} is not a directory", spec_root.display());
        }

        let mut set = SourceSet::default();

        for part in Part::ALL {
            let dir = spec_root.join(part.dir_name());
            if !dir.is_dir() {
                let warning = format!("Grouping directory not found: {}", dir.display());
                warn!("{}", warning);
                set.warnings.push(warning);
                continue;
            }

            let mut paths = Vec::new();
            let walker = WalkBuilder::new(&dir)
                .follow_links(true)
                .hidden(false)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .build();

            for entry in walker {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        let warning = format!("Failed to walk {}: {}", dir.display(), e);
                        warn!("{}", warning);
                        set.warnings.push(warning);
                        continue;
                    }
                };
                let path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file())
                    && path.extension().is_some_and(|ext| ext == FEATURE_EXTENSION)
                {
                    paths.push(entry.into_path());
                }
            }

            // Walk order depends on the filesystem.
            paths.sort();
            debug!(part = %part, count = paths.len(), "found feature documents");

            for full_path in paths {
                // Relative to the root so that only our own `features` marker is seen.
                let path = full_path
                    .strip_prefix(&self.root)
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|_| full_path.clone());
                match std::fs::read_to_string(&full_path) {
                    Ok(text) => set.documents.push(SourceDocument { path, text }),
                    Err(e) => {
                        warn!("Skipping unreadable document {}: {}", full_path.display(), e);
                        set.skipped.push(SkippedDocument {
                            path,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        Ok(set)
    }
}
