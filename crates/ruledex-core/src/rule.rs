//! Rule records built from feature documents

use eyre::{Result, eyre};
use facet::Facet;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::path::{Component, Path};
use std::sync::LazyLock;

use crate::model::{Document, Feature};

/// Directory name that marks the specification root inside a document path
pub const SPEC_ROOT_MARKER: &str = "features";

static RULE_CODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[ra]-[0-9-]+").expect("static regex must compile"));

/// Top-level grouping of the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
#[facet(rename_all = "lowercase")]
#[repr(u8)]
pub enum Part {
    /// Language-independent rules
    Common,
    /// C++ specific rules
    Cpp,
}

impl Part {
    /// Every grouping, in listing order. The first one is the default.
    pub const ALL: [Part; 2] = [Part::Common, Part::Cpp];

    /// Folder name under the specification root
    pub fn dir_name(self) -> &'static str {
        match self {
            Part::Common => "common",
            Part::Cpp => "cpp",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.dir_name() == name)
    }
}

impl Default for Part {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl Display for Part {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// How strictly a rule must be followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
#[facet(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    Mandatory,
    Recommended,
}

impl Severity {
    /// Severity encoded by a rule id: ids starting with `r` are mandatory.
    pub fn of_id(id: &str) -> Self {
        match id.chars().next() {
            Some('r' | 'R') => Severity::Mandatory,
            _ => Severity::Recommended,
        }
    }

    /// Label shown to readers of the rule set
    pub fn label(self) -> &'static str {
        match self {
            Severity::Mandatory => "强制",
            Severity::Recommended => "建议",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One coding-standard rule, built from one feature document.
///
/// Rules are immutable once built; severity and link target are computed
/// from `id` on every access.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Rule {
    /// Lower-cased file stem, unique across the catalog
    pub id: String,
    /// Feature name with its rule-code prefix removed
    pub title: String,
    /// Free text, may be markdown
    pub description: String,
    /// Location relative to the specification root
    pub path: String,
    /// Folder directly below the grouping folder
    pub category: String,
    pub part: Part,
    /// The parsed document, unmodified
    pub feature: Feature,
}

impl Rule {
    /// Build a rule from a document and the path it was read from.
    ///
    /// # Errors
    ///
    /// Fails when the document has no feature node.
    pub fn build(path: &Path, document: Document) -> Result<Self> {
        let feature = document
            .feature
            .ok_or_else(|| eyre!("{} has no feature", path.display()))?;
        Ok(Self::from_feature(path, feature))
    }

    /// Build a rule from an already-extracted feature node.
    pub fn from_feature(path: &Path, feature: Feature) -> Self {
        let (part, category) = classify_path(path);
        Self {
            id: rule_id(path),
            title: strip_rule_code(&feature.name),
            description: feature.description.clone(),
            path: relative_path(path),
            category,
            part,
            feature,
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::of_id(&self.id)
    }

    /// Canonical link target for this rule
    pub fn uri(&self) -> String {
        format!("/rules/{}", self.id.to_lowercase())
    }
}

/// Lower-cased file name up to its first dot
fn rule_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_lowercase()
}

/// Remove a leading `r-1-2` / `A-3` style rule code from a feature name.
pub fn strip_rule_code(name: &str) -> String {
    RULE_CODE_PREFIX.replace(name, "").trim().to_string()
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Grouping and category from the two segments after the root marker.
fn classify_path(path: &Path) -> (Part, String) {
    let segments = segments(path);
    let Some(marker) = segments.iter().position(|s| s == SPEC_ROOT_MARKER) else {
        return (Part::default(), String::new());
    };

    // The category is a folder, never the document itself.
    let dirs = &segments[marker + 1..segments.len().saturating_sub(1).max(marker + 1)];
    let part = dirs
        .first()
        .and_then(|s| Part::from_dir_name(s))
        .unwrap_or_default();
    let category = dirs.get(1).cloned().unwrap_or_default();
    (part, category)
}

/// Path below the last root marker, `/`-separated.
fn relative_path(path: &Path) -> String {
    let segments = segments(path);
    let start = segments
        .iter()
        .rposition(|s| s == SPEC_ROOT_MARKER)
        .map(|i| i + 1)
        .unwrap_or(0);
    segments[start..].join("/")
}
