//! The rule catalog: every rule of a specification tree in catalog order,
//! with the views a documentation site needs.

use eyre::Result;
use ruledex_core::{
    LoadReport, Part, Rule, SkippedDocument, Sources, WalkSources, load_rules, sort_rules,
};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::SearchOptions;
use crate::search::{SearchDocument, SearchIndex, build_index, search};

/// An immutable snapshot of all rules.
///
/// The search index is built on first use and reused afterwards.
pub struct Catalog {
    rules: Vec<Rule>,
    skipped: Vec<SkippedDocument>,
    warnings: Vec<String>,
    options: SearchOptions,
    index: OnceLock<Box<dyn SearchIndex>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("rules", &self.rules.len())
            .field("skipped", &self.skipped.len())
            .field("options", &self.options)
            .field("indexed", &self.index.get().is_some())
            .finish()
    }
}

/// Rules grouped by category, categories in order of first appearance
#[derive(Debug, Default)]
pub struct Categories<'a> {
    groups: Vec<(&'a str, Vec<&'a Rule>)>,
}

impl<'a> Categories<'a> {
    fn collect(rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        let mut groups: Vec<(&'a str, Vec<&'a Rule>)> = Vec::new();
        for rule in rules {
            match groups.iter_mut().find(|(name, _)| *name == rule.category) {
                Some((_, members)) => members.push(rule),
                None => groups.push((rule.category.as_str(), vec![rule])),
            }
        }
        Self { groups }
    }

    pub fn get(&self, category: &str) -> Option<&[&'a Rule]> {
        self.groups
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, members)| members.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a Rule])> + '_ {
        self.groups
            .iter()
            .map(|(name, members)| (*name, members.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Catalog {
    /// Walk `<root>/features` and build the catalog.
    ///
    /// # Errors
    ///
    /// Fails only when the specification root cannot be read. Individual
    /// documents that fail are recorded in [`Catalog::skipped`].
    pub fn build(root: &Path, options: SearchOptions) -> Result<Self> {
        Self::from_sources(WalkSources::new(root), options)
    }

    pub fn from_sources(sources: impl Sources, options: SearchOptions) -> Result<Self> {
        let LoadReport {
            rules,
            skipped,
            warnings,
        } = load_rules(sources)?;
        let mut catalog = Self::from_rules(rules, options);
        catalog.skipped = skipped;
        catalog.warnings = warnings;
        Ok(catalog)
    }

    /// Put already-built rules into catalog order.
    pub fn from_rules(mut rules: Vec<Rule>, options: SearchOptions) -> Self {
        sort_rules(&mut rules);
        Self {
            rules,
            skipped: Vec::new(),
            warnings: Vec::new(),
            options,
            index: OnceLock::new(),
        }
    }

    /// All rules, mandatory first, then by id
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Documents that were not turned into rules, with the reason
    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    /// Non-fatal problems with the tree layout
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Whether both snapshots hold the same rules, skipped documents and
    /// warnings. The search index is not compared.
    pub fn same_content(&self, other: &Catalog) -> bool {
        self.rules == other.rules
            && self.skipped == other.skipped
            && self.warnings == other.warnings
    }

    /// Rules of one grouping, in catalog order
    pub fn by_part(&self, part: Part) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(move |r| r.part == part)
    }

    /// Rules of one grouping keyed by category
    pub fn by_category(&self, part: Part) -> Categories<'_> {
        Categories::collect(self.by_part(part))
    }

    /// Exact lookup by id. Ids are lower-case, so a lower-cased query is
    /// compared.
    pub fn by_id(&self, id: &str) -> Option<&Rule> {
        let id = id.to_lowercase();
        self.rules.iter().find(|r| r.id == id)
    }

    /// First rule, in catalog order, whose path starts with `prefix`
    /// (e.g. `cpp/pointer/r-1-2`)
    pub fn by_path_prefix(&self, prefix: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.path.starts_with(prefix))
    }

    /// The search index for this snapshot, built on first use
    pub fn search_index(&self) -> &dyn SearchIndex {
        self.index
            .get_or_init(|| {
                debug!(rules = self.rules.len(), backend = ?self.options.backend, "building search index");
                build_index(&self.rules, self.options.backend)
            })
            .as_ref()
    }

    /// Search ids, titles, categories and descriptions, in that priority.
    pub fn search(&self, query: &str) -> Vec<SearchDocument> {
        search(self.search_index(), query, self.options.limit_per_field)
    }
}
