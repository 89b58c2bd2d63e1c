//! Building rules from a set of documents

use eyre::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::document::parse_document;
use crate::rule::Rule;
use crate::sources::{SkippedDocument, SourceDocument, Sources};

/// Result of building rules from sources
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Rules in source order (not yet in catalog order)
    pub rules: Vec<Rule>,
    /// Documents that could not be read, parsed or built
    pub skipped: Vec<SkippedDocument>,
    pub warnings: Vec<String>,
}

/// Build one rule per document.
///
/// Each document is independent: a document that fails to parse or has
/// no feature is logged and skipped. When two documents yield the same
/// id, the first in source order is kept and the later one is skipped.
/// The only error is the source tree itself being inaccessible.
pub fn load_rules(sources: impl Sources) -> Result<LoadReport> {
    let set = sources.collect()?;
    let mut report = LoadReport {
        skipped: set.skipped,
        warnings: set.warnings,
        ..LoadReport::default()
    };

    let total = set.documents.len();
    // First definition of each id, in source order
    let mut defined: HashMap<String, &Path> = HashMap::new();
    for (document, built) in set.documents.iter().zip(build_all(&set.documents)) {
        match built {
            Ok(rule) => match defined.get(rule.id.as_str()).copied() {
                Some(first) => {
                    let reason = format!(
                        "duplicate rule id {} (already defined by {})",
                        rule.id,
                        first.display()
                    );
                    warn!("Skipping document {}: {}", document.path.display(), reason);
                    report.skipped.push(SkippedDocument {
                        path: document.path.clone(),
                        reason,
                    });
                }
                None => {
                    defined.insert(rule.id.clone(), document.path.as_path());
                    report.rules.push(rule);
                }
            },
            Err(e) => {
                warn!("Skipping document {}: {:#}", document.path.display(), e);
                report.skipped.push(SkippedDocument {
                    path: document.path.clone(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    info!(
        documents = total,
        rules = report.rules.len(),
        skipped = report.skipped.len(),
        "built rules"
    );
    Ok(report)
}

/// Build a rule from a single document.
pub fn build_rule(document: &SourceDocument) -> Result<Rule> {
    let parsed = parse_document(&document.path, &document.text)?;
    Rule::build(&document.path, parsed)
}

// Results come back in input order either way.
#[cfg(feature = "parallel")]
fn build_all(documents: &[SourceDocument]) -> Vec<Result<Rule>> {
    use rayon::prelude::*;
    documents.par_iter().map(build_rule).collect()
}

#[cfg(not(feature = "parallel"))]
fn build_all(documents: &[SourceDocument]) -> Vec<Result<Rule>> {
    documents.iter().map(build_rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySources;
    use std::path::PathBuf;

    const GOOD: &str = "Feature: R-1 First\n  Scenario: 报告 something\n    Given a file\n";

    #[test]
    fn test_bad_documents_are_skipped() {
        let report = load_rules(
            MemorySources::new()
                .add("features/common/x/r-1.feature", GOOD)
                .add("features/common/x/r-2.feature", "not a feature at all\n")
                .add("features/common/x/r-3.feature", "# only a comment\n"),
        )
        .unwrap();

        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.rules[0].id, "r-1");
        assert_eq!(report.rules[0].title, "First");

        let skipped: Vec<PathBuf> = report.skipped.iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            skipped,
            vec![
                PathBuf::from("features/common/x/r-2.feature"),
                PathBuf::from("features/common/x/r-3.feature"),
            ]
        );
        assert!(report.skipped[1].reason.contains("has no feature"));
    }

    #[test]
    fn test_duplicate_ids_keep_first_definition() {
        let report = load_rules(
            MemorySources::new()
                .add("features/cpp/pointer/R-1-2.feature", GOOD)
                .add("features/common/naming/r-1-2.feature", GOOD)
                .add("features/common/naming/r-1-3.feature", GOOD),
        )
        .unwrap();

        let ids: Vec<&str> = report.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-1-2", "r-1-3"]);
        assert_eq!(report.rules[0].path, "cpp/pointer/R-1-2.feature");

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            report.skipped[0].path,
            PathBuf::from("features/common/naming/r-1-2.feature")
        );
        assert!(report.skipped[0].reason.contains("duplicate rule id r-1-2"));
        assert!(report.skipped[0].reason.contains("features/cpp/pointer/R-1-2.feature"));
    }

    #[test]
    fn test_rules_keep_source_order() {
        let report = load_rules(
            MemorySources::new()
                .add("features/cpp/p/r-9.feature", GOOD)
                .add("features/cpp/p/r-3.feature", GOOD)
                .add("features/cpp/p/a-1.feature", GOOD),
        )
        .unwrap();
        let ids: Vec<&str> = report.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-9", "r-3", "a-1"]);
    }
}
