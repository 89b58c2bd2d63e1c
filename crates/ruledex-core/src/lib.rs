//! ruledex-core - Core library for coding-standard rule catalogs
//!
//! This crate turns a tree of feature documents, one per coding-standard
//! rule, into immutable [`Rule`] records and derives the views a rule
//! page needs:
//! - Classifying scenarios as must-not-report, must-report, acceptance or
//!   skipped cases
//! - Expanding scenario outlines into concrete scenarios
//! - Extracting expected diagnostics from outcome steps
//!
//! # Features
//!
//! - `walk` - Enable [`WalkSources`] for gitignore-aware directory walking (brings in `ignore`)
//! - `parallel` - Build rules from documents in parallel (brings in `rayon`)
//!
//! # Layout of a specification tree
//!
//! ```text
//! features/
//!   common/<category>/<id>.feature
//!   cpp/<category>/<id>.feature
//! ```
//!
//! A file name starting with `r` is a mandatory rule, anything else is a
//! recommendation.
//!
//! # Building rules
//!
//! ```
//! use ruledex_core::{MemorySources, Severity, load_rules};
//!
//! let report = load_rules(MemorySources::new().add(
//!     "features/cpp/pointer/R-1-2.feature",
//!     "Feature: R-1-2 Do not dereference null\n  Scenario: 报告 deref\n    Given a file\n",
//! ))
//! .unwrap();
//!
//! let rule = &report.rules[0];
//! assert_eq!(rule.id, "r-1-2");
//! assert_eq!(rule.title, "Do not dereference null");
//! assert_eq!(rule.category, "pointer");
//! assert_eq!(rule.severity(), Severity::Mandatory);
//! ```
//!
//! # Scenario views
//!
//! ```
//! use ruledex_core::{extract_annotation, Level};
//!
//! let annotation = extract_annotation(r#"应该报告 "foo.cpp:12:5: warning: 未使用的变量""#).unwrap();
//! assert_eq!(annotation.file, "foo.cpp");
//! assert_eq!(annotation.line, 12);
//! assert_eq!(annotation.severity, Level::Warning);
//!
//! assert!(extract_annotation("应该不报告任何问题").is_none());
//! ```

mod annotation;
mod card;
pub mod classify;
mod document;
mod load;
pub mod model;
mod order;
mod outline;
mod rule;
mod sources;

pub use annotation::{Annotation, Level, annotations_for, extract_annotation, scenario_annotations};
pub use card::{AnnotatedSource, ScenarioCard, ScenarioSections};
pub use classify::{SourceFile, Verdict};
pub use document::parse_document;
pub use load::{LoadReport, build_rule, load_rules};
pub use model::{DataTable, Document, Examples, Feature, Scenario, Step, StepKind, TableRow};
pub use order::{compare_ids, compare_rules, sort_rules};
pub use outline::{expand_all, expand_outline};
pub use rule::{Part, Rule, SPEC_ROOT_MARKER, Severity, strip_rule_code};
pub use sources::{
    FEATURE_EXTENSION, MemorySources, SkippedDocument, SourceDocument, SourceSet, Sources,
};

#[cfg(feature = "walk")]
pub use sources::WalkSources;
