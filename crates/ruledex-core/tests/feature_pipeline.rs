//! End-to-end tests from document text to scenario cards

use std::path::Path;

use ruledex_core::{
    Level, MemorySources, Part, ScenarioSections, Severity, Verdict, classify, expand_outline,
    load_rules,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(Path::new(FIXTURES_DIR).join(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

fn null_deref_rule() -> ruledex_core::Rule {
    let report = load_rules(
        MemorySources::new().add("features/cpp/pointer/R-1-2.feature", read_fixture("null_deref.feature")),
    )
    .expect("Failed to load rules");
    assert!(report.skipped.is_empty(), "unexpected skips: {:?}", report.skipped);
    report.rules.into_iter().next().expect("one rule")
}

#[test]
fn test_rule_metadata() {
    let rule = null_deref_rule();
    assert_eq!(rule.id, "r-1-2");
    assert_eq!(rule.title, "不得解引用空指针");
    assert_eq!(rule.part, Part::Cpp);
    assert_eq!(rule.category, "pointer");
    assert_eq!(rule.path, "cpp/pointer/R-1-2.feature");
    assert_eq!(rule.severity(), Severity::Mandatory);
    assert!(rule.description.contains("未定义行为"));
    assert!(classify::is_skip_feature(&rule.feature));
}

#[test]
fn test_classification_of_fixture() {
    let rule = null_deref_rule();
    let scenarios = classify::all_scenarios(&rule.feature);
    assert_eq!(scenarios.len(), 3);

    assert!(classify::is_negative(&scenarios[0]));
    assert!(classify::is_acceptance(&scenarios[0]));
    assert!(classify::is_positive(&scenarios[1]));
    assert!(!classify::is_acceptance(&scenarios[2]));
    assert!(scenarios[2].is_outline());

    // Skip comes from the feature, not from the scenarios.
    assert!(scenarios.iter().all(|s| !classify::is_skip(s)));
    assert!(scenarios.iter().all(|s| classify::is_skip_in(&rule.feature, s)));
}

#[test]
fn test_outline_expansion_of_fixture() {
    let rule = null_deref_rule();
    let outline = &rule.feature.children[2];
    let expanded = expand_outline(outline);

    assert_eq!(expanded.len(), 2);
    assert_eq!(expanded[0].name, "报告 空指针解引用");
    assert_eq!(expanded[1].name, "报告 零指针解引用");
    assert!(expanded[0].id.starts_with(&format!("{}-", outline.id)));
    assert_ne!(expanded[0].id, expanded[1].id);

    let doc = expanded[1].steps[0].doc_string.as_deref().unwrap();
    assert!(doc.contains("int *p = 0;"));

    // The stored rule is untouched.
    assert!(rule.feature.children[2].name.contains("<kind>"));
}

#[test]
fn test_cards_of_fixture() {
    let rule = null_deref_rule();
    let sections = ScenarioSections::for_rule(&rule);

    assert_eq!(sections.acceptance.len(), 2);
    assert_eq!(sections.more.len(), 2);

    let first = &sections.acceptance[0];
    assert_eq!(first.verdict, Verdict::Negative);
    assert!(first.is_unimplemented());
    assert_eq!(first.sources.len(), 1);
    assert_eq!(first.sources[0].source.name, "foo.cpp");
    let annotations = &first.sources[0].annotations;
    assert_eq!(annotations.len(), 1);
    assert_eq!((annotations[0].line, annotations[0].column), (3, 12));
    assert_eq!(annotations[0].severity, Level::Warning);

    let source = &first.sources[0].source;
    assert_eq!(
        source.content,
        "int main() {\n    int *p = nullptr;\n    return *p;\n}"
    );
    assert_eq!(
        char_at(&source.content, annotations[0].line, annotations[0].column),
        Some('*')
    );

    let second = &sections.acceptance[1];
    assert_eq!(second.verdict, Verdict::Positive);
    assert!(second.skip);
    assert!(!second.is_unimplemented());
    assert!(second.sources[0].annotations.is_empty());

    let expanded = &sections.more[1];
    assert_eq!(expanded.sources[0].source.name, "b.cpp");
    assert_eq!(expanded.sources[0].annotations[0].message, "零指针解引用");
    assert_eq!(expanded.sources[0].source.content, "int *p = 0;\nint x = *p;");
    let annotation = &expanded.sources[0].annotations[0];
    assert_eq!(
        char_at(&expanded.sources[0].source.content, annotation.line, annotation.column),
        Some('*')
    );
}

/// Character at a 1-indexed line and column of a source fixture
fn char_at(content: &str, line: u32, column: u32) -> Option<char> {
    content
        .lines()
        .nth(line.checked_sub(1)? as usize)?
        .chars()
        .nth(column.checked_sub(1)? as usize)
}

#[test]
fn test_loading_is_idempotent() {
    assert_eq!(null_deref_rule(), null_deref_rule());
}
