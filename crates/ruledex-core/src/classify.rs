//! Scenario classification and step slicing
//!
//! All of these are pure functions of a scenario's tags, name and steps.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Feature, Scenario, Step, StepKind};

pub const ACCEPTANCE_TAG: &str = "@acceptance";
pub const SKIP_TAG: &str = "@skip";

/// Name prefix of a case asserting that nothing is reported
pub const POSITIVE_PREFIX: &str = "不报告";
/// Name prefix of a case asserting that something is reported
pub const NEGATIVE_PREFIX: &str = "报告";

static SOURCE_FILE_STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"有一个源码文件 "(.*)"，内容如下:"#).expect("static regex must compile")
});

/// What a scenario asserts about the checker's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The checker must not report anything
    Positive,
    /// The checker must report something
    Negative,
    /// Neither prefix is present
    FreeForm,
}

pub fn is_acceptance(scenario: &Scenario) -> bool {
    scenario.has_tag(ACCEPTANCE_TAG)
}

/// Skip tag on the scenario itself
pub fn is_skip(scenario: &Scenario) -> bool {
    scenario.has_tag(SKIP_TAG)
}

/// Skip tag on the whole feature
pub fn is_skip_feature(feature: &Feature) -> bool {
    feature.has_tag(SKIP_TAG)
}

/// Effective skip state of a scenario inside its feature
pub fn is_skip_in(feature: &Feature, scenario: &Scenario) -> bool {
    is_skip_feature(feature) || is_skip(scenario)
}

pub fn is_positive(scenario: &Scenario) -> bool {
    scenario.name.starts_with(POSITIVE_PREFIX)
}

pub fn is_negative(scenario: &Scenario) -> bool {
    scenario.name.starts_with(NEGATIVE_PREFIX)
}

/// Classify a scenario. The positive prefix is checked first.
pub fn verdict(scenario: &Scenario) -> Verdict {
    if is_positive(scenario) {
        Verdict::Positive
    } else if is_negative(scenario) {
        Verdict::Negative
    } else {
        Verdict::FreeForm
    }
}

/// Scenario name without its verdict prefix
pub fn display_title(scenario: &Scenario) -> &str {
    let name = scenario.name.as_str();
    name.strip_prefix(POSITIVE_PREFIX)
        .or_else(|| name.strip_prefix(NEGATIVE_PREFIX))
        .unwrap_or(name)
}

/// The feature's scenarios and outlines, in document order
pub fn all_scenarios(feature: &Feature) -> &[Scenario] {
    &feature.children
}

/// Leading context and conjunction steps
pub fn preconditions(scenario: &Scenario) -> &[Step] {
    let end = scenario
        .steps
        .iter()
        .position(|s| !matches!(s.kind, StepKind::Context | StepKind::Conjunction))
        .unwrap_or(scenario.steps.len());
    &scenario.steps[..end]
}

/// Steps from the first outcome step onward; empty without one
pub fn outcomes(scenario: &Scenario) -> &[Step] {
    match scenario.steps.iter().position(|s| s.kind == StepKind::Outcome) {
        Some(start) => &scenario.steps[start..],
        None => &[],
    }
}

/// A source fixture embedded in a scenario's preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Source fixtures declared by `有一个源码文件 "<name>"，内容如下:` steps
pub fn source_files(scenario: &Scenario) -> Vec<SourceFile> {
    preconditions(scenario)
        .iter()
        .filter_map(|step| {
            let name = SOURCE_FILE_STEP.captures(&step.text)?.get(1)?.as_str();
            let content = step.doc_string.as_ref()?;
            if name.is_empty() || content.is_empty() {
                return None;
            }
            Some(SourceFile {
                name: name.to_string(),
                content: content.clone(),
            })
        })
        .collect()
}
