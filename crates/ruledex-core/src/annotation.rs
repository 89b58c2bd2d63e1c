//! Diagnostic annotations embedded in outcome steps
//!
//! Outcome steps that expect a diagnostic are written as
//!
//! ```text
//! 应该报告 "foo.cpp:12:5: warning: 未使用的变量"
//! ```
//!
//! Anything else is plain prose and carries no annotation.

use facet::Facet;
use regex::Regex;
use std::sync::LazyLock;

use crate::classify::{SourceFile, outcomes};
use crate::model::Scenario;

static OUTCOME_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^应该报告 "([^:]+):([0-9]+):([0-9]+):\s*([^:]+):\s(.*)""#)
        .expect("static regex must compile")
});

/// Severity of an expected diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[facet(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Warning,
    Error,
    Note,
    Success,
}

impl Level {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            "note" => Some(Level::Note),
            "success" => Some(Level::Success),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Note => "note",
            Level::Success => "success",
        }
    }
}

/// A diagnostic the checker is expected to emit
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Annotation {
    pub file: String,
    /// 1-indexed
    pub line: u32,
    /// 1-indexed
    pub column: u32,
    pub severity: Level,
    pub message: String,
}

/// Extract the annotation from one outcome step's text, if it has one.
pub fn extract_annotation(text: &str) -> Option<Annotation> {
    let caps = OUTCOME_DIAGNOSTIC.captures(text)?;
    Some(Annotation {
        file: caps.get(1)?.as_str().to_string(),
        line: caps.get(2)?.as_str().parse().ok()?,
        column: caps.get(3)?.as_str().parse().ok()?,
        severity: Level::parse(caps.get(4)?.as_str().trim())?,
        message: caps.get(5)?.as_str().to_string(),
    })
}

/// All annotations expected by a scenario's outcome steps
pub fn scenario_annotations(scenario: &Scenario) -> Vec<Annotation> {
    outcomes(scenario)
        .iter()
        .filter_map(|step| extract_annotation(&step.text))
        .collect()
}

/// Annotations of `scenario` that point into `source`
pub fn annotations_for(scenario: &Scenario, source: &SourceFile) -> Vec<Annotation> {
    scenario_annotations(scenario)
        .into_iter()
        .filter(|a| a.file == source.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Step, StepKind};

    #[test]
    fn test_extract_warning() {
        let annotation = extract_annotation(r#"应该报告 "foo.cpp:12:5: warning: 未使用的变量""#)
            .expect("annotation");
        assert_eq!(
            annotation,
            Annotation {
                file: "foo.cpp".to_string(),
                line: 12,
                column: 5,
                severity: Level::Warning,
                message: "未使用的变量".to_string(),
            }
        );
    }

    #[test]
    fn test_message_keeps_colons() {
        let annotation =
            extract_annotation(r#"应该报告 "src/a.h:1:2: error: 期望: 常量""#).unwrap();
        assert_eq!(annotation.file, "src/a.h");
        assert_eq!(annotation.severity, Level::Error);
        assert_eq!(annotation.message, "期望: 常量");
    }

    #[test]
    fn test_prose_is_not_a_match() {
        assert!(extract_annotation("应该不报告任何问题").is_none());
        assert!(extract_annotation("应该报告问题").is_none());
        assert!(extract_annotation("").is_none());
    }

    #[test]
    fn test_non_numeric_position_is_not_a_match() {
        assert!(extract_annotation(r#"应该报告 "foo.cpp:x:5: warning: m""#).is_none());
        assert!(extract_annotation(r#"应该报告 "foo.cpp:1:-5: warning: m""#).is_none());
        assert!(extract_annotation(r#"应该报告 "foo.cpp:99999999999:5: warning: m""#).is_none());
    }

    #[test]
    fn test_unknown_severity_is_not_a_match() {
        assert!(extract_annotation(r#"应该报告 "foo.cpp:1:5: fatal: m""#).is_none());
    }

    #[test]
    fn test_annotations_for_source() {
        let scenario = Scenario::new("1", "报告 x")
            .with_step(Step::new(StepKind::Action, r#"应该报告 "a.cpp:1:1: note: 不是结果""#))
            .with_step(Step::new(StepKind::Outcome, r#"应该报告 "a.cpp:3:7: warning: 一""#))
            .with_step(Step::new(StepKind::Conjunction, r#"应该报告 "b.cpp:4:1: error: 二""#))
            .with_step(Step::new(StepKind::Conjunction, "并且退出码为 1"));

        assert_eq!(scenario_annotations(&scenario).len(), 2);

        let source = SourceFile {
            name: "a.cpp".to_string(),
            content: String::new(),
        };
        let found = annotations_for(&scenario, &source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
        assert_eq!(found[0].message, "一");
    }
}
