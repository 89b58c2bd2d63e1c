//! Per-scenario views of a rule, ready for presentation

use crate::annotation::{Annotation, annotations_for};
use crate::classify::{
    SourceFile, Verdict, all_scenarios, display_title, is_acceptance, is_skip, is_skip_feature,
    source_files, verdict,
};
use crate::model::Scenario;
use crate::outline::expand_outline;
use crate::rule::Rule;

/// A source fixture together with the diagnostics expected in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSource {
    pub source: SourceFile,
    pub annotations: Vec<Annotation>,
}

/// One concrete scenario of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCard {
    pub scenario: Scenario,
    pub verdict: Verdict,
    /// Skipped at scenario or feature level
    pub skip: bool,
    pub sources: Vec<AnnotatedSource>,
}

impl ScenarioCard {
    pub fn new(scenario: Scenario, feature_skip: bool) -> Self {
        let sources = source_files(&scenario)
            .into_iter()
            .map(|source| AnnotatedSource {
                annotations: annotations_for(&scenario, &source),
                source,
            })
            .collect();
        Self {
            verdict: verdict(&scenario),
            skip: feature_skip || is_skip(&scenario),
            sources,
            scenario,
        }
    }

    pub fn title(&self) -> &str {
        display_title(&self.scenario)
    }

    /// A skipped case that expects a report: the checker does not
    /// implement it yet
    pub fn is_unimplemented(&self) -> bool {
        self.skip && self.verdict == Verdict::Negative
    }
}

/// A rule's scenarios, split into acceptance cases and the rest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSections {
    pub acceptance: Vec<ScenarioCard>,
    pub more: Vec<ScenarioCard>,
}

impl ScenarioSections {
    pub fn for_rule(rule: &Rule) -> Self {
        let feature_skip = is_skip_feature(&rule.feature);
        let mut sections = Self::default();
        for outline in all_scenarios(&rule.feature) {
            let target = if is_acceptance(outline) {
                &mut sections.acceptance
            } else {
                &mut sections.more
            };
            target.extend(
                expand_outline(outline)
                    .into_iter()
                    .map(|scenario| ScenarioCard::new(scenario, feature_skip)),
            );
        }
        sections
    }

    pub fn is_empty(&self) -> bool {
        self.acceptance.is_empty() && self.more.is_empty()
    }
}
