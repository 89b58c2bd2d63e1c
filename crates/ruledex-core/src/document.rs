//! Adapter over the `gherkin` grammar parser
//!
//! Converts the parser's AST into the crate's own [`model`](crate::model)
//! tree. Identities are derived from source line numbers so that parsing
//! the same text twice yields equal trees.

use eyre::{Result, WrapErr};
use gherkin::{GherkinEnv, StepType};
use std::path::Path;

use crate::model::{DataTable, Document, Examples, Feature, Scenario, Step, StepKind, TableRow};

/// Step keywords that continue the previous step's type.
///
/// `gherkin` folds these into the preceding Given/When/Then, so the
/// conjunction has to be recovered from the keyword text.
const CONJUNCTION_KEYWORDS: &[&str] = &["And", "But", "而且", "并且", "同时", "但是"];

/// Parse one feature document.
///
/// Text that holds nothing but blank lines, comments and tags has no
/// feature node; that is reported as `Document { feature: None }` rather
/// than as a parse error.
pub fn parse_document(path: &Path, text: &str) -> Result<Document> {
    if !has_content(text) {
        return Ok(Document { feature: None });
    }

    // The grammar requires a trailing newline.
    let owned;
    let text = if text.ends_with('\n') {
        text
    } else {
        owned = format!("{text}\n");
        owned.as_str()
    };

    let feature = gherkin::Feature::parse(text, GherkinEnv::default())
        .wrap_err_with(|| format!("Failed to parse feature document {}", path.display()))?;

    Ok(Document {
        feature: Some(convert_feature(feature)),
    })
}

fn has_content(text: &str) -> bool {
    text.lines().map(str::trim).any(|line| {
        !line.is_empty() && !line.starts_with('#') && !line.starts_with('@')
    })
}

fn convert_feature(feature: gherkin::Feature) -> Feature {
    Feature {
        keyword: feature.keyword,
        name: feature.name,
        description: feature.description.unwrap_or_default(),
        tags: normalize_tags(feature.tags),
        children: feature.scenarios.into_iter().map(convert_scenario).collect(),
    }
}

fn convert_scenario(scenario: gherkin::Scenario) -> Scenario {
    Scenario {
        id: scenario.position.line.to_string(),
        keyword: scenario.keyword,
        name: scenario.name,
        tags: normalize_tags(scenario.tags),
        steps: scenario.steps.into_iter().map(convert_step).collect(),
        examples: scenario
            .examples
            .into_iter()
            .map(convert_examples)
            .collect(),
    }
}

fn convert_step(step: gherkin::Step) -> Step {
    let kind = step_kind(&step.keyword, step.ty);
    Step {
        keyword: step.keyword,
        kind,
        text: step.value,
        doc_string: step.docstring.map(trim_doc_string),
        data_table: step.table.map(|table| DataTable {
            rows: convert_rows(table),
        }),
    }
}

/// `gherkin` keeps the newlines after the opening and before the closing
/// delimiter; the content is what lies between them.
fn trim_doc_string(doc: String) -> String {
    let inner = doc
        .strip_prefix("\r\n")
        .or_else(|| doc.strip_prefix('\n'))
        .unwrap_or(&doc);
    let inner = inner
        .strip_suffix("\r\n")
        .or_else(|| inner.strip_suffix('\n'))
        .unwrap_or(inner);
    inner.to_string()
}

fn convert_examples(examples: gherkin::Examples) -> Examples {
    let id = examples.position.line.to_string();
    let mut rows = examples.table.map(convert_rows).unwrap_or_default();
    let header = if rows.is_empty() {
        None
    } else {
        Some(rows.remove(0))
    };
    Examples {
        id,
        header,
        body: rows,
    }
}

/// Rows of a table, each identified by its own source line.
fn convert_rows(table: gherkin::Table) -> Vec<TableRow> {
    let first_line = table.position.line;
    table
        .rows
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| TableRow::new((first_line + idx).to_string(), cells))
        .collect()
}

fn step_kind(keyword: &str, ty: StepType) -> StepKind {
    let keyword = keyword.trim();
    if keyword == "*" {
        return StepKind::Unknown;
    }
    if CONJUNCTION_KEYWORDS.contains(&keyword) {
        return StepKind::Conjunction;
    }
    match ty {
        StepType::Given => StepKind::Context,
        StepType::When => StepKind::Action,
        StepType::Then => StepKind::Outcome,
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| {
            if tag.starts_with('@') {
                tag
            } else {
                format!("@{tag}")
            }
        })
        .collect()
}
