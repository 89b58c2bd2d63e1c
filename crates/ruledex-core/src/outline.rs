//! Scenario outline expansion

use crate::model::{Examples, Scenario, TableRow};

/// Expand a scenario outline into one concrete scenario per examples row.
///
/// A concrete scenario comes back as a single-element list, unchanged.
/// For an outline, every row of every examples table yields an independent
/// copy identified as `<outline id>-<row id>`, with each `<column>`
/// placeholder replaced by the row's cell in the name, step texts,
/// doc-strings and data-table cells. The copies carry no examples.
///
/// Only columns for which the row has a cell are substituted; placeholders
/// of missing trailing cells stay in the text as written.
pub fn expand_outline(outline: &Scenario) -> Vec<Scenario> {
    if !outline.is_outline() {
        return vec![outline.clone()];
    }

    outline
        .examples
        .iter()
        .flat_map(|examples| {
            examples
                .body
                .iter()
                .map(move |row| expand_row(outline, examples, row))
        })
        .collect()
}

/// Expand a list of scenarios, preserving order.
pub fn expand_all<'a>(scenarios: impl IntoIterator<Item = &'a Scenario>) -> Vec<Scenario> {
    scenarios.into_iter().flat_map(expand_outline).collect()
}

fn expand_row(outline: &Scenario, examples: &Examples, row: &TableRow) -> Scenario {
    let mut scenario = Scenario {
        id: format!("{}-{}", outline.id, row.id),
        examples: Vec::new(),
        ..outline.clone()
    };

    let Some(header) = &examples.header else {
        return scenario;
    };

    for (key, value) in header.cells.iter().zip(&row.cells) {
        let placeholder = format!("<{key}>");
        substitute(&mut scenario, &placeholder, value);
    }

    scenario
}

fn substitute(scenario: &mut Scenario, placeholder: &str, value: &str) {
    replace_in(&mut scenario.name, placeholder, value);
    for step in &mut scenario.steps {
        replace_in(&mut step.text, placeholder, value);
        if let Some(doc) = &mut step.doc_string {
            replace_in(doc, placeholder, value);
        }
        if let Some(table) = &mut step.data_table {
            for cell in table.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                replace_in(cell, placeholder, value);
            }
        }
    }
}

fn replace_in(text: &mut String, placeholder: &str, value: &str) {
    if text.contains(placeholder) {
        *text = text.replace(placeholder, value);
    }
}
