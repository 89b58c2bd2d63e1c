//! Feature document model
//!
//! This is the read-only tree handed to the rest of the pipeline by the
//! document adapter. Every node owns its data, so `Clone` produces a fully
//! independent copy: outline expansion relies on that and never mutates
//! a tree it did not clone itself.

use facet::Facet;

/// The keyword type of a step, as resolved by the grammar parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[facet(rename_all = "lowercase")]
#[repr(u8)]
pub enum StepKind {
    /// `Given` and its translations
    Context,
    /// `When` and its translations
    Action,
    /// `Then` and its translations
    Outcome,
    /// `And` / `But` and their translations
    Conjunction,
    /// `*`
    Unknown,
}

/// One row of a data table or examples table
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct TableRow {
    /// Deterministic row identity (the source line of the row)
    pub id: String,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(id: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }
}

/// Tabular payload attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct DataTable {
    pub rows: Vec<TableRow>,
}

/// A single step line of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Step {
    /// Keyword as written in the document (`假如`, `And `, ...)
    pub keyword: String,
    pub kind: StepKind,
    pub text: String,
    /// Attached multi-line text block
    #[facet(default)]
    pub doc_string: Option<String>,
    #[facet(default)]
    pub data_table: Option<DataTable>,
}

impl Step {
    pub fn new(kind: StepKind, text: impl Into<String>) -> Self {
        Self {
            keyword: String::new(),
            kind,
            text: text.into(),
            doc_string: None,
            data_table: None,
        }
    }

    pub fn with_doc_string(mut self, content: impl Into<String>) -> Self {
        self.doc_string = Some(content.into());
        self
    }

    pub fn with_data_table(mut self, rows: Vec<TableRow>) -> Self {
        self.data_table = Some(DataTable { rows });
        self
    }
}

/// A parameter table of a scenario outline
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Examples {
    pub id: String,
    /// Column names; `None` for an `Examples:` block without a table
    #[facet(default)]
    pub header: Option<TableRow>,
    #[facet(default)]
    pub body: Vec<TableRow>,
}

/// A scenario or scenario outline
///
/// A scenario is concrete iff `examples` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Scenario {
    pub id: String,
    #[facet(default)]
    pub keyword: String,
    pub name: String,
    #[facet(default)]
    pub tags: Vec<String>,
    pub steps: Vec<Step>,
    #[facet(default)]
    pub examples: Vec<Examples>,
}

impl Scenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyword: String::new(),
            name: name.into(),
            tags: Vec::new(),
            steps: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_examples(mut self, examples: Examples) -> Self {
        self.examples.push(examples);
        self
    }

    /// Whether this scenario needs outline expansion before use
    pub fn is_outline(&self) -> bool {
        !self.examples.is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// The root node of one feature document
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Feature {
    #[facet(default)]
    pub keyword: String,
    pub name: String,
    #[facet(default)]
    pub description: String,
    #[facet(default)]
    pub tags: Vec<String>,
    /// Scenarios and scenario outlines, in document order
    pub children: Vec<Scenario>,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            keyword: String::new(),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.children.push(scenario);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A parsed document: the feature node is absent for documents that hold
/// only comments or tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub feature: Option<Feature>,
}
