//! Multi-field search over the rule catalog
//!
//! Every rule is indexed under four fields: identifier, title, category and
//! description. A query runs against each field on its own, and the hits
//! are merged in fixed field order so that an identifier match always
//! ranks above a title match, which ranks above a category match, which
//! ranks above a description match. A rule appears at most once.
//!
//! When the `search` feature is disabled, it falls back to simple substring matching.

use facet::Facet;
use ruledex_core::Rule;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::SearchBackend;
use crate::tokenizer::{split_words, whole_value};

/// A searchable field of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Id,
    Title,
    Category,
    Description,
}

impl SearchField {
    /// Order in which per-field hits are merged
    pub const MERGE_ORDER: [SearchField; 4] = [
        SearchField::Id,
        SearchField::Title,
        SearchField::Category,
        SearchField::Description,
    ];
}

/// A search hit, materialized from the stored field values
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct SearchDocument {
    pub id: String,
    pub title: String,
    /// The rule description
    pub content: String,
    pub category: String,
    /// Canonical link target (`/rules/<id>`)
    pub uri: String,
}

impl SearchDocument {
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            id: rule.id.clone(),
            title: rule.title.clone(),
            content: rule.description.clone(),
            category: rule.category.clone(),
            uri: rule.uri(),
        }
    }

    fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Id => &self.id,
            SearchField::Title => &self.title,
            SearchField::Category => &self.category,
            SearchField::Description => &self.content,
        }
    }
}

/// Search index abstraction
pub trait SearchIndex: Send + Sync {
    /// Ids of rules matching `query` in one field, best first, at most `limit`
    fn search_field(&self, field: SearchField, query: &str, limit: usize) -> Vec<String>;

    /// Stored values of one rule
    fn document(&self, id: &str) -> Option<SearchDocument>;
}

/// Query every field and merge the hits in [`SearchField::MERGE_ORDER`],
/// dropping rules already emitted by an earlier field.
pub fn search(index: &dyn SearchIndex, query: &str, limit_per_field: usize) -> Vec<SearchDocument> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::new();
    for field in SearchField::MERGE_ORDER {
        let ids = index.search_field(field, query, limit_per_field);
        debug!(?field, hits = ids.len(), "field search");
        for id in ids {
            if seen.contains(&id) {
                continue;
            }
            if let Some(doc) = index.document(&id) {
                seen.insert(id);
                results.push(doc);
            }
        }
    }
    results
}

/// Query terms for one field, tokenized the way the field was indexed
/// (without prefix expansion).
fn query_terms(field: SearchField, query: &str) -> Vec<String> {
    let mut terms: Vec<String> = match field {
        SearchField::Id => whole_value(query).into_iter().map(|w| w.text).collect(),
        _ => split_words(query).into_iter().map(|w| w.text).collect(),
    };
    let mut seen = HashSet::new();
    terms.retain(|t| seen.insert(t.clone()));
    terms
}

// ============================================================================
// Tantivy implementation (when 'search' feature is enabled)
// ============================================================================

#[cfg(feature = "search")]
mod tantivy_impl {
    use super::*;
    use crate::tokenizer::ForwardTokenizer;
    use tantivy::collector::TopDocs;
    use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
    use tantivy::schema::{
        Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions, Value,
    };
    use tantivy::tokenizer::TextAnalyzer;
    use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term, doc};

    struct Fields {
        key: Field,
        id: Field,
        title: Field,
        category: Field,
        content: Field,
        uri: Field,
    }

    impl Fields {
        fn get(&self, field: SearchField) -> Field {
            match field {
                SearchField::Id => self.id,
                SearchField::Title => self.title,
                SearchField::Category => self.category,
                SearchField::Description => self.content,
            }
        }
    }

    pub struct TantivyIndex {
        #[allow(dead_code)]
        index: Index,
        reader: IndexReader,
        fields: Fields,
    }

    impl TantivyIndex {
        /// Build an in-memory index over the rules
        pub fn build(rules: &[Rule]) -> eyre::Result<Self> {
            let mut schema_builder = Schema::builder();

            let text_options = |tokenizer: &str| {
                TextOptions::default().set_stored().set_indexing_options(
                    TextFieldIndexing::default()
                        .set_tokenizer(tokenizer)
                        .set_index_option(IndexRecordOption::WithFreqsAndPositions),
                )
            };

            // Exact id, for materializing documents
            let key = schema_builder.add_text_field("key", STRING | STORED);
            let id = schema_builder.add_text_field("id", text_options(ForwardTokenizer::WHOLE_VALUE));
            let title = schema_builder.add_text_field("title", text_options(ForwardTokenizer::WORDS));
            let category =
                schema_builder.add_text_field("category", text_options(ForwardTokenizer::WORDS));
            let content =
                schema_builder.add_text_field("content", text_options(ForwardTokenizer::WORDS));
            let uri = schema_builder.add_text_field("uri", STORED);
            let schema = schema_builder.build();

            let index = Index::create_in_ram(schema);
            index.tokenizers().register(
                ForwardTokenizer::WORDS,
                TextAnalyzer::builder(ForwardTokenizer::words()).build(),
            );
            index.tokenizers().register(
                ForwardTokenizer::WHOLE_VALUE,
                TextAnalyzer::builder(ForwardTokenizer::whole_value()).build(),
            );

            let mut index_writer: IndexWriter = index.writer(50_000_000)?;
            for rule in rules {
                index_writer.add_document(doc!(
                    key => rule.id.clone(),
                    id => rule.id.clone(),
                    title => rule.title.clone(),
                    category => rule.category.clone(),
                    content => rule.description.clone(),
                    uri => rule.uri(),
                ))?;
            }
            index_writer.commit()?;

            let reader = index
                .reader_builder()
                .reload_policy(ReloadPolicy::Manual)
                .try_into()?;

            Ok(Self {
                index,
                reader,
                fields: Fields {
                    key,
                    id,
                    title,
                    category,
                    content,
                    uri,
                },
            })
        }

        fn stored(&self, doc: &TantivyDocument, field: Field) -> Option<String> {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        }
    }

    impl SearchIndex for TantivyIndex {
        fn search_field(&self, field: SearchField, query: &str, limit: usize) -> Vec<String> {
            let target = self.fields.get(field);
            let terms = query_terms(field, query);
            if terms.is_empty() || limit == 0 {
                return Vec::new();
            }

            // Every query word has to be present in the field.
            let clauses: Vec<(Occur, Box<dyn Query>)> = terms
                .iter()
                .map(|t| {
                    let query: Box<dyn Query> = Box::new(TermQuery::new(
                        Term::from_field_text(target, t),
                        IndexRecordOption::WithFreqs,
                    ));
                    (Occur::Must, query)
                })
                .collect();
            let query = BooleanQuery::new(clauses);

            let searcher = self.reader.searcher();
            let top_docs = match searcher.search(&query, &TopDocs::with_limit(limit)) {
                Ok(docs) => docs,
                Err(e) => {
                    warn!("Search on {:?} failed: {}", field, e);
                    return Vec::new();
                }
            };

            top_docs
                .into_iter()
                .filter_map(|(_score, address)| {
                    let doc: TantivyDocument = searcher.doc(address).ok()?;
                    self.stored(&doc, self.fields.key)
                })
                .collect()
        }

        fn document(&self, id: &str) -> Option<SearchDocument> {
            let searcher = self.reader.searcher();
            let query = TermQuery::new(
                Term::from_field_text(self.fields.key, id),
                IndexRecordOption::Basic,
            );
            let (_, address) = searcher
                .search(&query, &TopDocs::with_limit(1))
                .ok()?
                .into_iter()
                .next()?;
            let doc: TantivyDocument = searcher.doc(address).ok()?;

            Some(SearchDocument {
                id: self.stored(&doc, self.fields.key)?,
                title: self.stored(&doc, self.fields.title).unwrap_or_default(),
                content: self.stored(&doc, self.fields.content).unwrap_or_default(),
                category: self.stored(&doc, self.fields.category).unwrap_or_default(),
                uri: self.stored(&doc, self.fields.uri).unwrap_or_default(),
            })
        }
    }
}

#[cfg(feature = "search")]
pub use tantivy_impl::TantivyIndex;

// ============================================================================
// Fallback implementation (simple substring matching)
// ============================================================================

/// Simple substring search fallback when tantivy is not available
pub struct SimpleIndex {
    documents: Vec<SearchDocument>,
}

impl SimpleIndex {
    /// Build a simple index from the rules, keeping catalog order
    pub fn build(rules: &[Rule]) -> Self {
        Self {
            documents: rules.iter().map(SearchDocument::from_rule).collect(),
        }
    }
}

impl SearchIndex for SimpleIndex {
    fn search_field(&self, field: SearchField, query: &str, limit: usize) -> Vec<String> {
        let terms = query_terms(field, query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<&SearchDocument> = self
            .documents
            .iter()
            .filter(|doc| {
                let value = doc.field(field).to_lowercase();
                match field {
                    // Left-anchored, like the tokenized index
                    SearchField::Id => value.starts_with(&terms[0]),
                    _ => terms.iter().all(|t| value.contains(t.as_str())),
                }
            })
            .collect();

        if field == SearchField::Id {
            // Shorter ids are closer to the query; exact matches come first.
            hits.sort_by_key(|doc| doc.id.len());
        }

        hits.into_iter()
            .take(limit)
            .map(|doc| doc.id.clone())
            .collect()
    }

    fn document(&self, id: &str) -> Option<SearchDocument> {
        self.documents.iter().find(|d| d.id == id).cloned()
    }
}

/// Build the appropriate search index based on feature flags
#[cfg(feature = "search")]
pub fn build_index(rules: &[Rule], backend: SearchBackend) -> Box<dyn SearchIndex> {
    if backend == SearchBackend::Simple {
        return Box::new(SimpleIndex::build(rules));
    }
    match TantivyIndex::build(rules) {
        Ok(index) => Box::new(index),
        Err(e) => {
            warn!(
                "Failed to build tantivy index, falling back to simple search: {}",
                e
            );
            Box::new(SimpleIndex::build(rules))
        }
    }
}

#[cfg(not(feature = "search"))]
pub fn build_index(rules: &[Rule], backend: SearchBackend) -> Box<dyn SearchIndex> {
    if backend == SearchBackend::Tantivy {
        debug!("tantivy backend requested without the `search` feature; using simple search");
    }
    Box::new(SimpleIndex::build(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruledex_core::Feature;
    use std::path::Path;

    fn rule(path: &str, name: &str, description: &str) -> Rule {
        Rule::from_feature(
            Path::new(path),
            Feature::new(name).with_description(description),
        )
    }

    fn rules() -> Vec<Rule> {
        vec![
            rule(
                "features/cpp/pointer/r-1-2.feature",
                "R-1-2 不得解引用空指针",
                "解引用前必须检查指针。",
            ),
            rule(
                "features/cpp/pointer/r-1-20.feature",
                "R-1-20 指针运算",
                "避免指针运算。",
            ),
            rule(
                "features/cpp/memory/a-3-1.feature",
                "A-3-1 使用智能指针",
                "参见 r-1-2 与 r-1-20：优先使用 unique_ptr 管理内存 r-1-2 r-1-2。",
            ),
        ]
    }

    /// Scores every description hit above every id hit, to check that the
    /// merge does not depend on per-field relevance.
    struct RiggedIndex(SimpleIndex);

    impl SearchIndex for RiggedIndex {
        fn search_field(&self, field: SearchField, query: &str, limit: usize) -> Vec<String> {
            let mut ids = self.0.search_field(field, query, limit);
            ids.reverse();
            ids
        }

        fn document(&self, id: &str) -> Option<SearchDocument> {
            self.0.document(id)
        }
    }

    fn ids(results: &[SearchDocument]) -> Vec<&str> {
        results.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_query_terms() {
        assert_eq!(query_terms(SearchField::Id, " R-1-2 "), vec!["r-1-2"]);
        assert_eq!(
            query_terms(SearchField::Description, "空指针 Null null"),
            vec!["空", "指", "针", "null"]
        );
        assert!(query_terms(SearchField::Title, "  ").is_empty());
    }

    #[test]
    fn test_simple_id_match_ranks_first() {
        let index = SimpleIndex::build(&rules());
        let results = search(&index, "r-1-2", 20);
        assert_eq!(ids(&results)[0], "r-1-2");
        assert_eq!(ids(&results), vec!["r-1-2", "r-1-20", "a-3-1"]);
    }

    #[test]
    fn test_merge_ignores_field_scores() {
        let index = RiggedIndex(SimpleIndex::build(&rules()));
        let results = search(&index, "r-1-20", 20);
        assert_eq!(ids(&results), vec!["r-1-20", "a-3-1"]);
    }

    #[test]
    fn test_no_duplicates_across_fields() {
        let index = SimpleIndex::build(&rules());
        // Matches r-1-2 by title and description.
        let results = search(&index, "指针", 20);
        let mut unique = ids(&results);
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), results.len());
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_empty_query() {
        let index = SimpleIndex::build(&rules());
        assert!(search(&index, "   ", 20).is_empty());
    }

    #[test]
    fn test_limit_per_field() {
        let index = SimpleIndex::build(&rules());
        assert_eq!(index.search_field(SearchField::Title, "指", 2).len(), 2);
    }

    #[test]
    fn test_documents_carry_link_target() {
        let index = SimpleIndex::build(&rules());
        let doc = index.document("a-3-1").unwrap();
        assert_eq!(doc.uri, "/rules/a-3-1");
        assert_eq!(doc.category, "memory");
        assert_eq!(doc.title, "使用智能指针");
    }

    #[cfg(feature = "search")]
    mod tantivy_tests {
        use super::*;

        #[test]
        fn test_exact_id_beats_description_match() {
            let index = TantivyIndex::build(&rules()).unwrap();
            let results = search(&index, "r-1-2", 20);
            assert_eq!(ids(&results)[0], "r-1-2");
            // a-3-1 mentions the id repeatedly but only in its description.
            assert_eq!(ids(&results).last().copied(), Some("a-3-1"));
        }

        #[test]
        fn test_id_prefix_match() {
            let index = TantivyIndex::build(&rules()).unwrap();
            let hits = index.search_field(SearchField::Id, "R-1", 20);
            assert_eq!(hits.len(), 2);
            assert!(!hits.contains(&"a-3-1".to_string()));
        }

        #[test]
        fn test_long_id_prefix_matches_on_both_backends() {
            let long_id = format!("r-{}9", "1-".repeat(20));
            let mut rules = rules();
            rules.push(rule(
                &format!("features/cpp/pointer/{long_id}.feature"),
                "Long",
                "",
            ));
            let query = &long_id[..40];

            let tantivy = TantivyIndex::build(&rules).unwrap();
            let simple = SimpleIndex::build(&rules);
            assert_eq!(
                tantivy.search_field(SearchField::Id, query, 20),
                vec![long_id.clone()]
            );
            assert_eq!(
                simple.search_field(SearchField::Id, query, 20),
                vec![long_id]
            );
        }

        #[test]
        fn test_han_query_matches_characters() {
            let index = TantivyIndex::build(&rules()).unwrap();
            let hits = index.search_field(SearchField::Title, "智能", 20);
            assert_eq!(hits, vec!["a-3-1".to_string()]);
        }

        #[test]
        fn test_forward_word_match() {
            let index = TantivyIndex::build(&rules()).unwrap();
            let hits = index.search_field(SearchField::Description, "uniq", 20);
            assert_eq!(hits, vec!["a-3-1".to_string()]);
            assert!(index.search_field(SearchField::Description, "ptr", 20).is_empty());
        }

        #[test]
        fn test_document_roundtrip() {
            let index = TantivyIndex::build(&rules()).unwrap();
            let doc = index.document("r-1-20").unwrap();
            assert_eq!(doc, SearchDocument::from_rule(&rules()[1]));
            assert!(index.document("missing").is_none());
        }

        #[test]
        fn test_no_duplicates() {
            let index = TantivyIndex::build(&rules()).unwrap();
            let results = search(&index, "指针", 20);
            let mut unique = ids(&results);
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), results.len());
        }
    }
}
