//! ruledex - Queryable catalog of coding-standard rules
//!
//! This library loads a specification tree (see [`ruledex_core`]) into a
//! [`Catalog`] snapshot, answers multi-field search queries against it
//! and republishes it on demand through an [`Engine`].
//!
//! # Features
//!
//! - `search` (default) - tokenized full-text search with `tantivy`;
//!   without it every query uses substring matching
//!
//! ```no_run
//! use ruledex::{Engine, Part};
//!
//! ruledex::init_logging();
//! let engine = Engine::new(".")?;
//! let catalog = engine.catalog();
//! for (category, rules) in catalog.by_category(Part::Cpp).iter() {
//!     println!("{category}: {} rules", rules.len());
//! }
//! for hit in catalog.search("空指针") {
//!     println!("{} {} -> {}", hit.id, hit.title, hit.uri);
//! }
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod search;
pub mod tokenizer;

pub use catalog::{Catalog, Categories};
pub use config::{Config, SearchBackend, SearchOptions};
pub use engine::{Engine, Rebuild};
pub use search::{SearchDocument, SearchField, SearchIndex, SimpleIndex, build_index};
#[cfg(feature = "search")]
pub use search::TantivyIndex;

pub use ruledex_core::{
    Annotation, Level, Part, Rule, ScenarioCard, ScenarioSections, Severity, Verdict,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "RULEDEX_LOG";

/// Install a stderr `tracing` subscriber filtered by `RULEDEX_LOG`
/// (default `info`). Does nothing if a subscriber is already installed.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
