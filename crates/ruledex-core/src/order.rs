//! Catalog ordering of rules
//!
//! Mandatory rules come first. Within a severity, ids are compared by
//! their `-`-separated components after the leading code letter, numbers
//! numerically, left to right.

use std::cmp::Ordering;

use crate::rule::Rule;

/// One `-`-separated component of a rule id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum IdComponent {
    Number(u64),
    /// Non-numeric components sort after every number
    Text(String),
}

fn id_components(id: &str) -> Vec<IdComponent> {
    id.split('-')
        .skip(1)
        .map(|part| match part.parse::<u64>() {
            Ok(n) => IdComponent::Number(n),
            Err(_) => IdComponent::Text(part.to_string()),
        })
        .collect()
}

/// Compare two ids component-wise.
///
/// Components are compared up to the length of the shorter id; when all
/// of those are equal the id with fewer components sorts first, and ids
/// that are still equal (`r-01` / `r-1`) fall back to their text.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    id_components(a)
        .cmp(&id_components(b))
        .then_with(|| a.cmp(b))
}

/// Total catalog order: severity, then id.
pub fn compare_rules(a: &Rule, b: &Rule) -> Ordering {
    a.severity()
        .cmp(&b.severity())
        .then_with(|| compare_ids(&a.id, &b.id))
}

/// Sort rules into catalog order.
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by(compare_rules);
}
