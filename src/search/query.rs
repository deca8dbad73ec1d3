use std::collections::HashSet;

use crate::{config::IndexConfig, error::Result, index::LoadedIndex, tokenizer::Segmenter};

/// Widens query terms with the indexed vocabulary entries they prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExpander {
    limit_per_term: Option<usize>,
}

impl QueryExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self {
            limit_per_term: config.expansion_limit,
        }
    }

    pub fn with_limit_per_term(mut self, limit: usize) -> Self {
        self.limit_per_term = Some(limit);
        self
    }

    /// Original terms verbatim plus every prefix match. Never smaller than the input set.
    pub fn expand<S>(&self, index: &LoadedIndex, terms: &[S]) -> HashSet<String>
    where
        S: AsRef<str>,
    {
        let mut expanded: HashSet<String> =
            terms.iter().map(|t| t.as_ref().to_string()).collect();
        for term in terms {
            expanded.extend(
                index
                    .prefix_search(term.as_ref(), self.limit_per_term)
                    .into_iter()
                    .map(str::to_string),
            );
        }
        expanded
    }
}

pub fn expand_query<S>(index: &LoadedIndex, terms: &[S]) -> HashSet<String>
where
    S: AsRef<str>,
{
    QueryExpander::new().expand(index, terms)
}

/// Segment a raw query string, then expand its tokens.
pub fn expand_text(
    segmenter: &Segmenter,
    index: &LoadedIndex,
    text: &str,
) -> Result<HashSet<String>> {
    let tokens = segmenter.segment(text)?;
    Ok(expand_query(index, &tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{build_index, load_index};
    use proptest::prelude::*;

    fn vocabulary() -> LoadedIndex {
        load_index(build_index(["Apple", "Application", "apply", "Banana"])).unwrap()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expands_terms_with_prefix_matches() {
        let expanded = expand_query(&vocabulary(), &["app", "ban"]);
        assert_eq!(
            expanded,
            set(&["app", "ban", "Apple", "Application", "apply", "Banana"])
        );
    }

    #[test]
    fn unmatched_terms_are_kept_verbatim() {
        let expanded = expand_query(&vocabulary(), &["Cherry"]);
        assert_eq!(expanded, set(&["Cherry"]));
    }

    #[test]
    fn empty_index_degrades_to_exact_terms() {
        let expanded = expand_query(&LoadedIndex::default(), &["alpha", "beta"]);
        assert_eq!(expanded, set(&["alpha", "beta"]));
    }

    #[test]
    fn blank_terms_do_not_expand() {
        let expanded = expand_query(&vocabulary(), &[" "]);
        assert_eq!(expanded, set(&[" "]));
    }

    #[test]
    fn per_term_limit_caps_expansions() {
        let expander = QueryExpander::new().with_limit_per_term(1);
        let expanded = expander.expand(&vocabulary(), &["app"]);
        assert_eq!(expanded, set(&["app", "Apple"]));
    }

    #[test]
    fn limit_comes_from_config() {
        let config = IndexConfig {
            expansion_limit: Some(2),
            ..Default::default()
        };
        let expanded = QueryExpander::from_config(&config).expand(&vocabulary(), &["app"]);
        assert_eq!(expanded.len(), 3);
    }

    proptest! {
        #[test]
        fn expansion_is_superset_of_terms(
            vocab in prop::collection::vec("[a-c]{0,4}", 0..20),
            terms in prop::collection::vec("[a-c ]{0,3}", 0..6),
        ) {
            let index = load_index(build_index(vocab)).unwrap();
            let expanded = expand_query(&index, &terms);
            for term in &terms {
                prop_assert!(expanded.contains(term));
            }
        }
    }
}
