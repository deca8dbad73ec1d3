use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Lucene's English default set plus high-frequency Chinese and Japanese particles.
const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with", "的", "了", "是", "在", "和", "也", "就", "都",
    "の", "は", "が", "を", "に", "で", "と", "も", "へ", "や",
];

static DEFAULT_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DEFAULT_STOPWORDS.iter().copied().collect());

/// Case-insensitive stopword membership test.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    extra: HashSet<String>,
}

impl Stopwords {
    pub fn with_extra<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        let lower = token.trim().to_lowercase();
        DEFAULT_SET.contains(lower.as_str()) || self.extra.contains(&lower)
    }
}
